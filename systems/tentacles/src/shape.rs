use std::f32::consts::TAU;

use cutscene_fx_core::{AnchorPose, TentacleFieldConfig, ValueRange};
use glam::Vec3;
use rand::Rng;

/// Shape parameters drawn once when a tentacle spawns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TentacleParams {
    /// Fully grown reach along the growth direction.
    pub length: f32,
    /// Lateral wave displacement at the root.
    pub wave_amplitude: f32,
    /// Wave cycles along the full tentacle.
    pub wave_frequency: f32,
    /// Radians per second the wave phase advances.
    pub wave_speed: f32,
}

impl TentacleParams {
    /// Draws each parameter independently from its configured range.
    pub(crate) fn sample<R: Rng + ?Sized>(rng: &mut R, field: &TentacleFieldConfig) -> Self {
        let length = draw(rng, field.length);
        let wave_amplitude = draw(rng, field.wave_amplitude);
        let wave_frequency = draw(rng, field.wave_frequency);
        let wave_speed = draw(rng, field.wave_speed);
        Self {
            length,
            wave_amplitude,
            wave_frequency,
            wave_speed,
        }
    }
}

fn draw<R: Rng + ?Sized>(rng: &mut R, range: ValueRange) -> f32 {
    rng.gen_range(range.min..=range.max)
}

/// Computes every segment position of a tentacle for one frame.
///
/// Segment `s` sits at parametric position `t = s / (segment_count - 1)`. It is
/// pushed `length * growth_factor * t` along the anchor's growth direction and
/// displaced along the lateral axis by a sine wave whose amplitude decays
/// linearly to zero at the tip. `out` is cleared and refilled with
/// `segment_count` points. A single segment collapses onto the root.
pub fn evaluate_segments(
    pose: AnchorPose,
    params: &TentacleParams,
    growth_factor: f32,
    wave_time: f32,
    segment_count: usize,
    out: &mut Vec<Vec3>,
) {
    out.clear();
    if segment_count == 0 {
        return;
    }

    let root = pose.position;
    let direction = pose.growth_direction();
    let lateral = pose.lateral_axis();
    let current_length = params.length * growth_factor;
    let last_index = segment_count.saturating_sub(1).max(1) as f32;

    out.extend((0..segment_count).map(|segment| {
        let t = segment as f32 / last_index;
        let base = root + direction * (current_length * t);
        let phase = t * params.wave_frequency * TAU + wave_time * params.wave_speed;
        let wave = phase.sin() * params.wave_amplitude * (1.0 - t);
        base + lateral * wave
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const EPSILON: f32 = 1e-5;

    fn params(length: f32, amplitude: f32, frequency: f32, speed: f32) -> TentacleParams {
        TentacleParams {
            length,
            wave_amplitude: amplitude,
            wave_frequency: frequency,
            wave_speed: speed,
        }
    }

    #[test]
    fn three_segment_example_matches_hand_computation() {
        let mut points = Vec::new();
        evaluate_segments(
            AnchorPose::at(Vec3::ZERO),
            &params(2.0, 1.0, 1.0, 0.0),
            1.0,
            0.0,
            3,
            &mut points,
        );

        assert_eq!(points.len(), 3);
        assert_eq!(points[0], Vec3::ZERO);
        assert!(points[1].abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), EPSILON));
        assert_eq!(points[2], Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn displacement_decays_linearly_toward_tip() {
        // Frequency zero keeps the phase constant along the tentacle, so the
        // lateral offset isolates the (1 - t) envelope.
        let wave_time = std::f32::consts::FRAC_PI_2;
        let mut points = Vec::new();
        evaluate_segments(
            AnchorPose::at(Vec3::ZERO),
            &params(4.0, 0.8, 0.0, 1.0),
            1.0,
            wave_time,
            5,
            &mut points,
        );

        for (segment, point) in points.iter().enumerate() {
            let t = segment as f32 / 4.0;
            let expected = -(0.8 * (1.0 - t));
            assert!(
                (point.x - expected).abs() < EPSILON,
                "segment {segment}: offset {} expected {expected}",
                point.x
            );
            assert!((point.y - 4.0 * t).abs() < EPSILON);
        }
    }

    #[test]
    fn growth_factor_scales_axial_reach() {
        let mut points = Vec::new();
        evaluate_segments(
            AnchorPose::at(Vec3::new(1.0, 1.0, 0.0)),
            &params(3.0, 0.5, 2.0, 1.5),
            0.25,
            0.7,
            6,
            &mut points,
        );

        let tip = *points.last().expect("tip exists");
        assert_eq!(tip, Vec3::new(1.0, 1.0 + 0.75, 0.0));
    }

    #[test]
    fn rotated_anchor_sways_within_xy_plane() {
        let pose = AnchorPose::new(Vec3::ZERO, Quat::from_rotation_z(0.6));
        let mut points = Vec::new();
        evaluate_segments(pose, &params(2.0, 0.5, 1.3, 2.0), 1.0, 0.4, 10, &mut points);

        let direction = pose.growth_direction();
        let lateral = pose.lateral_axis();
        for point in &points {
            assert!(point.z.abs() < EPSILON);
            let axial = point.dot(direction);
            let offset = *point - direction * axial;
            assert!(offset.cross(lateral).length() < EPSILON);
        }
    }

    #[test]
    fn single_segment_collapses_onto_root() {
        let mut points = vec![Vec3::ONE; 4];
        evaluate_segments(
            AnchorPose::at(Vec3::new(2.0, 0.0, 0.0)),
            &params(2.0, 0.0, 1.0, 1.0),
            1.0,
            0.0,
            1,
            &mut points,
        );
        assert_eq!(points, vec![Vec3::new(2.0, 0.0, 0.0)]);
    }

    #[test]
    fn sampled_parameters_respect_configured_ranges() {
        let field = TentacleFieldConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0x7e17_ac1e);
        for _ in 0..1_000 {
            let sampled = TentacleParams::sample(&mut rng, &field);
            assert!(field.length.contains(sampled.length));
            assert!(field.wave_amplitude.contains(sampled.wave_amplitude));
            assert!(field.wave_frequency.contains(sampled.wave_frequency));
            assert!(field.wave_speed.contains(sampled.wave_speed));
        }
    }

    #[test]
    fn degenerate_ranges_yield_their_single_value() {
        let field = TentacleFieldConfig {
            length: ValueRange::fixed(2.5),
            wave_amplitude: ValueRange::fixed(0.0),
            wave_frequency: ValueRange::fixed(1.0),
            wave_speed: ValueRange::fixed(3.0),
            ..TentacleFieldConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(
            TentacleParams::sample(&mut rng, &field),
            params(2.5, 0.0, 1.0, 3.0)
        );
    }
}
