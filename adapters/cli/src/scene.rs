use std::{fs, path::Path};

use anyhow::{Context, Result};
use cutscene_fx_core::{
    AnchorPose, FadeChannel, FadeConfig, TentacleFieldConfig, TentacleShapeConfig,
};
use glam::{Quat, Vec3};
use serde::Deserialize;

/// Scene description loaded from TOML.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SceneFile {
    /// Seed for the tentacle parameter stream.
    pub(crate) seed: u64,
    /// Sampling ranges shared by every tentacle.
    pub(crate) field: TentacleFieldConfig,
    /// Tentacle slots in host order.
    pub(crate) anchors: Vec<AnchorEntry>,
    /// Fade settings per channel.
    pub(crate) fades: FadeSettings,
    /// Which effects the post-processing volume carries.
    pub(crate) volume: VolumeSettings,
}

impl Default for SceneFile {
    fn default() -> Self {
        // Four anchors around the screen border, each aimed at the centre.
        let corner = |x: f32, y: f32, roll_degrees: f32| AnchorEntry {
            position: Some([x, y, 0.0]),
            roll_degrees,
            thickness: TentacleShapeConfig::default().thickness,
        };

        Self {
            seed: 0x7e17_ac1e,
            field: TentacleFieldConfig::default(),
            anchors: vec![
                corner(-6.0, -3.5, -45.0),
                corner(6.0, -3.5, 45.0),
                corner(-6.0, 3.5, -135.0),
                corner(6.0, 3.5, 135.0),
            ],
            fades: FadeSettings::default(),
            volume: VolumeSettings::default(),
        }
    }
}

impl SceneFile {
    /// Reads and parses a scene file from disk.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scene file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to load scene file at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse scene toml contents")
    }

    /// Volume channels the scene's post-processing profile carries.
    pub(crate) fn volume_channels(&self) -> Vec<FadeChannel> {
        let mut channels = Vec::with_capacity(FadeChannel::ALL.len());
        if self.volume.chromatic_aberration {
            channels.push(FadeChannel::ChromaticAberration);
        }
        if self.volume.vignette {
            channels.push(FadeChannel::Vignette);
        }
        channels
    }
}

/// One tentacle slot. A slot without a position has no anchor and never spawns.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AnchorEntry {
    pub(crate) position: Option<[f32; 3]>,
    /// Rotation about the view axis; zero grows straight up.
    pub(crate) roll_degrees: f32,
    pub(crate) thickness: f32,
}

impl Default for AnchorEntry {
    fn default() -> Self {
        Self {
            position: None,
            roll_degrees: 0.0,
            thickness: TentacleShapeConfig::default().thickness,
        }
    }
}

impl AnchorEntry {
    pub(crate) fn pose(&self) -> Option<AnchorPose> {
        let position = Vec3::from_array(self.position?);
        let orientation = Quat::from_rotation_z(self.roll_degrees.to_radians());
        Some(AnchorPose::new(position, orientation))
    }

    pub(crate) fn shape(&self) -> TentacleShapeConfig {
        TentacleShapeConfig {
            thickness: self.thickness,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FadeSettings {
    pub(crate) chromatic_aberration: FadeConfig,
    pub(crate) vignette: FadeConfig,
}

impl Default for FadeSettings {
    fn default() -> Self {
        Self {
            chromatic_aberration: FadeConfig::chromatic_aberration(),
            vignette: FadeConfig::vignette(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct VolumeSettings {
    pub(crate) chromatic_aberration: bool,
    pub(crate) vignette: bool,
}

impl Default for VolumeSettings {
    fn default() -> Self {
        Self {
            chromatic_aberration: true,
            vignette: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_scene_over_defaults() {
        let scene = SceneFile::parse(
            r#"
                seed = 9

                [field]
                segment_count = 6
                growth_duration = 0.0

                [[anchors]]
                position = [1.0, 2.0, 0.0]
                roll_degrees = 90.0

                [[anchors]]
                thickness = 0.5

                [fades.vignette]
                from = 0.1
                to = 0.4
                duration = 2.0

                [volume]
                chromatic_aberration = false
            "#,
        )
        .expect("scene parses");

        assert_eq!(scene.seed, 9);
        assert_eq!(scene.field.segment_count, 6);
        assert_eq!(scene.field.length, TentacleFieldConfig::default().length);
        assert_eq!(scene.anchors.len(), 2);
        assert_eq!(scene.anchors[1].pose(), None);
        assert_eq!(scene.anchors[1].shape().thickness, 0.5);
        assert_eq!(scene.fades.vignette, FadeConfig::new(0.1, 0.4, 2.0));
        assert_eq!(
            scene.fades.chromatic_aberration,
            FadeConfig::chromatic_aberration()
        );
        assert_eq!(scene.volume_channels(), vec![FadeChannel::Vignette]);

        let pose = scene.anchors[0].pose().expect("anchored");
        assert!(pose
            .growth_direction()
            .abs_diff_eq(Vec3::new(-1.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn rejects_unknown_keys() {
        let error = SceneFile::parse("speed = 3").expect_err("unknown key must fail");
        assert!(format!("{error:#}").contains("speed"));
    }

    #[test]
    fn default_scene_aims_every_anchor_at_the_centre() {
        let scene = SceneFile::default();
        for entry in &scene.anchors {
            let pose = entry.pose().expect("default anchors are placed");
            let towards_centre = (-pose.position).normalize();
            assert!(pose.growth_direction().dot(towards_centre) > 0.9);
        }
    }
}
