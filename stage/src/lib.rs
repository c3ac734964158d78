#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! In-memory host scene that effect systems read anchors from and write
//! post-processing overrides into.

use cutscene_fx_core::{AnchorId, AnchorPose, AnchorProvider, FadeChannel, PostProcessSink};
use glam::Vec3;
use thiserror::Error;

/// Override state of a single post-processing effect inside the volume.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct EffectOverride {
    active: bool,
    intensity: f32,
}

impl EffectOverride {
    /// Whether the effect override has been enabled.
    #[must_use]
    pub const fn active(&self) -> bool {
        self.active
    }

    /// Current intensity override.
    #[must_use]
    pub const fn intensity(&self) -> f32 {
        self.intensity
    }
}

/// Post-processing volume whose profile may omit either effect.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Volume {
    chromatic_aberration: Option<EffectOverride>,
    vignette: Option<EffectOverride>,
}

impl Volume {
    fn with_channels(channels: &[FadeChannel]) -> Self {
        let has =
            |channel: FadeChannel| channels.contains(&channel).then(EffectOverride::default);
        Self {
            chromatic_aberration: has(FadeChannel::ChromaticAberration),
            vignette: has(FadeChannel::Vignette),
        }
    }

    fn effect(&self, channel: FadeChannel) -> Option<&EffectOverride> {
        match channel {
            FadeChannel::ChromaticAberration => self.chromatic_aberration.as_ref(),
            FadeChannel::Vignette => self.vignette.as_ref(),
        }
    }

    fn effect_mut(&mut self, channel: FadeChannel) -> Option<&mut EffectOverride> {
        match channel {
            FadeChannel::ChromaticAberration => self.chromatic_aberration.as_mut(),
            FadeChannel::Vignette => self.vignette.as_mut(),
        }
    }
}

/// Errors reported when mutating anchors that do not exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum StageError {
    /// The anchor was never created or has already been removed.
    #[error("anchor {0:?} is not present on the stage")]
    UnknownAnchor(AnchorId),
    /// Every anchor identifier has been handed out.
    #[error("stage cannot hold more than {} anchors", u32::MAX)]
    AnchorsExhausted,
}

/// Authoritative host scene state.
#[derive(Clone, Debug)]
pub struct Stage {
    anchors: Vec<Option<AnchorPose>>,
    volume: Volume,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage {
    /// Creates an empty stage whose volume carries every fade effect.
    #[must_use]
    pub fn new() -> Self {
        Self::with_volume_channels(&FadeChannel::ALL)
    }

    /// Creates an empty stage whose volume only carries the listed effects.
    #[must_use]
    pub fn with_volume_channels(channels: &[FadeChannel]) -> Self {
        Self {
            anchors: Vec::new(),
            volume: Volume::with_channels(channels),
        }
    }

    /// Places a new anchor and returns its identifier.
    pub fn add_anchor(&mut self, pose: AnchorPose) -> Result<AnchorId, StageError> {
        let index = u32::try_from(self.anchors.len()).map_err(|_| StageError::AnchorsExhausted)?;
        self.anchors.push(Some(pose));
        Ok(AnchorId::new(index))
    }

    /// Replaces the pose of an existing anchor.
    pub fn move_anchor(&mut self, anchor: AnchorId, pose: AnchorPose) -> Result<(), StageError> {
        let slot = self.slot_mut(anchor)?;
        *slot = pose;
        Ok(())
    }

    /// Shifts an existing anchor by the provided offset.
    pub fn translate_anchor(&mut self, anchor: AnchorId, offset: Vec3) -> Result<(), StageError> {
        let slot = self.slot_mut(anchor)?;
        slot.position += offset;
        Ok(())
    }

    /// Removes an anchor, returning its last pose. Identifiers are never reused.
    pub fn remove_anchor(&mut self, anchor: AnchorId) -> Result<AnchorPose, StageError> {
        self.anchors
            .get_mut(anchor.get() as usize)
            .and_then(Option::take)
            .ok_or(StageError::UnknownAnchor(anchor))
    }

    fn slot_mut(&mut self, anchor: AnchorId) -> Result<&mut AnchorPose, StageError> {
        self.anchors
            .get_mut(anchor.get() as usize)
            .and_then(Option::as_mut)
            .ok_or(StageError::UnknownAnchor(anchor))
    }
}

impl AnchorProvider for Stage {
    fn anchor_pose(&self, anchor: AnchorId) -> Option<AnchorPose> {
        self.anchors.get(anchor.get() as usize).copied().flatten()
    }
}

impl PostProcessSink for Stage {
    fn supports(&self, channel: FadeChannel) -> bool {
        self.volume.effect(channel).is_some()
    }

    fn activate(&mut self, channel: FadeChannel) {
        if let Some(effect) = self.volume.effect_mut(channel) {
            effect.active = true;
        }
    }

    fn set_intensity(&mut self, channel: FadeChannel, intensity: f32) {
        if let Some(effect) = self.volume.effect_mut(channel) {
            effect.intensity = intensity;
        }
    }
}

/// Query functions that expose read-only views of the stage.
pub mod query {
    use cutscene_fx_core::{AnchorId, FadeChannel};

    use super::{EffectOverride, Stage};

    /// Identifiers of every anchor still present, in creation order.
    #[must_use]
    pub fn anchor_ids(stage: &Stage) -> Vec<AnchorId> {
        stage
            .anchors
            .iter()
            .enumerate()
            .filter(|(_, pose)| pose.is_some())
            .map(|(index, _)| AnchorId::new(index as u32))
            .collect()
    }

    /// Override state of the channel's effect, if the volume carries it.
    #[must_use]
    pub fn effect(stage: &Stage, channel: FadeChannel) -> Option<EffectOverride> {
        stage.volume.effect(channel).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_anchors_stop_resolving() {
        let mut stage = Stage::new();
        let first = stage.add_anchor(AnchorPose::at(Vec3::X)).expect("anchor added");
        let second = stage.add_anchor(AnchorPose::at(Vec3::Y)).expect("anchor added");

        assert_eq!(stage.remove_anchor(first), Ok(AnchorPose::at(Vec3::X)));
        assert_eq!(stage.anchor_pose(first), None);
        assert_eq!(stage.anchor_pose(second), Some(AnchorPose::at(Vec3::Y)));
        assert_eq!(query::anchor_ids(&stage), vec![second]);
        assert_eq!(
            stage.move_anchor(first, AnchorPose::at(Vec3::Z)),
            Err(StageError::UnknownAnchor(first))
        );
    }

    #[test]
    fn anchors_are_numbered_in_insertion_order() {
        let mut stage = Stage::new();
        let ids: Vec<_> = (0..3)
            .map(|index| {
                stage
                    .add_anchor(AnchorPose::at(Vec3::X * index as f32))
                    .expect("anchor added")
            })
            .collect();
        assert_eq!(ids, vec![AnchorId::new(0), AnchorId::new(1), AnchorId::new(2)]);
        assert_eq!(query::anchor_ids(&stage), ids);
    }

    #[test]
    fn translate_moves_existing_anchor() {
        let mut stage = Stage::new();
        let anchor = stage.add_anchor(AnchorPose::at(Vec3::ZERO)).expect("anchor added");
        stage
            .translate_anchor(anchor, Vec3::new(1.0, 2.0, 0.0))
            .expect("anchor exists");
        assert_eq!(
            stage.anchor_pose(anchor).map(|pose| pose.position),
            Some(Vec3::new(1.0, 2.0, 0.0))
        );
    }

    #[test]
    fn volume_without_effect_ignores_writes() {
        let mut stage = Stage::with_volume_channels(&[FadeChannel::Vignette]);
        assert!(!stage.supports(FadeChannel::ChromaticAberration));
        stage.activate(FadeChannel::ChromaticAberration);
        stage.set_intensity(FadeChannel::ChromaticAberration, 1.0);
        assert_eq!(query::effect(&stage, FadeChannel::ChromaticAberration), None);

        stage.activate(FadeChannel::Vignette);
        stage.set_intensity(FadeChannel::Vignette, 0.3);
        let vignette = query::effect(&stage, FadeChannel::Vignette).expect("vignette present");
        assert!(vignette.active());
        assert_eq!(vignette.intensity(), 0.3);
    }
}
