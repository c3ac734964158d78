use std::time::Duration;

use anyhow::{Context, Result};
use cutscene_fx_core::{Command, Event, FadeChannel, TentacleSlot};
use cutscene_fx_rendering::{EffectPresentation, Frame, PolylineStore};
use cutscene_fx_stage::{query, Stage, StageError};
use cutscene_fx_system_fades::FadePlayer;
use cutscene_fx_system_tentacles::{Config, TentacleField};

use crate::scene::SceneFile;

/// Routes cue commands to every effect system and owns the host stand-ins.
#[derive(Debug)]
pub(crate) struct Cutscene {
    stage: Stage,
    store: PolylineStore,
    tentacles: TentacleField,
    fades: FadePlayer,
    events: Vec<Event>,
    elapsed: Duration,
    frame_index: u64,
}

impl Cutscene {
    /// Builds the stage, geometry store and systems described by the scene.
    pub(crate) fn from_scene(scene: &SceneFile) -> Result<Self> {
        let mut stage = Stage::with_volume_channels(&scene.volume_channels());
        let slots = scene
            .anchors
            .iter()
            .map(|entry| match entry.pose() {
                Some(pose) => Ok(TentacleSlot::anchored(stage.add_anchor(pose)?, entry.shape())),
                None => Ok(TentacleSlot::unanchored(entry.shape())),
            })
            .collect::<Result<_, StageError>>()
            .context("failed to place scene anchors")?;

        let tentacles = TentacleField::new(Config::new(scene.field, slots, scene.seed))
            .context("invalid tentacle field configuration")?;
        let fades = FadePlayer::new(
            scene.fades.chromatic_aberration,
            scene.fades.vignette,
        )
        .context("invalid fade configuration")?;

        Ok(Self {
            stage,
            store: PolylineStore::new(),
            tentacles,
            fades,
            events: Vec::new(),
            elapsed: Duration::ZERO,
            frame_index: 0,
        })
    }

    /// Applies commands to every system and returns the events they reported.
    pub(crate) fn apply(&mut self, commands: &[Command]) -> &[Event] {
        self.events.clear();
        for command in commands {
            if let Command::Tick { dt } = command {
                self.elapsed = self.elapsed.saturating_add(*dt);
                self.frame_index = self.frame_index.saturating_add(1);
            }
        }

        self.tentacles
            .handle(commands, &self.stage, &mut self.store, &mut self.events);
        self.fades.handle(commands, &mut self.stage, &mut self.events);

        for event in &self.events {
            log::debug!("frame {}: {event:?}", self.frame_index);
        }
        &self.events
    }

    /// Captures the current geometry and effect state.
    pub(crate) fn frame(&self) -> Frame {
        let effects = FadeChannel::ALL
            .into_iter()
            .filter_map(|channel| {
                query::effect(&self.stage, channel).map(|effect| EffectPresentation {
                    channel,
                    active: effect.active(),
                    intensity: effect.intensity(),
                })
            })
            .collect();

        Frame::capture(self.frame_index, self.elapsed, &self.store, effects)
    }
}
