#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural tentacle field driven by cutscene cues.
//!
//! A spawn cue allocates one tentacle per anchored slot, drawing its final
//! length and travelling-wave parameters from the configured ranges. Every
//! tick then regrows each tentacle from its anchor's live pose and rewrites
//! the polyline held by the geometry sink. All tentacles share one wave epoch
//! and one growth ramp, both restarted by every spawn.

use std::time::Duration;

use cutscene_fx_core::{
    AnchorId, AnchorProvider, Command, ConfigError, Event, GeometryHandle, GeometrySink,
    TentacleFieldConfig, TentacleShapeConfig, TentacleSlot, ThicknessProfile,
};
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

mod shape;

pub use shape::{evaluate_segments, TentacleParams};

/// Configuration parameters required to construct the tentacle field.
#[derive(Clone, Debug)]
pub struct Config {
    field: TentacleFieldConfig,
    slots: Vec<TentacleSlot>,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration from sampling ranges, slots and a seed.
    #[must_use]
    pub fn new(field: TentacleFieldConfig, slots: Vec<TentacleSlot>, rng_seed: u64) -> Self {
        Self {
            field,
            slots,
            rng_seed,
        }
    }
}

/// A live tentacle produced by a spawn cue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TentacleInstance {
    anchor: AnchorId,
    shape: TentacleShapeConfig,
    params: TentacleParams,
    geometry: GeometryHandle,
}

impl TentacleInstance {
    /// Anchor the tentacle grows from.
    #[must_use]
    pub const fn anchor(&self) -> AnchorId {
        self.anchor
    }

    /// Shape settings of the slot that produced the tentacle.
    #[must_use]
    pub const fn shape(&self) -> TentacleShapeConfig {
        self.shape
    }

    /// Parameters drawn when the tentacle spawned.
    #[must_use]
    pub const fn params(&self) -> &TentacleParams {
        &self.params
    }

    /// Polyline owned by the tentacle inside the geometry sink.
    #[must_use]
    pub const fn geometry(&self) -> GeometryHandle {
        self.geometry
    }
}

/// Simulator that owns every live tentacle and the shared clocks.
#[derive(Debug)]
pub struct TentacleField<R = ChaCha8Rng> {
    field: TentacleFieldConfig,
    slots: Vec<TentacleSlot>,
    rng: R,
    instances: Vec<TentacleInstance>,
    wave_time: f32,
    growth_time: f32,
    scratch: Vec<Vec3>,
}

impl TentacleField<ChaCha8Rng> {
    /// Creates a field whose parameter draws come from a seeded ChaCha stream.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        Self::with_rng(config.field, config.slots, rng)
    }
}

impl<R: Rng> TentacleField<R> {
    /// Creates a field that draws spawn parameters from the provided generator.
    pub fn with_rng(
        field: TentacleFieldConfig,
        slots: Vec<TentacleSlot>,
        rng: R,
    ) -> Result<Self, ConfigError> {
        field.validate()?;
        Ok(Self {
            field,
            slots,
            rng,
            instances: Vec::new(),
            wave_time: 0.0,
            growth_time: 0.0,
            scratch: Vec::with_capacity(field.segment_count),
        })
    }

    /// Consumes cue commands, mutates the sink and reports what happened.
    ///
    /// Commands are applied in order, so a spawn followed by a tick in the
    /// same batch renders the first frame of the new tentacles.
    pub fn handle<A, G>(
        &mut self,
        commands: &[Command],
        anchors: &A,
        sink: &mut G,
        out: &mut Vec<Event>,
    ) where
        A: AnchorProvider + ?Sized,
        G: GeometrySink + ?Sized,
    {
        for command in commands {
            match *command {
                Command::SpawnTentacles => {
                    let count = self.spawn(sink);
                    out.push(Event::TentaclesSpawned { count });
                }
                Command::ClearTentacles => {
                    let released = self.clear(sink);
                    if released > 0 {
                        out.push(Event::TentaclesCleared { released });
                    }
                }
                Command::Tick { dt } => self.tick(dt, anchors, sink),
                Command::TriggerFade { .. } => {}
            }
        }
    }

    /// Replaces the live tentacles with a freshly sampled set.
    ///
    /// Returns the number of tentacles created. Slots without an anchor and
    /// slots the sink cannot allocate geometry for are skipped. Both clocks
    /// restart even when nothing spawns.
    pub fn spawn<G>(&mut self, sink: &mut G) -> usize
    where
        G: GeometrySink + ?Sized,
    {
        let _ = self.clear(sink);

        for slot in &self.slots {
            let Some(anchor) = slot.anchor else {
                continue;
            };

            let thickness = ThicknessProfile::tapered(slot.shape.thickness);
            let Some(geometry) = sink.allocate(self.field.segment_count, thickness) else {
                log::debug!("geometry sink refused tentacle for anchor {}", anchor.get());
                continue;
            };

            let params = TentacleParams::sample(&mut self.rng, &self.field);
            self.instances.push(TentacleInstance {
                anchor,
                shape: slot.shape,
                params,
                geometry,
            });
        }

        self.wave_time = 0.0;
        self.growth_time = 0.0;

        log::debug!(
            "spawned {} of {} tentacle slots",
            self.instances.len(),
            self.slots.len()
        );
        self.instances.len()
    }

    /// Releases every live tentacle and returns how many were released.
    ///
    /// The clocks keep their values; the next spawn resets them.
    pub fn clear<G>(&mut self, sink: &mut G) -> usize
    where
        G: GeometrySink + ?Sized,
    {
        let released = self.instances.len();
        for instance in self.instances.drain(..) {
            sink.release(instance.geometry);
        }
        released
    }

    /// Advances the shared clocks and rewrites every live polyline.
    ///
    /// Does nothing while no tentacle is alive. Tentacles whose geometry was
    /// invalidated or whose anchor vanished are skipped for the frame.
    pub fn tick<A, G>(&mut self, dt: Duration, anchors: &A, sink: &mut G)
    where
        A: AnchorProvider + ?Sized,
        G: GeometrySink + ?Sized,
    {
        if self.instances.is_empty() {
            return;
        }

        let dt = dt.as_secs_f32();
        self.wave_time += dt;
        if self.field.growth_duration > 0.0 {
            self.growth_time += dt;
        }
        let growth_factor = self.growth_factor();

        for instance in &self.instances {
            if !sink.is_live(instance.geometry) {
                continue;
            }
            let Some(pose) = anchors.anchor_pose(instance.anchor) else {
                continue;
            };

            evaluate_segments(
                pose,
                &instance.params,
                growth_factor,
                self.wave_time,
                self.field.segment_count,
                &mut self.scratch,
            );
            for (index, position) in self.scratch.iter().enumerate() {
                sink.write_point(instance.geometry, index, *position);
            }
        }
    }

    /// Fraction of their final length the tentacles currently render at.
    #[must_use]
    pub fn growth_factor(&self) -> f32 {
        if self.field.growth_duration > 0.0 {
            (self.growth_time / self.field.growth_duration).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Seconds of wave motion accumulated since the last spawn.
    #[must_use]
    pub fn wave_time(&self) -> f32 {
        self.wave_time
    }

    /// Seconds of growth accumulated since the last spawn.
    #[must_use]
    pub fn growth_time(&self) -> f32 {
        self.growth_time
    }

    /// Tentacles currently alive, in slot order.
    #[must_use]
    pub fn instances(&self) -> &[TentacleInstance] {
        &self.instances
    }

    /// Sampling ranges and sizing the field was built with.
    #[must_use]
    pub fn field_config(&self) -> &TentacleFieldConfig {
        &self.field
    }
}
