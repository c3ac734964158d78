#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the cutscene effect workspace.
//!
//! Hosts drive effect systems exclusively through [`Command`] values: the
//! argument-free "spawn tentacles" and "clear tentacles" cues, fade triggers,
//! and one [`Command::Tick`] per frame. Systems answer with [`Event`] values
//! and touch the host only through the capability traits defined here:
//! [`AnchorProvider`] for live anchor poses, [`GeometrySink`] for renderable
//! polylines and [`PostProcessSink`] for screen-space effect parameters.

use std::time::Duration;

use glam::{Quat, Vec3};

mod config;

pub use config::{
    ConfigError, FadeConfig, TentacleFieldConfig, TentacleShapeConfig, TentacleSlot, ValueRange,
};

/// Width written at the tip of every tentacle polyline.
pub const TIP_THICKNESS: f32 = 0.01;

/// Commands that express every cue a host may send to the effect systems.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Replaces any live tentacles with a freshly sampled set.
    SpawnTentacles,
    /// Releases every live tentacle.
    ClearTentacles,
    /// Starts (or restarts) the fade configured for the channel.
    TriggerFade {
        /// Post-processing effect whose intensity should be faded.
        channel: FadeChannel,
    },
    /// Advances every effect clock by the provided frame delta.
    Tick {
        /// Duration of host time that elapsed since the previous frame.
        dt: Duration,
    },
}

/// Events reported by systems after processing commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a spawn cue produced the given number of tentacles.
    TentaclesSpawned {
        /// Number of tentacles now alive; zero is a valid outcome.
        count: usize,
    },
    /// Confirms that live tentacles were released.
    TentaclesCleared {
        /// Number of geometry objects handed back to the sink.
        released: usize,
    },
    /// Announces that a fade began writing intensities.
    FadeStarted {
        /// Channel being faded.
        channel: FadeChannel,
        /// Intensity written when the fade started.
        from: f32,
        /// Intensity the fade settles on.
        to: f32,
    },
    /// Announces that a fade wrote its final intensity.
    FadeCompleted {
        /// Channel that finished fading.
        channel: FadeChannel,
    },
}

/// Screen-space post-processing effects that support timed fades.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FadeChannel {
    /// Chromatic aberration intensity.
    ChromaticAberration,
    /// Vignette intensity.
    Vignette,
}

impl FadeChannel {
    /// Every channel in presentation order.
    pub const ALL: [FadeChannel; 2] = [FadeChannel::ChromaticAberration, FadeChannel::Vignette];
}

/// Identifier of an anchor slot owned by the host scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(u32);

impl AnchorId {
    /// Creates a new anchor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// World-space pose a tentacle grows from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorPose {
    /// World-space position of the tentacle root.
    pub position: Vec3,
    /// World-space orientation of the anchor.
    pub orientation: Quat,
}

impl AnchorPose {
    /// Creates a pose from a position and orientation.
    #[must_use]
    pub const fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Creates an unrotated pose whose growth direction is `+Y`.
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Unit vector along the anchor's local up axis.
    ///
    /// A degenerate orientation yields the zero vector, which collapses the
    /// tentacle onto its root instead of producing NaN positions.
    #[must_use]
    pub fn growth_direction(&self) -> Vec3 {
        (self.orientation * Vec3::Y).normalize_or_zero()
    }

    /// Axis the travelling wave displaces segments along.
    ///
    /// This is the growth direction rotated 90° inside the XY plane; the Z
    /// component of the growth direction never contributes.
    #[must_use]
    pub fn lateral_axis(&self) -> Vec3 {
        let direction = self.growth_direction();
        Vec3::new(-direction.y, direction.x, 0.0)
    }
}

/// Linear width taper applied along a polyline from root to tip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThicknessProfile {
    root: f32,
    tip: f32,
}

impl ThicknessProfile {
    /// Creates a taper from `root` at the first point down to [`TIP_THICKNESS`].
    #[must_use]
    pub const fn tapered(root: f32) -> Self {
        Self {
            root,
            tip: TIP_THICKNESS,
        }
    }

    /// Width at the root of the polyline.
    #[must_use]
    pub const fn root(&self) -> f32 {
        self.root
    }

    /// Width at the tip of the polyline.
    #[must_use]
    pub const fn tip(&self) -> f32 {
        self.tip
    }

    /// Width at parametric position `t`, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn width_at(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        self.root * (1.0 - t) + self.tip * t
    }
}

/// Handle to a renderable polyline owned by a [`GeometrySink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeometryHandle {
    index: u32,
    generation: u32,
}

impl GeometryHandle {
    /// Creates a handle from a slot index and the slot's generation counter.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index inside the owning sink.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot at allocation time.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

/// Live query surface for anchor poses owned by the host.
pub trait AnchorProvider {
    /// Current world-space pose of the anchor, or `None` when it no longer exists.
    fn anchor_pose(&self, anchor: AnchorId) -> Option<AnchorPose>;
}

/// Renderer-side storage for fixed-length polylines.
///
/// Systems only allocate, overwrite points and release; they never read
/// positions back.
pub trait GeometrySink {
    /// Allocates a polyline with `point_count` points and the given taper.
    ///
    /// Returns `None` when the sink has no template to instantiate from.
    fn allocate(&mut self, point_count: usize, thickness: ThicknessProfile)
        -> Option<GeometryHandle>;

    /// Reports whether the handle still refers to a live polyline.
    fn is_live(&self, handle: GeometryHandle) -> bool;

    /// Overwrites the point at `index`. Writes to dead handles are ignored.
    fn write_point(&mut self, handle: GeometryHandle, index: usize, position: Vec3);

    /// Destroys the polyline. Releasing a dead handle is a no-op.
    fn release(&mut self, handle: GeometryHandle);
}

/// Screen-space post-processing parameters exposed by the host volume.
pub trait PostProcessSink {
    /// Reports whether the volume profile carries the channel's effect.
    fn supports(&self, channel: FadeChannel) -> bool;

    /// Enables the channel's effect override.
    fn activate(&mut self, channel: FadeChannel);

    /// Overrides the channel's intensity.
    fn set_intensity(&mut self, channel: FadeChannel, intensity: f32);
}
