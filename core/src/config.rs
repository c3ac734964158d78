use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::AnchorId;

/// Inclusive range that spawn-time parameters are drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    /// Smallest value that may be drawn.
    pub min: f32,
    /// Largest value that may be drawn.
    pub max: f32,
}

impl ValueRange {
    /// Creates a new inclusive range.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Range that always yields `value`.
    #[must_use]
    pub const fn fixed(value: f32) -> Self {
        Self::new(value, value)
    }

    /// Reports whether `value` lies inside the inclusive range.
    #[must_use]
    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn validate(&self, parameter: &'static str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ConfigError::NonFinite { parameter });
        }
        if self.min > self.max {
            return Err(ConfigError::InvertedRange {
                parameter,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Process-wide sampling ranges and sizing for every spawned tentacle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TentacleFieldConfig {
    /// Number of points in each tentacle polyline; at least two.
    pub segment_count: usize,
    /// Final reach of a fully grown tentacle.
    pub length: ValueRange,
    /// Peak lateral displacement of the travelling wave at the root.
    pub wave_amplitude: ValueRange,
    /// Wave cycles along the tentacle, scaled by 2π into an angular frequency.
    pub wave_frequency: ValueRange,
    /// Angular speed the wave travels with, in radians per second.
    pub wave_speed: ValueRange,
    /// Seconds a tentacle takes to reach its final length; `<= 0` grows instantly.
    pub growth_duration: f32,
}

impl Default for TentacleFieldConfig {
    fn default() -> Self {
        Self {
            segment_count: 24,
            length: ValueRange::new(2.0, 3.0),
            wave_amplitude: ValueRange::new(0.2, 0.6),
            wave_frequency: ValueRange::new(1.5, 3.5),
            wave_speed: ValueRange::new(1.0, 2.5),
            growth_duration: 1.0,
        }
    }
}

impl TentacleFieldConfig {
    /// Checks the configuration before any tentacle is spawned from it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segment_count < 2 {
            return Err(ConfigError::TooFewSegments {
                segment_count: self.segment_count,
            });
        }
        self.length.validate("length")?;
        self.wave_amplitude.validate("wave_amplitude")?;
        self.wave_frequency.validate("wave_frequency")?;
        self.wave_speed.validate("wave_speed")?;
        if self.growth_duration.is_nan() || self.growth_duration == f32::INFINITY {
            return Err(ConfigError::NonFinite {
                parameter: "growth_duration",
            });
        }
        Ok(())
    }
}

/// Static per-slot shape settings shared by every spawn.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TentacleShapeConfig {
    /// Polyline width at the root.
    pub thickness: f32,
}

impl Default for TentacleShapeConfig {
    fn default() -> Self {
        Self { thickness: 0.25 }
    }
}

/// Configured tentacle slot: an optional anchor plus its shape.
///
/// Slots without an anchor are kept so slot order matches the host's list,
/// but they never produce a tentacle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TentacleSlot {
    /// Anchor the tentacle grows from, if the host assigned one.
    pub anchor: Option<AnchorId>,
    /// Static shape settings for the slot.
    pub shape: TentacleShapeConfig,
}

impl TentacleSlot {
    /// Creates a slot bound to the provided anchor.
    #[must_use]
    pub const fn anchored(anchor: AnchorId, shape: TentacleShapeConfig) -> Self {
        Self {
            anchor: Some(anchor),
            shape,
        }
    }

    /// Creates a slot whose anchor reference is missing.
    #[must_use]
    pub const fn unanchored(shape: TentacleShapeConfig) -> Self {
        Self {
            anchor: None,
            shape,
        }
    }
}

/// Start value, end value and duration of a single post-processing fade.
///
/// Missing fields fall back to the chromatic aberration defaults.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeConfig {
    /// Intensity written when the fade is triggered.
    pub from: f32,
    /// Intensity written once the fade finishes.
    pub to: f32,
    /// Seconds the fade lasts; `<= 0` jumps straight to `to`.
    pub duration: f32,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self::chromatic_aberration()
    }
}

impl FadeConfig {
    /// Creates a new fade description.
    #[must_use]
    pub const fn new(from: f32, to: f32, duration: f32) -> Self {
        Self { from, to, duration }
    }

    /// Default chromatic aberration fade: 0 to 1 over one second.
    #[must_use]
    pub const fn chromatic_aberration() -> Self {
        Self::new(0.0, 1.0, 1.0)
    }

    /// Default vignette fade: 0 to 0.5 over one second.
    #[must_use]
    pub const fn vignette() -> Self {
        Self::new(0.0, 0.5, 1.0)
    }

    /// Checks that every value is a finite number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.from.is_finite() || !self.to.is_finite() {
            return Err(ConfigError::NonFinite {
                parameter: "fade intensity",
            });
        }
        if self.duration.is_nan() || self.duration == f32::INFINITY {
            return Err(ConfigError::NonFinite {
                parameter: "fade duration",
            });
        }
        Ok(())
    }
}

/// Reasons a configuration is rejected at construction time.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Fewer than two segments leaves the parametric position undefined.
    #[error("tentacles need at least two segments, got {segment_count}")]
    TooFewSegments {
        /// Segment count found in the configuration.
        segment_count: usize,
    },
    /// A sampling range has its bounds swapped.
    #[error("{parameter} range is inverted: min {min} exceeds max {max}")]
    InvertedRange {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Configured lower bound.
        min: f32,
        /// Configured upper bound.
        max: f32,
    },
    /// A value is NaN or infinite.
    #[error("{parameter} must be a finite number")]
    NonFinite {
        /// Name of the offending parameter.
        parameter: &'static str,
    },
}
