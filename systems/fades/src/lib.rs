#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Timed post-processing fades triggered by cutscene cues.

use std::time::Duration;

use cutscene_fx_core::{Command, ConfigError, Event, FadeChannel, FadeConfig, PostProcessSink};

/// Progress of a single fade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fade {
    /// No fade is writing intensities.
    Idle,
    /// A fade is interpolating between two intensities.
    Running {
        /// Seconds elapsed since the fade was triggered.
        elapsed: f32,
        /// Seconds the fade lasts; always positive.
        duration: f32,
        /// Intensity at the start of the fade.
        from: f32,
        /// Intensity at the end of the fade.
        to: f32,
    },
}

/// Result of advancing a running fade by one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FadeStep {
    /// The fade is still running and produced an intermediate intensity.
    Progress(f32),
    /// The fade reached its end and produced the final intensity.
    Finished(f32),
}

impl Fade {
    /// Advances the fade, returning the intensity to write this frame.
    ///
    /// Returns `None` while idle.
    pub fn advance(&mut self, dt: f32) -> Option<FadeStep> {
        let Fade::Running {
            elapsed,
            duration,
            from,
            to,
        } = self
        else {
            return None;
        };

        *elapsed += dt;
        if *elapsed < *duration {
            let t = (*elapsed / *duration).clamp(0.0, 1.0);
            return Some(FadeStep::Progress(lerp(*from, *to, t)));
        }

        let to = *to;
        *self = Fade::Idle;
        Some(FadeStep::Finished(to))
    }

    /// Reports whether the fade is still interpolating.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, Fade::Running { .. })
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

#[derive(Clone, Copy, Debug)]
struct Track {
    channel: FadeChannel,
    config: FadeConfig,
    fade: Fade,
}

impl Track {
    fn new(channel: FadeChannel, config: FadeConfig) -> Self {
        Self {
            channel,
            config,
            fade: Fade::Idle,
        }
    }

    fn trigger<S>(&mut self, sink: &mut S, out: &mut Vec<Event>)
    where
        S: PostProcessSink + ?Sized,
    {
        if !sink.supports(self.channel) {
            log::debug!("volume has no {:?} override; fade skipped", self.channel);
            return;
        }

        let FadeConfig { from, to, duration } = self.config;
        sink.activate(self.channel);
        sink.set_intensity(self.channel, from);
        out.push(Event::FadeStarted {
            channel: self.channel,
            from,
            to,
        });

        if duration <= 0.0 {
            sink.set_intensity(self.channel, to);
            self.fade = Fade::Idle;
            out.push(Event::FadeCompleted {
                channel: self.channel,
            });
            return;
        }

        self.fade = Fade::Running {
            elapsed: 0.0,
            duration,
            from,
            to,
        };
    }

    fn tick<S>(&mut self, dt: f32, sink: &mut S, out: &mut Vec<Event>)
    where
        S: PostProcessSink + ?Sized,
    {
        match self.fade.advance(dt) {
            None => {}
            Some(FadeStep::Progress(intensity)) => sink.set_intensity(self.channel, intensity),
            Some(FadeStep::Finished(intensity)) => {
                sink.set_intensity(self.channel, intensity);
                out.push(Event::FadeCompleted {
                    channel: self.channel,
                });
            }
        }
    }
}

/// Plays the chromatic aberration and vignette fades.
#[derive(Clone, Debug)]
pub struct FadePlayer {
    tracks: [Track; 2],
}

impl Default for FadePlayer {
    fn default() -> Self {
        Self {
            tracks: [
                Track::new(
                    FadeChannel::ChromaticAberration,
                    FadeConfig::chromatic_aberration(),
                ),
                Track::new(FadeChannel::Vignette, FadeConfig::vignette()),
            ],
        }
    }
}

impl FadePlayer {
    /// Creates a player with explicit fade settings for both channels.
    pub fn new(
        chromatic_aberration: FadeConfig,
        vignette: FadeConfig,
    ) -> Result<Self, ConfigError> {
        chromatic_aberration.validate()?;
        vignette.validate()?;
        Ok(Self {
            tracks: [
                Track::new(FadeChannel::ChromaticAberration, chromatic_aberration),
                Track::new(FadeChannel::Vignette, vignette),
            ],
        })
    }

    /// Consumes cue commands and writes intensities into the sink.
    ///
    /// Triggering a channel that is already fading restarts it.
    pub fn handle<S>(&mut self, commands: &[Command], sink: &mut S, out: &mut Vec<Event>)
    where
        S: PostProcessSink + ?Sized,
    {
        for command in commands {
            match *command {
                Command::TriggerFade { channel } => self.track_mut(channel).trigger(sink, out),
                Command::Tick { dt } => self.tick(dt, sink, out),
                Command::SpawnTentacles | Command::ClearTentacles => {}
            }
        }
    }

    fn tick<S>(&mut self, dt: Duration, sink: &mut S, out: &mut Vec<Event>)
    where
        S: PostProcessSink + ?Sized,
    {
        let dt = dt.as_secs_f32();
        for track in &mut self.tracks {
            track.tick(dt, sink, out);
        }
    }

    /// Current progress of the channel's fade.
    #[must_use]
    pub fn fade(&self, channel: FadeChannel) -> Fade {
        self.track(channel).fade
    }

    fn track(&self, channel: FadeChannel) -> &Track {
        match channel {
            FadeChannel::ChromaticAberration => &self.tracks[0],
            FadeChannel::Vignette => &self.tracks[1],
        }
    }

    fn track_mut(&mut self, channel: FadeChannel) -> &mut Track {
        match channel {
            FadeChannel::ChromaticAberration => &mut self.tracks[0],
            FadeChannel::Vignette => &mut self.tracks[1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_fade_produces_nothing() {
        let mut fade = Fade::Idle;
        assert_eq!(fade.advance(0.5), None);
    }

    #[test]
    fn running_fade_interpolates_then_finishes_on_target() {
        let mut fade = Fade::Running {
            elapsed: 0.0,
            duration: 1.0,
            from: 0.0,
            to: 2.0,
        };

        assert_eq!(fade.advance(0.25), Some(FadeStep::Progress(0.5)));
        assert_eq!(fade.advance(0.25), Some(FadeStep::Progress(1.0)));
        assert_eq!(fade.advance(0.75), Some(FadeStep::Finished(2.0)));
        assert!(!fade.is_running());
        assert_eq!(fade.advance(0.25), None);
    }
}
