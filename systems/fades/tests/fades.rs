use std::time::Duration;

use cutscene_fx_core::{Command, ConfigError, Event, FadeChannel, FadeConfig};
use cutscene_fx_stage::{query, Stage};
use cutscene_fx_system_fades::{Fade, FadePlayer};

fn intensity(stage: &Stage, channel: FadeChannel) -> f32 {
    query::effect(stage, channel)
        .expect("effect present")
        .intensity()
}

fn tick(millis: u64) -> Command {
    Command::Tick {
        dt: Duration::from_millis(millis),
    }
}

#[test]
fn chromatic_fade_ramps_to_target_and_completes() {
    let mut stage = Stage::new();
    let mut player = FadePlayer::new(
        FadeConfig::new(0.0, 1.0, 1.0),
        FadeConfig::vignette(),
    )
    .expect("valid fades");
    let mut events = Vec::new();

    player.handle(
        &[Command::TriggerFade {
            channel: FadeChannel::ChromaticAberration,
        }],
        &mut stage,
        &mut events,
    );
    let effect = query::effect(&stage, FadeChannel::ChromaticAberration).expect("present");
    assert!(effect.active());
    assert_eq!(effect.intensity(), 0.0);
    assert_eq!(
        events,
        vec![Event::FadeStarted {
            channel: FadeChannel::ChromaticAberration,
            from: 0.0,
            to: 1.0,
        }]
    );

    events.clear();
    player.handle(&[tick(500)], &mut stage, &mut events);
    assert!((intensity(&stage, FadeChannel::ChromaticAberration) - 0.5).abs() < 1e-6);
    assert!(events.is_empty());

    player.handle(&[tick(500)], &mut stage, &mut events);
    assert_eq!(intensity(&stage, FadeChannel::ChromaticAberration), 1.0);
    assert_eq!(
        events,
        vec![Event::FadeCompleted {
            channel: FadeChannel::ChromaticAberration,
        }]
    );
    assert_eq!(player.fade(FadeChannel::ChromaticAberration), Fade::Idle);

    let untouched = query::effect(&stage, FadeChannel::Vignette).expect("present");
    assert!(!untouched.active(), "vignette was never triggered");
}

#[test]
fn zero_duration_fade_jumps_to_target() {
    let mut stage = Stage::new();
    let mut player = FadePlayer::new(
        FadeConfig::chromatic_aberration(),
        FadeConfig::new(0.2, 0.9, 0.0),
    )
    .expect("valid fades");
    let mut events = Vec::new();

    player.handle(
        &[Command::TriggerFade {
            channel: FadeChannel::Vignette,
        }],
        &mut stage,
        &mut events,
    );

    assert_eq!(intensity(&stage, FadeChannel::Vignette), 0.9);
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[1],
        Event::FadeCompleted {
            channel: FadeChannel::Vignette,
        }
    );
    assert!(!player.fade(FadeChannel::Vignette).is_running());
}

#[test]
fn retrigger_restarts_running_fade() {
    let mut stage = Stage::new();
    let mut player = FadePlayer::default();
    let mut events = Vec::new();
    let trigger = Command::TriggerFade {
        channel: FadeChannel::Vignette,
    };

    player.handle(&[trigger, tick(750)], &mut stage, &mut events);
    assert!(intensity(&stage, FadeChannel::Vignette) > 0.3);

    player.handle(&[trigger], &mut stage, &mut events);
    assert_eq!(intensity(&stage, FadeChannel::Vignette), 0.0);
    assert_eq!(
        player.fade(FadeChannel::Vignette),
        Fade::Running {
            elapsed: 0.0,
            duration: 1.0,
            from: 0.0,
            to: 0.5,
        }
    );
}

#[test]
fn missing_effect_makes_trigger_a_no_op() {
    let mut stage = Stage::with_volume_channels(&[FadeChannel::ChromaticAberration]);
    let mut player = FadePlayer::default();
    let mut events = Vec::new();

    player.handle(
        &[
            Command::TriggerFade {
                channel: FadeChannel::Vignette,
            },
            tick(100),
        ],
        &mut stage,
        &mut events,
    );

    assert!(events.is_empty());
    assert!(!player.fade(FadeChannel::Vignette).is_running());
    assert_eq!(query::effect(&stage, FadeChannel::Vignette), None);
}

#[test]
fn rejects_non_finite_settings() {
    let error = FadePlayer::new(
        FadeConfig::new(f32::NAN, 1.0, 1.0),
        FadeConfig::vignette(),
    )
    .expect_err("NaN intensity must be rejected");
    assert!(matches!(error, ConfigError::NonFinite { .. }));
}
