#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a cutscene headlessly and streams frames as JSON lines.

mod cutscene;
mod presenter;
mod scene;

use std::{io, path::PathBuf, time::Duration};

use anyhow::{ensure, Result};
use clap::Parser;
use cutscene_fx_core::{Command, FadeChannel};
use cutscene_fx_rendering::FramePresenter;

use crate::{cutscene::Cutscene, presenter::JsonLinesPresenter, scene::SceneFile};

/// Plays the tentacle and fade cues of a cutscene at a fixed frame rate.
#[derive(Debug, Parser)]
#[command(name = "cutscene-fx", version)]
struct CliArgs {
    /// TOML scene file; the built-in four-corner scene is used when omitted.
    #[arg(long)]
    scene: Option<PathBuf>,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 120)]
    frames: u64,
    /// Frames per second used to derive the fixed frame delta.
    #[arg(long, default_value_t = 60)]
    frame_rate: u32,
    /// Frame at which the tentacles are cleared.
    #[arg(long)]
    clear_at: Option<u64>,
    /// Overrides the scene's random seed.
    #[arg(long)]
    seed: Option<u64>,
}

/// Entry point for the cutscene effect command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = CliArgs::parse();
    ensure!(args.frame_rate > 0, "frame rate must be positive");

    let mut scene = match &args.scene {
        Some(path) => SceneFile::load(path)?,
        None => SceneFile::default(),
    };
    if let Some(seed) = args.seed {
        scene.seed = seed;
    }

    let dt = Duration::from_secs_f64(1.0 / f64::from(args.frame_rate));
    let mut cutscene = Cutscene::from_scene(&scene)?;
    let mut presenter = JsonLinesPresenter::new(io::stdout().lock());

    let spawned = cutscene.apply(&[
        Command::SpawnTentacles,
        Command::TriggerFade {
            channel: FadeChannel::ChromaticAberration,
        },
        Command::TriggerFade {
            channel: FadeChannel::Vignette,
        },
    ]);
    log::info!("cutscene started with {} cue events", spawned.len());

    for frame in 0..args.frames {
        if args.clear_at == Some(frame) {
            let _ = cutscene.apply(&[Command::ClearTentacles]);
        }
        let _ = cutscene.apply(&[Command::Tick { dt }]);
        presenter.present(&cutscene.frame())?;
    }

    presenter.finish()
}
