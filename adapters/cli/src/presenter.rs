use std::io::Write;

use anyhow::{Context, Result};
use cutscene_fx_core::FadeChannel;
use cutscene_fx_rendering::{Frame, FramePresenter};
use serde::Serialize;

/// Writes one JSON object per frame to the wrapped writer.
#[derive(Debug)]
pub(crate) struct JsonLinesPresenter<W> {
    writer: W,
}

impl<W: Write> JsonLinesPresenter<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> FramePresenter for JsonLinesPresenter<W> {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        let record = FrameRecord::from(frame);
        serde_json::to_writer(&mut self.writer, &record)
            .with_context(|| format!("failed to encode frame {}", frame.index))?;
        writeln!(self.writer).context("failed to terminate frame record")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush().context("failed to flush frame output")
    }
}

#[derive(Serialize)]
struct FrameRecord {
    frame: u64,
    time: f64,
    tentacles: Vec<TentacleRecord>,
    effects: Vec<EffectRecord>,
}

#[derive(Serialize)]
struct TentacleRecord {
    points: Vec<[f32; 3]>,
    widths: Vec<f32>,
}

#[derive(Serialize)]
struct EffectRecord {
    channel: &'static str,
    active: bool,
    intensity: f32,
}

impl From<&Frame> for FrameRecord {
    fn from(frame: &Frame) -> Self {
        Self {
            frame: frame.index,
            time: frame.elapsed.as_secs_f64(),
            tentacles: frame
                .polylines
                .iter()
                .map(|polyline| TentacleRecord {
                    points: polyline.points.iter().map(|point| point.to_array()).collect(),
                    widths: polyline.widths.clone(),
                })
                .collect(),
            effects: frame
                .effects
                .iter()
                .map(|effect| EffectRecord {
                    channel: channel_name(effect.channel),
                    active: effect.active,
                    intensity: effect.intensity,
                })
                .collect(),
        }
    }
}

fn channel_name(channel: FadeChannel) -> &'static str {
    match channel {
        FadeChannel::ChromaticAberration => "chromatic_aberration",
        FadeChannel::Vignette => "vignette",
    }
}
