#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for cutscene effect adapters.

use std::time::Duration;

use anyhow::Result as AnyResult;
use cutscene_fx_core::{FadeChannel, GeometryHandle, GeometrySink, ThicknessProfile};
use glam::Vec3;

/// Fixed-length line strip with a root-to-tip width taper.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    points: Vec<Vec3>,
    thickness: ThicknessProfile,
}

impl Polyline {
    fn new(point_count: usize, thickness: ThicknessProfile) -> Self {
        Self {
            points: vec![Vec3::ZERO; point_count],
            thickness,
        }
    }

    /// World-space points from root to tip.
    #[must_use]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Width taper applied along the line.
    #[must_use]
    pub const fn thickness(&self) -> ThicknessProfile {
        self.thickness
    }

    /// Width drawn at the point with the given index.
    #[must_use]
    pub fn width_at_point(&self, index: usize) -> f32 {
        let last = self.points.len().saturating_sub(1).max(1);
        self.thickness.width_at(index as f32 / last as f32)
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    polyline: Option<Polyline>,
}

/// In-memory geometry sink backed by generational slots.
///
/// Released slots are recycled with a bumped generation so stale handles
/// never alias a newer polyline.
#[derive(Clone, Debug)]
pub struct PolylineStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    has_template: bool,
}

impl Default for PolylineStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PolylineStore {
    /// Creates an empty store able to allocate polylines.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            has_template: true,
        }
    }

    /// Creates a store that models a missing line template: every allocation fails.
    #[must_use]
    pub fn without_template() -> Self {
        Self {
            has_template: false,
            ..Self::new()
        }
    }

    /// Polyline referenced by the handle, if still live.
    #[must_use]
    pub fn polyline(&self, handle: GeometryHandle) -> Option<&Polyline> {
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.polyline.as_ref())
    }

    /// Number of live polylines.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.polyline.is_some())
            .count()
    }

    /// Iterates live polylines in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (GeometryHandle, &Polyline)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.polyline
                .as_ref()
                .map(|polyline| (GeometryHandle::new(index as u32, slot.generation), polyline))
        })
    }

    /// Destroys a polyline behind its owner's back, as a host scene might.
    ///
    /// Returns `true` when a live polyline was destroyed.
    pub fn invalidate(&mut self, handle: GeometryHandle) -> bool {
        if !self.is_live(handle) {
            return false;
        }
        self.release(handle);
        true
    }
}

impl GeometrySink for PolylineStore {
    fn allocate(
        &mut self,
        point_count: usize,
        thickness: ThicknessProfile,
    ) -> Option<GeometryHandle> {
        if !self.has_template {
            return None;
        }

        let polyline = Polyline::new(point_count, thickness);
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.polyline = Some(polyline);
            return Some(GeometryHandle::new(index, slot.generation));
        }

        let index = u32::try_from(self.slots.len()).ok()?;
        self.slots.push(Slot {
            generation: 0,
            polyline: Some(polyline),
        });
        Some(GeometryHandle::new(index, 0))
    }

    fn is_live(&self, handle: GeometryHandle) -> bool {
        self.polyline(handle).is_some()
    }

    fn write_point(&mut self, handle: GeometryHandle, index: usize, position: Vec3) {
        let Some(slot) = self.slots.get_mut(handle.index() as usize) else {
            return;
        };
        if slot.generation != handle.generation() {
            return;
        }
        if let Some(point) = slot
            .polyline
            .as_mut()
            .and_then(|polyline| polyline.points.get_mut(index))
        {
            *point = position;
        }
    }

    fn release(&mut self, handle: GeometryHandle) {
        let Some(slot) = self.slots.get_mut(handle.index() as usize) else {
            return;
        };
        if slot.generation != handle.generation() || slot.polyline.is_none() {
            return;
        }
        slot.polyline = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index());
    }
}

/// Snapshot of one polyline prepared for presentation.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePolyline {
    /// Handle the polyline is stored under.
    pub handle: GeometryHandle,
    /// World-space points from root to tip.
    pub points: Vec<Vec3>,
    /// Width at each point.
    pub widths: Vec<f32>,
}

/// Snapshot of a post-processing effect prepared for presentation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectPresentation {
    /// Effect the values belong to.
    pub channel: FadeChannel,
    /// Whether the effect override is enabled.
    pub active: bool,
    /// Current intensity override.
    pub intensity: f32,
}

/// Everything a presenter needs to draw a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Zero-based frame counter.
    pub index: u64,
    /// Host time elapsed since playback started.
    pub elapsed: Duration,
    /// Live polylines in slot order.
    pub polylines: Vec<FramePolyline>,
    /// Post-processing effects present in the volume.
    pub effects: Vec<EffectPresentation>,
}

impl Frame {
    /// Captures the live contents of the store alongside effect state.
    #[must_use]
    pub fn capture(
        index: u64,
        elapsed: Duration,
        store: &PolylineStore,
        effects: Vec<EffectPresentation>,
    ) -> Self {
        let polylines = store
            .iter()
            .map(|(handle, polyline)| FramePolyline {
                handle,
                points: polyline.points().to_vec(),
                widths: (0..polyline.points().len())
                    .map(|index| polyline.width_at_point(index))
                    .collect(),
            })
            .collect();

        Self {
            index,
            elapsed,
            polylines,
            effects,
        }
    }
}

/// Output backend that receives captured frames.
pub trait FramePresenter {
    /// Presents a captured frame.
    fn present(&mut self, frame: &Frame) -> AnyResult<()>;

    /// Flushes any buffered output once playback ends.
    fn finish(&mut self) -> AnyResult<()> {
        Ok(())
    }
}
