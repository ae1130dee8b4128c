use std::collections::BTreeMap;

use foundation::geo::{GeoBounds, LonLat};
use foundation::ids::BuildingId;
use markers::visual::{MarkerDiff, MarkerVisual};

use crate::camera::CameraPose;

/// Contract between the engine and the external map rendering surface.
///
/// The engine never reaches into rendering internals; the surface owns the
/// opaque handle for every drawn marker and applies visual sets
/// declaratively. `jump_to` is instantaneous (no animation) and is the only
/// camera call made when markers are merely recolored, so filter adjustments
/// never disturb the operator's viewpoint.
///
/// Any map engine satisfying this contract is substitutable.
pub trait MapSurface: Send {
    /// Animated move to a single point.
    fn fly_to(&mut self, center: LonLat, zoom: f64);

    /// Animated fit around `bounds`, never zooming in past `max_zoom`.
    fn fit_bounds(&mut self, bounds: GeoBounds, max_zoom: f64);

    /// Instantaneous pose restore, no animation.
    fn jump_to(&mut self, pose: CameraPose);

    /// Current camera pose, read back before a recolor so it can be
    /// restored afterwards.
    fn pose(&self) -> CameraPose;

    /// Replaces the drawn marker set with `visuals`. Implementations diff
    /// against what they already drew and apply the minimal
    /// add/update/remove step.
    fn render_markers(&mut self, visuals: &[MarkerVisual]);

    /// Removes every drawn marker.
    fn clear_markers(&mut self);
}

/// One recorded surface call, for assertions and headless traces.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    FlyTo { center: LonLat, zoom: f64 },
    FitBounds { bounds: GeoBounds, max_zoom: f64 },
    JumpTo(CameraPose),
    RenderMarkers { added: usize, updated: usize, removed: usize },
    ClearMarkers,
}

/// Headless `MapSurface` that tracks pose and drawn markers by id.
///
/// Each `render_markers` applies the minimal diff against what is already
/// drawn, mirroring how a browser adapter adds, restyles, and removes marker
/// elements. Used by tests and by hosts that poll engine state instead of
/// owning a rendering canvas.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pose: CameraPose,
    drawn: BTreeMap<BuildingId, MarkerVisual>,
    calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Count of camera moves (fly/fit), excluding instantaneous restores.
    pub fn camera_moves(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SurfaceCall::FlyTo { .. } | SurfaceCall::FitBounds { .. }))
            .count()
    }

    pub fn drawn_len(&self) -> usize {
        self.drawn.len()
    }

    pub fn drawn_visual(&self, id: &BuildingId) -> Option<&MarkerVisual> {
        self.drawn.get(id)
    }

    pub fn drawn_visuals(&self) -> Vec<MarkerVisual> {
        self.drawn.values().cloned().collect()
    }
}

impl MapSurface for RecordingSurface {
    fn fly_to(&mut self, center: LonLat, zoom: f64) {
        self.pose.center = center;
        self.pose.zoom = zoom;
        self.calls.push(SurfaceCall::FlyTo { center, zoom });
    }

    fn fit_bounds(&mut self, bounds: GeoBounds, max_zoom: f64) {
        self.pose.center = bounds.center();
        // A real engine derives the fit zoom from the bounds; headless we
        // only honor the clamp.
        self.pose.zoom = self.pose.zoom.min(max_zoom);
        self.calls.push(SurfaceCall::FitBounds { bounds, max_zoom });
    }

    fn jump_to(&mut self, pose: CameraPose) {
        self.pose = pose;
        self.calls.push(SurfaceCall::JumpTo(pose));
    }

    fn pose(&self) -> CameraPose {
        self.pose
    }

    fn render_markers(&mut self, visuals: &[MarkerVisual]) {
        let prev = self.drawn_visuals();
        let diff = MarkerDiff::between(&prev, visuals);
        for id in &diff.removed {
            self.drawn.remove(id);
        }
        for visual in diff.added.iter().chain(diff.updated.iter()) {
            self.drawn.insert(visual.id.clone(), visual.clone());
        }
        self.calls.push(SurfaceCall::RenderMarkers {
            added: diff.added.len(),
            updated: diff.updated.len(),
            removed: diff.removed.len(),
        });
    }

    fn clear_markers(&mut self) {
        self.drawn.clear();
        self.calls.push(SurfaceCall::ClearMarkers);
    }
}

#[cfg(test)]
mod tests {
    use foundation::color::Hsl;
    use foundation::geo::{GeoBounds, LonLat};
    use foundation::ids::BuildingId;
    use markers::visual::MarkerVisual;

    use super::{MapSurface, RecordingSurface, SurfaceCall};
    use crate::camera::CameraPose;

    fn visual(id: &str, below: bool) -> MarkerVisual {
        MarkerVisual {
            id: BuildingId::new(id),
            color: Hsl::NEUTRAL_GRAY,
            below_threshold: below,
            selected: false,
        }
    }

    #[test]
    fn render_applies_a_minimal_diff() {
        let mut surface = RecordingSurface::new();
        surface.render_markers(&[visual("a", false), visual("b", false)]);
        surface.render_markers(&[visual("b", true), visual("c", false)]);

        assert_eq!(surface.drawn_len(), 2);
        assert!(surface.drawn_visual(&BuildingId::new("a")).is_none());
        assert!(surface.drawn_visual(&BuildingId::new("b")).unwrap().below_threshold);
        assert_eq!(
            surface.calls()[1],
            SurfaceCall::RenderMarkers {
                added: 1,
                updated: 1,
                removed: 1,
            }
        );
    }

    #[test]
    fn jump_to_restores_an_exact_pose() {
        let mut surface = RecordingSurface::new();
        let pose = CameraPose::new(LonLat::new(8.54, 47.37), 15.0, 30.0, 90.0);
        surface.jump_to(pose);
        assert_eq!(surface.pose(), pose);
        assert_eq!(surface.camera_moves(), 0);
    }

    #[test]
    fn fit_bounds_centers_and_honors_the_zoom_clamp() {
        let mut surface = RecordingSurface::new();
        surface.jump_to(CameraPose::new(LonLat::new(0.0, 0.0), 18.0, 0.0, 0.0));

        let bounds =
            GeoBounds::from_points([LonLat::new(8.5, 47.3), LonLat::new(8.6, 47.4)]).unwrap();
        surface.fit_bounds(bounds, 17.0);

        assert_eq!(surface.pose().center, bounds.center());
        assert!(surface.pose().zoom <= 17.0);
        assert_eq!(surface.camera_moves(), 1);
    }
}
