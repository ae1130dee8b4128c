use foundation::geo::LonLat;
use serde::Serialize;

/// Zoom used when flying to a single search hit.
pub const FOCUS_ZOOM: f64 = 16.0;

/// Upper zoom clamp for bounds fitting, so a tight cluster of buildings
/// never over-zooms past street level.
pub const MAX_FIT_ZOOM: f64 = 17.0;

/// Full camera pose of the map surface.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct CameraPose {
    pub center: LonLat,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

impl CameraPose {
    pub fn new(center: LonLat, zoom: f64, pitch: f64, bearing: f64) -> Self {
        Self {
            center,
            zoom,
            pitch,
            bearing,
        }
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            center: LonLat::new(0.0, 0.0),
            zoom: 1.0,
            pitch: 0.0,
            bearing: 0.0,
        }
    }
}
