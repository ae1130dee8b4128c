use serde::{Deserialize, Serialize};

/// Which hazard dimension is currently driving marker color and filtering.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskMode {
    Water,
    Wind,
}

/// Inclusive score domain for one risk mode.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScoreDomain {
    pub min: f64,
    pub max: f64,
}

/// Water scores are a 1-6 ordinal flood risk class.
pub const WATER_DOMAIN: ScoreDomain = ScoreDomain::new(1.0, 6.0);

/// Wind scores are a 25-38 km/h-derived storm gust class.
pub const WIND_DOMAIN: ScoreDomain = ScoreDomain::new(25.0, 38.0);

impl ScoreDomain {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, v: f64) -> f64 {
        v.clamp(self.min, self.max)
    }

    /// Position of `v` within the domain, in `[0, 1]`.
    ///
    /// The fixed domains are never zero-width, but a degenerate domain still
    /// maps everything to `0.0` rather than dividing by zero.
    pub fn normalize(&self, v: f64) -> f64 {
        let width = self.max - self.min;
        if width <= 0.0 {
            return 0.0;
        }
        (self.clamp(v) - self.min) / width
    }
}

impl RiskMode {
    pub fn domain(&self) -> ScoreDomain {
        match self {
            RiskMode::Water => WATER_DOMAIN,
            RiskMode::Wind => WIND_DOMAIN,
        }
    }
}

/// Per-building risk indices.
///
/// A missing score means the building was never rated for that hazard; it can
/// never match the filter while that mode is active.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskScores {
    pub water: Option<f64>,
    pub wind: Option<f64>,
}

impl RiskScores {
    pub fn new(water: Option<f64>, wind: Option<f64>) -> Self {
        Self { water, wind }
    }

    pub fn for_mode(&self, mode: RiskMode) -> Option<f64> {
        match mode {
            RiskMode::Water => self.water,
            RiskMode::Wind => self.wind,
        }
    }
}
