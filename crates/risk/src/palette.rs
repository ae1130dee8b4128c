use foundation::color::Hsl;

use crate::mode::RiskMode;

/// Hue at the low end of the ramp: green. The high end is 0 (red).
const HUE_LOW: f32 = 120.0;
const SATURATION: f32 = 80.0;
const LIGHTNESS: f32 = 50.0;

/// Derived display color for one marker under the active mode and threshold.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RiskColor {
    pub color: Hsl,
    pub below_threshold: bool,
}

impl RiskColor {
    /// Below-threshold markers are always the fixed neutral gray, regardless
    /// of their score.
    pub const fn filtered() -> Self {
        Self {
            color: Hsl::NEUTRAL_GRAY,
            below_threshold: true,
        }
    }
}

/// Maps a raw risk score to its display color.
///
/// Total over its whole input space: `None` and NaN scores count as
/// filtered-out (neutral gray, `below_threshold = true`), never as errors.
/// At/above-threshold scores are clamped into the mode's domain and mapped
/// onto a green→red hue ramp.
pub fn color_for(score: Option<f64>, mode: RiskMode, threshold: f64) -> RiskColor {
    let Some(score) = score else {
        return RiskColor::filtered();
    };
    if score.is_nan() || score < threshold {
        return RiskColor::filtered();
    }

    let t = mode.domain().normalize(score);
    let hue = HUE_LOW * (1.0 - t as f32);
    RiskColor {
        color: Hsl::new(hue, SATURATION, LIGHTNESS),
        below_threshold: false,
    }
}
