use serde::{Deserialize, Serialize};

/// HSL color: hue in degrees, saturation and lightness in percent.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    /// Neutral gray shown for markers filtered out of the active mode.
    pub const NEUTRAL_GRAY: Hsl = Hsl::new(0.0, 0.0, 60.0);

    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    /// CSS `hsl()` functional notation.
    pub fn to_css(&self) -> String {
        format!("hsl({}, {}%, {}%)", self.h, self.s, self.l)
    }
}

#[cfg(test)]
mod tests {
    use super::Hsl;

    #[test]
    fn css_notation_matches_component_order() {
        assert_eq!(Hsl::new(120.0, 80.0, 50.0).to_css(), "hsl(120, 80%, 50%)");
        assert_eq!(Hsl::NEUTRAL_GRAY.to_css(), "hsl(0, 0%, 60%)");
    }
}
