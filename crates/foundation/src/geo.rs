use serde::{Deserialize, Serialize};

/// Geographic position in degrees, longitude first (GeoJSON axis order).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Axis-aligned lon/lat bounding box.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min: LonLat,
    pub max: LonLat,
}

impl GeoBounds {
    pub fn around(point: LonLat) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Tight bounds around `points`, or `None` for an empty input.
    ///
    /// An empty input never yields a degenerate box.
    pub fn from_points(points: impl IntoIterator<Item = LonLat>) -> Option<Self> {
        let mut points = points.into_iter();
        let mut bounds = Self::around(points.next()?);
        for p in points {
            bounds.extend(p);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, p: LonLat) {
        self.min.lon = self.min.lon.min(p.lon);
        self.min.lat = self.min.lat.min(p.lat);
        self.max.lon = self.max.lon.max(p.lon);
        self.max.lat = self.max.lat.max(p.lat);
    }

    pub fn center(&self) -> LonLat {
        LonLat::new(
            (self.min.lon + self.max.lon) / 2.0,
            (self.min.lat + self.max.lat) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoBounds, LonLat};

    #[test]
    fn empty_input_has_no_bounds() {
        assert_eq!(GeoBounds::from_points(std::iter::empty()), None);
    }

    #[test]
    fn single_point_bounds_are_that_point() {
        let p = LonLat::new(8.54, 47.37);
        let b = GeoBounds::from_points([p]).unwrap();
        assert_eq!(b.min, p);
        assert_eq!(b.max, p);
        assert_eq!(b.center(), p);
    }

    #[test]
    fn bounds_grow_to_cover_all_points() {
        let b = GeoBounds::from_points([
            LonLat::new(8.5, 47.4),
            LonLat::new(8.6, 47.3),
            LonLat::new(8.4, 47.5),
        ])
        .unwrap();
        assert_eq!(b.min, LonLat::new(8.4, 47.3));
        assert_eq!(b.max, LonLat::new(8.6, 47.5));
        assert_eq!(b.center(), LonLat::new(8.5, 47.4));
    }
}
