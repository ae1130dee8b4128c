use std::collections::BTreeMap;

use foundation::color::Hsl;
use foundation::ids::BuildingId;
use serde::Serialize;

/// Derived visual state for one marker. Recomputed, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerVisual {
    pub id: BuildingId,
    pub color: Hsl,
    pub below_threshold: bool,
    pub selected: bool,
}

/// Minimal declarative step between two visual sets, keyed by building id.
///
/// Rendering adapters apply this instead of mutating drawn markers in place;
/// the adapter owns the opaque handle for each drawn marker.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MarkerDiff {
    pub added: Vec<MarkerVisual>,
    pub updated: Vec<MarkerVisual>,
    pub removed: Vec<BuildingId>,
}

impl MarkerDiff {
    /// Computes the add/update/remove step from `prev` to `next`.
    ///
    /// `added` and `updated` follow the order of `next`; `removed` follows
    /// the order of `prev`.
    pub fn between(prev: &[MarkerVisual], next: &[MarkerVisual]) -> Self {
        let prev_by_id: BTreeMap<&BuildingId, &MarkerVisual> =
            prev.iter().map(|v| (&v.id, v)).collect();
        let next_ids: BTreeMap<&BuildingId, ()> = next.iter().map(|v| (&v.id, ())).collect();

        let mut diff = MarkerDiff::default();
        for visual in next {
            match prev_by_id.get(&visual.id) {
                None => diff.added.push(visual.clone()),
                Some(old) if *old != visual => diff.updated.push(visual.clone()),
                Some(_) => {}
            }
        }
        for visual in prev {
            if !next_ids.contains_key(&visual.id) {
                diff.removed.push(visual.id.clone());
            }
        }
        diff
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}
