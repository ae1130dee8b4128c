use std::collections::BTreeMap;

use foundation::geo::GeoBounds;
use foundation::ids::BuildingId;
use risk::{ThresholdFilter, color_for};

use crate::record::BuildingRecord;
use crate::visual::MarkerVisual;

#[derive(Debug, Clone)]
struct Entry {
    record: BuildingRecord,
    visual: MarkerVisual,
}

/// Result of a `load`: the fresh visual set plus how many duplicate ids were
/// collapsed, so callers can log the caller error.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub visuals: Vec<MarkerVisual>,
    pub duplicates: usize,
}

/// Authoritative set of building records and their derived visuals for one
/// load cycle.
///
/// Single-writer contract: every `MarkerVisual` mutation happens here, in one
/// pass per event-handling turn. Entries are keyed in a `BTreeMap` so
/// traversal (and therefore every returned visual set) has a stable order.
#[derive(Debug, Default, Clone)]
pub struct MarkerStore {
    entries: BTreeMap<BuildingId, Entry>,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entire set and recomputes every visual against `filter`.
    ///
    /// Duplicate ids are a caller error; they are collapsed deterministically
    /// last-wins and reported in the outcome. Selection flags start cleared —
    /// a load never carries a selection over.
    pub fn load(&mut self, records: Vec<BuildingRecord>, filter: &ThresholdFilter) -> LoadOutcome {
        self.entries.clear();
        let mut duplicates = 0usize;
        for record in records {
            let visual = Self::visual_for(&record, filter, false);
            let previous = self.entries.insert(
                record.id.clone(),
                Entry { record, visual },
            );
            if previous.is_some() {
                duplicates += 1;
            }
        }
        LoadOutcome {
            visuals: self.visuals(),
            duplicates,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Pure recomputation of every visual's color and threshold flag.
    ///
    /// Selection flags are preserved by id; with no records loaded this is a
    /// no-op returning an empty set. Never touches the camera.
    pub fn recompute(&mut self, filter: &ThresholdFilter) -> Vec<MarkerVisual> {
        for entry in self.entries.values_mut() {
            entry.visual = Self::visual_for(&entry.record, filter, entry.visual.selected);
        }
        self.visuals()
    }

    /// Rewrites every selection flag in one atomic pass.
    ///
    /// At most the single `selected` id ends up emphasized; every other
    /// marker loses the flag in the same pass.
    pub fn apply_selection(&mut self, selected: Option<&BuildingId>) {
        for (id, entry) in self.entries.iter_mut() {
            entry.visual.selected = selected == Some(id);
        }
    }

    pub fn visuals(&self) -> Vec<MarkerVisual> {
        self.entries.values().map(|e| e.visual.clone()).collect()
    }

    pub fn record(&self, id: &BuildingId) -> Option<&BuildingRecord> {
        self.entries.get(id).map(|e| &e.record)
    }

    pub fn contains(&self, id: &BuildingId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tight bounds around every loaded building, or `None` when empty.
    pub fn bounds(&self) -> Option<GeoBounds> {
        GeoBounds::from_points(self.entries.values().map(|e| e.record.coordinates))
    }

    /// Records currently matching the filter (not below threshold), in id
    /// order. Computed from the records directly so it never depends on when
    /// `recompute` last ran.
    pub fn matching(&self, filter: &ThresholdFilter) -> Vec<&BuildingRecord> {
        let mode = filter.mode();
        let threshold = filter.active_threshold();
        self.entries
            .values()
            .filter(|e| !color_for(e.record.risk_scores.for_mode(mode), mode, threshold).below_threshold)
            .map(|e| &e.record)
            .collect()
    }

    fn visual_for(
        record: &BuildingRecord,
        filter: &ThresholdFilter,
        selected: bool,
    ) -> MarkerVisual {
        let mode = filter.mode();
        let rc = color_for(
            record.risk_scores.for_mode(mode),
            mode,
            filter.active_threshold(),
        );
        MarkerVisual {
            id: record.id.clone(),
            color: rc.color,
            below_threshold: rc.below_threshold,
            selected,
        }
    }
}

#[cfg(test)]
mod tests {
    use foundation::color::Hsl;
    use foundation::geo::LonLat;
    use foundation::ids::BuildingId;
    use pretty_assertions::assert_eq;
    use risk::{RiskMode, RiskScores, ThresholdFilter};

    use super::MarkerStore;
    use crate::record::BuildingRecord;

    fn building(id: &str, water: Option<f64>, wind: Option<f64>) -> BuildingRecord {
        BuildingRecord::new(
            id,
            LonLat::new(8.54, 47.37),
            format!("Teststrasse {id}"),
            RiskScores::new(water, wind),
        )
    }

    fn water_filter(threshold: f64) -> ThresholdFilter {
        let mut f = ThresholdFilter::new();
        f.set_water_threshold(threshold);
        f
    }

    #[test]
    fn high_scores_color_and_low_scores_gray() {
        let mut store = MarkerStore::new();
        let outcome = store.load(
            vec![building("1", Some(6.0), None), building("2", Some(1.0), None)],
            &water_filter(3.0),
        );

        assert_eq!(outcome.duplicates, 0);
        let v1 = &outcome.visuals[0];
        assert_eq!(v1.id, BuildingId::new("1"));
        assert!(!v1.below_threshold);
        assert_eq!(v1.color.h, 0.0);

        let v2 = &outcome.visuals[1];
        assert!(v2.below_threshold);
        assert_eq!(v2.color, Hsl::NEUTRAL_GRAY);
    }

    #[test]
    fn duplicate_ids_collapse_last_wins() {
        let mut store = MarkerStore::new();
        let outcome = store.load(
            vec![building("1", Some(1.0), None), building("1", Some(6.0), None)],
            &water_filter(3.0),
        );

        assert_eq!(outcome.duplicates, 1);
        assert_eq!(store.len(), 1);
        let record = store.record(&BuildingId::new("1")).unwrap();
        assert_eq!(record.risk_scores.water, Some(6.0));
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut store = MarkerStore::new();
        store.load(
            vec![building("1", Some(4.0), Some(30.0)), building("2", Some(2.0), None)],
            &water_filter(3.0),
        );

        let filter = water_filter(2.5);
        let first = store.recompute(&filter);
        let second = store.recompute(&filter);
        assert_eq!(first, second);
    }

    #[test]
    fn recompute_with_no_records_is_a_noop() {
        let mut store = MarkerStore::new();
        assert!(store.recompute(&ThresholdFilter::new()).is_empty());
    }

    #[test]
    fn load_clear_load_round_trips() {
        let records = vec![building("1", Some(4.0), None), building("2", Some(2.0), None)];
        let filter = water_filter(3.0);

        let mut store = MarkerStore::new();
        let first = store.load(records.clone(), &filter);
        store.clear();
        assert!(store.is_empty());
        let second = store.load(records, &filter);
        assert_eq!(first, second);
    }

    #[test]
    fn mode_switch_uses_the_other_score() {
        let mut store = MarkerStore::new();
        let mut filter = ThresholdFilter::new();
        store.load(vec![building("1", Some(6.0), None)], &filter);

        filter.set_mode(RiskMode::Wind);
        let visuals = store.recompute(&filter);
        // No wind score: gray regardless of the (unused) water score.
        assert!(visuals[0].below_threshold);
        assert_eq!(visuals[0].color, Hsl::NEUTRAL_GRAY);
    }

    #[test]
    fn selection_flags_are_exclusive_and_survive_recompute() {
        let mut store = MarkerStore::new();
        let filter = water_filter(1.0);
        store.load(
            vec![building("1", Some(2.0), None), building("2", Some(5.0), None)],
            &filter,
        );

        let one = BuildingId::new("1");
        let two = BuildingId::new("2");
        store.apply_selection(Some(&one));
        store.apply_selection(Some(&two));
        let visuals = store.recompute(&filter);
        let selected: Vec<_> = visuals.iter().filter(|v| v.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, two);

        store.apply_selection(None);
        assert!(store.visuals().iter().all(|v| !v.selected));
    }

    #[test]
    fn matching_ignores_unscored_and_below_threshold_buildings() {
        let mut store = MarkerStore::new();
        let filter = water_filter(3.0);
        store.load(
            vec![
                building("1", Some(6.0), None),
                building("2", Some(1.0), None),
                building("3", None, Some(30.0)),
            ],
            &filter,
        );

        let matching = store.matching(&filter);
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].id, BuildingId::new("1"));
    }

    #[test]
    fn bounds_cover_all_loaded_buildings() {
        let mut store = MarkerStore::new();
        assert!(store.bounds().is_none());

        let mut a = building("a", Some(2.0), None);
        a.coordinates = LonLat::new(8.5, 47.3);
        let mut b = building("b", Some(2.0), None);
        b.coordinates = LonLat::new(8.6, 47.4);
        store.load(vec![a, b], &ThresholdFilter::new());

        let bounds = store.bounds().unwrap();
        assert_eq!(bounds.min, LonLat::new(8.5, 47.3));
        assert_eq!(bounds.max, LonLat::new(8.6, 47.4));
    }
}
