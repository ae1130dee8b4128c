use claims::{
    ClaimView, ClaimsError, ClaimsLoader, ClaimsRepository, ClaimsState, FetchTicket,
    fetch_claim_views,
};
use foundation::ids::BuildingId;
use markers::{BuildingRecord, MarkerStore, MarkerVisual, Selection, SelectionChange};
use risk::{RiskMode, RiskScores, ThresholdFilter};
use serde::Serialize;
use tracing::{debug, info, warn};
use viewport::{CameraPose, FOCUS_ZOOM, MAX_FIT_ZOOM, MapSurface};

use crate::events::{EngineEvent, EventLog};
use crate::notify::{MatchingProperty, NotificationSummary};

const EVENT_LOG_CAPACITY: usize = 256;

/// Risk detail for the selected building.
///
/// Always carries the true scores for both modes; the filter state only
/// affects marker color, never what the detail panel reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingDetail {
    pub id: BuildingId,
    pub address: String,
    pub risk_scores: RiskScores,
}

/// The risk visualization and marker filtering engine.
///
/// Every public method is one event-handling turn: visual recomputation is
/// synchronous within the turn, and no partially applied state is observable
/// between turns. Async claim results re-enter through [`apply_claims`],
/// which drops anything superseded since its ticket was issued.
///
/// Single-writer contract: the store is the only mutator of marker visuals,
/// and only the engine's turn methods trigger recomputes or selection
/// transitions.
///
/// [`apply_claims`]: RiskEngine::apply_claims
pub struct RiskEngine<S: MapSurface> {
    store: MarkerStore,
    filter: ThresholdFilter,
    selection: Selection,
    loader: ClaimsLoader,
    surface: S,
    events: EventLog,
    turn: u64,
}

impl<S: MapSurface> RiskEngine<S> {
    pub fn new(surface: S) -> Self {
        Self {
            store: MarkerStore::new(),
            filter: ThresholdFilter::new(),
            selection: Selection::new(),
            loader: ClaimsLoader::new(),
            surface,
            events: EventLog::new(EVENT_LOG_CAPACITY),
            turn: 0,
        }
    }

    /// Replaces the marker set with a new search result.
    ///
    /// Clears the selection and any in-flight claims fetch, renders the new
    /// visuals, and drives the camera: one building is flown to directly,
    /// several are fitted (clamped so a tight cluster never over-zooms), and
    /// an empty result moves the camera not at all.
    pub fn load_buildings(&mut self, records: Vec<BuildingRecord>) {
        let turn = self.begin_turn();
        let outcome = self.store.load(records, &self.filter);
        if outcome.duplicates > 0 {
            warn!(
                duplicates = outcome.duplicates,
                "duplicate building ids in load; collapsed last-wins"
            );
        }
        self.selection.clear();
        self.loader.cancel();

        self.surface.render_markers(&outcome.visuals);
        if let Some(bounds) = self.store.bounds() {
            if self.store.len() == 1 {
                self.surface.fly_to(bounds.center(), FOCUS_ZOOM);
            } else {
                self.surface.fit_bounds(bounds, MAX_FIT_ZOOM);
            }
        }

        info!(count = self.store.len(), "buildings loaded");
        self.events
            .record(turn, "load", format!("{} buildings", self.store.len()));
    }

    /// Empties the marker set, the selection, and the claims panel.
    pub fn clear(&mut self) {
        let turn = self.begin_turn();
        self.store.clear();
        self.selection.clear();
        self.loader.cancel();
        self.surface.clear_markers();
        self.events.record(turn, "clear", "marker set cleared");
    }

    /// Switches the displayed risk dimension.
    pub fn set_mode(&mut self, mode: RiskMode) {
        let turn = self.begin_turn();
        if self.filter.set_mode(mode) {
            self.recolor(turn);
        }
    }

    /// Moves the water threshold. Storing an unchanged (or non-finite) value
    /// is coalesced away; every observed change recomputes exactly once, so
    /// the final value of a slider drag always lands.
    pub fn set_water_threshold(&mut self, value: f64) {
        let turn = self.begin_turn();
        if self.filter.set_water_threshold(value) {
            self.recolor(turn);
        }
    }

    /// Moves the wind threshold. Same coalescing as the water setter.
    pub fn set_wind_threshold(&mut self, value: f64) {
        let turn = self.begin_turn();
        if self.filter.set_wind_threshold(value) {
            self.recolor(turn);
        }
    }

    /// Applies one marker click.
    ///
    /// Returns a fetch ticket when a claims fetch must start for the new
    /// selection; `None` on toggle-off. An id that doesn't resolve to a
    /// loaded building fails fast in debug builds and degrades to
    /// unselected in release builds.
    pub fn click_marker(&mut self, id: &BuildingId) -> Option<FetchTicket> {
        let turn = self.begin_turn();
        if !self.store.contains(id) {
            debug_assert!(false, "click for unknown building id {id}");
            warn!(%id, "click for unknown building id; treating as deselect");
            self.apply_deselect(turn);
            return None;
        }

        match self.selection.click(id.clone()) {
            SelectionChange::Selected(selected) => {
                self.store.apply_selection(Some(&selected));
                self.surface.render_markers(&self.store.visuals());
                let ticket = self.loader.begin(selected.clone());
                debug!(%selected, "marker selected");
                self.events.record(turn, "select", selected.to_string());
                Some(ticket)
            }
            SelectionChange::Cleared => {
                self.apply_deselect(turn);
                None
            }
        }
    }

    /// Forces the unselected state and clears the claims panel.
    pub fn deselect(&mut self) {
        let turn = self.begin_turn();
        self.apply_deselect(turn);
    }

    /// Applies a finished claims fetch.
    ///
    /// Returns `false` when the ticket was superseded by a later selection
    /// change; the stale result is dropped without touching current state.
    pub fn apply_claims(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<ClaimView>, ClaimsError>,
    ) -> bool {
        let turn = self.begin_turn();
        let applied = self.loader.apply(ticket, result);
        if applied {
            self.events
                .record(turn, "claims", ticket.building().to_string());
        } else {
            debug!(building = %ticket.building(), "stale claims result dropped");
            self.events
                .record(turn, "claims-stale", ticket.building().to_string());
        }
        applied
    }

    /// Click, fetch, and apply in one call.
    ///
    /// The fetch is still generation-guarded, so concurrent callers can race
    /// this safely; the result of a superseded call is discarded. Returns
    /// whether a fetch result was applied.
    pub async fn select_and_load(
        &mut self,
        repo: &dyn ClaimsRepository,
        id: &BuildingId,
    ) -> bool {
        let Some(ticket) = self.click_marker(id) else {
            return false;
        };
        let result = fetch_claim_views(repo, ticket.building()).await;
        self.apply_claims(&ticket, result)
    }

    pub fn visuals(&self) -> Vec<MarkerVisual> {
        self.store.visuals()
    }

    /// Whether `id` resolves to a loaded building. Hosts exposing the engine
    /// to untrusted callers validate against this before clicking.
    pub fn has_building(&self, id: &BuildingId) -> bool {
        self.store.contains(id)
    }

    pub fn filter(&self) -> &ThresholdFilter {
        &self.filter
    }

    pub fn selected(&self) -> Option<&BuildingId> {
        self.selection.selected()
    }

    pub fn claims(&self) -> &ClaimsState {
        self.loader.state()
    }

    pub fn camera_pose(&self) -> CameraPose {
        self.surface.pose()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Risk detail for the selected building, independent of filter state.
    pub fn selected_detail(&self) -> Option<BuildingDetail> {
        let id = self.selection.selected()?;
        let record = self.store.record(id)?;
        Some(BuildingDetail {
            id: record.id.clone(),
            address: record.address.clone(),
            risk_scores: record.risk_scores,
        })
    }

    /// Count and addresses of the buildings currently matching the filter,
    /// for the outbound "send info" action.
    pub fn notification_summary(&self) -> NotificationSummary {
        NotificationSummary {
            mode: self.filter.mode(),
            threshold: self.filter.active_threshold(),
            matching: self
                .store
                .matching(&self.filter)
                .into_iter()
                .map(|r| MatchingProperty {
                    id: r.id.clone(),
                    address: r.address.clone(),
                })
                .collect(),
        }
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain()
    }

    fn begin_turn(&mut self) -> u64 {
        self.turn += 1;
        self.turn
    }

    /// Recolors every marker in place after a filter change.
    ///
    /// The camera pose is read back first and restored with `jump_to` (never
    /// `fly_to`), so the operator's viewpoint is undisturbed. Selection is
    /// preserved by id through the recompute.
    fn recolor(&mut self, turn: u64) {
        let pose = self.surface.pose();
        let visuals = self.store.recompute(&self.filter);
        self.surface.render_markers(&visuals);
        self.surface.jump_to(pose);
        debug!(markers = visuals.len(), "markers recolored");
        self.events
            .record(turn, "recompute", format!("{} markers", visuals.len()));
    }

    fn apply_deselect(&mut self, turn: u64) {
        if self.selection.clear() {
            self.store.apply_selection(None);
            self.surface.render_markers(&self.store.visuals());
        }
        self.loader.cancel();
        self.events.record(turn, "deselect", "");
    }
}
