use foundation::ids::BuildingId;

use crate::record::{ClaimView, ImageSlot};
use crate::repository::{ClaimsError, ClaimsRepository};

/// Monotonic generation tag for in-flight claim fetches.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

/// Permission slip for applying one fetch's result.
///
/// A ticket stays current until the next `begin` or `cancel` bumps the
/// loader's generation. Stale tickets are dropped at apply time; the fetch
/// itself is allowed to finish and be thrown away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: Generation,
    building: BuildingId,
}

impl FetchTicket {
    pub fn building(&self) -> &BuildingId {
        &self.building
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }
}

/// What the claims panel should currently display.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ClaimsState {
    #[default]
    Idle,
    Loading {
        building: BuildingId,
    },
    Loaded {
        building: BuildingId,
        claims: Vec<ClaimView>,
    },
    /// The fetch for this selection failed; retryable, scoped to this
    /// selection only.
    Failed {
        building: BuildingId,
        error: ClaimsError,
    },
}

/// Per-selection claims lifecycle with supersession.
///
/// Results are never queued: whichever fetch was started last owns the panel,
/// and anything older is discarded when it eventually resolves.
#[derive(Debug, Default)]
pub struct ClaimsLoader {
    generation: u64,
    state: ClaimsState,
}

impl ClaimsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ClaimsState {
        &self.state
    }

    /// Begins a fetch for `building`, superseding any in-flight fetch.
    pub fn begin(&mut self, building: BuildingId) -> FetchTicket {
        self.generation += 1;
        self.state = ClaimsState::Loading {
            building: building.clone(),
        };
        FetchTicket {
            generation: Generation(self.generation),
            building,
        }
    }

    /// Drops any in-flight fetch and clears the panel immediately.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.state = ClaimsState::Idle;
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == Generation(self.generation)
    }

    /// Applies a finished fetch.
    ///
    /// Returns `false` — and changes nothing — when the ticket was superseded
    /// by a later `begin` or `cancel`.
    pub fn apply(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<ClaimView>, ClaimsError>,
    ) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state = match result {
            Ok(claims) => ClaimsState::Loaded {
                building: ticket.building.clone(),
                claims,
            },
            Err(error) => ClaimsState::Failed {
                building: ticket.building.clone(),
                error,
            },
        };
        true
    }
}

/// Fetches the claims for `building`, then signs every image.
///
/// One failed signing yields `ImageSlot::Unavailable` for that slot only;
/// the claim (and its other images) still render.
pub async fn fetch_claim_views(
    repo: &dyn ClaimsRepository,
    building: &BuildingId,
) -> Result<Vec<ClaimView>, ClaimsError> {
    let records = repo.claims_for_building(building.clone()).await?;
    let mut views = Vec::with_capacity(records.len());
    for record in records {
        let mut images = Vec::with_capacity(record.image_paths.len());
        for path in &record.image_paths {
            match repo.signed_image_url(path.clone()).await {
                Ok(url) => images.push(ImageSlot::Ready(url)),
                Err(_) => images.push(ImageSlot::Unavailable),
            }
        }
        views.push(ClaimView { record, images });
    }
    Ok(views)
}
