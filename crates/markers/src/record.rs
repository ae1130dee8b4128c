use foundation::geo::LonLat;
use foundation::ids::BuildingId;
use risk::RiskScores;
use serde::{Deserialize, Serialize};

/// One building as delivered by the hazard data source.
///
/// Immutable once received; a new search result set replaces the whole store
/// rather than patching individual records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingRecord {
    pub id: BuildingId,
    pub coordinates: LonLat,
    pub address: String,
    pub risk_scores: RiskScores,
}

impl BuildingRecord {
    pub fn new(
        id: impl Into<BuildingId>,
        coordinates: LonLat,
        address: impl Into<String>,
        risk_scores: RiskScores,
    ) -> Self {
        Self {
            id: id.into(),
            coordinates,
            address: address.into(),
            risk_scores,
        }
    }
}
