use foundation::ids::BuildingId;
use serde::{Deserialize, Serialize};

/// One damage claim as stored by the claims backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub id: String,
    pub building_id: BuildingId,
    pub damage_type: String,
    pub description: String,
    /// ISO-8601 date string, owned by the backend; the engine never parses it.
    pub claim_date: String,
    #[serde(default)]
    pub image_paths: Vec<String>,
}

/// Display state for one claim image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ImageSlot {
    /// Short-lived signed URL ready for display.
    Ready(String),
    /// Signing failed for this image only; the rest of the claim still
    /// renders.
    Unavailable,
}

/// A claim joined with the display state of each of its images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimView {
    pub record: ClaimRecord,
    pub images: Vec<ImageSlot>,
}
