use claims::repository::BoxFuture;
use foundation::ids::BuildingId;
use risk::RiskMode;
use serde::Serialize;

/// One property currently matching the filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchingProperty {
    pub id: BuildingId,
    pub address: String,
}

/// Everything an outbound notification is allowed to know: the active mode,
/// its threshold, and the matching properties. The delivery mechanism stays
/// outside the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationSummary {
    pub mode: RiskMode,
    pub threshold: f64,
    pub matching: Vec<MatchingProperty>,
}

impl NotificationSummary {
    pub fn count(&self) -> usize {
        self.matching.len()
    }
}

/// Error type for notification delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    Delivery(String),
}

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifyError::Delivery(msg) => write!(f, "notification delivery failed: {msg}"),
        }
    }
}

impl std::error::Error for NotifyError {}

/// Outbound notification contract, implemented by the surrounding
/// application (webhook, mail relay, ...).
pub trait NotificationSink: Send + Sync {
    fn send(&self, summary: NotificationSummary) -> BoxFuture<'_, Result<(), NotifyError>>;
}
