use serde::{Deserialize, Serialize};

/// Stable identifier correlating a map marker with its claim history.
///
/// Prefer the external building id (e.g. a government register id) when the
/// data source provides one; fall back to the display address otherwise.
/// Ids are plain strings so they stay stable across sessions and backends,
/// never derived from floating-point values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildingId(String);

impl BuildingId {
    pub fn new(id: impl Into<String>) -> Self {
        BuildingId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BuildingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BuildingId {
    fn from(id: &str) -> Self {
        BuildingId::new(id)
    }
}

impl From<String> for BuildingId {
    fn from(id: String) -> Self {
        BuildingId(id)
    }
}
