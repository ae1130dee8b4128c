//! Claims backend contract.
//!
//! The engine treats claims as a keyed, read-mostly store behind this trait;
//! the surrounding application decides how it is actually backed (REST
//! service in production, the in-memory store in tests and headless runs).

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use foundation::ids::BuildingId;

use crate::record::ClaimRecord;

/// Boxed, sendable future, so repository traits stay dyn-compatible.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Error type for claims backend operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    /// The backend failed or rejected the request; the operation is
    /// retryable.
    Backend(String),
    /// No claim with the requested id.
    NotFound,
}

impl std::fmt::Display for ClaimsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimsError::Backend(msg) => write!(f, "claims backend error: {msg}"),
            ClaimsError::NotFound => write!(f, "claim not found"),
        }
    }
}

impl std::error::Error for ClaimsError {}

/// Trait for claims backends.
///
/// Implementations must be `Send + Sync` for use across async tasks.
/// Methods take owned arguments and return boxed futures for
/// dyn-compatibility.
pub trait ClaimsRepository: Send + Sync {
    /// All claims attached to one building, oldest first as the backend
    /// returns them. A building without claims yields an empty list, not an
    /// error.
    fn claims_for_building(
        &self,
        building: BuildingId,
    ) -> BoxFuture<'_, Result<Vec<ClaimRecord>, ClaimsError>>;

    /// Short-lived signed display URL for one stored image path.
    fn signed_image_url(&self, path: String) -> BoxFuture<'_, Result<String, ClaimsError>>;

    /// Removes one claim.
    fn delete_claim(&self, claim_id: String) -> BoxFuture<'_, Result<(), ClaimsError>>;
}

/// Deterministic in-memory repository for tests and headless development.
///
/// Failure injection mirrors the two transient error classes the loader has
/// to survive: whole-fetch failures per building and signing failures per
/// image path.
#[derive(Debug, Default)]
pub struct InMemoryClaimsRepository {
    claims: Mutex<BTreeMap<BuildingId, Vec<ClaimRecord>>>,
    unsignable_paths: BTreeSet<String>,
    failing_buildings: BTreeSet<BuildingId>,
}

impl InMemoryClaimsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_claim(&self, claim: ClaimRecord) {
        self.claims
            .lock()
            .expect("claims lock poisoned")
            .entry(claim.building_id.clone())
            .or_default()
            .push(claim);
    }

    /// Makes `signed_image_url` fail for `path`.
    pub fn fail_signing_for(&mut self, path: impl Into<String>) {
        self.unsignable_paths.insert(path.into());
    }

    /// Makes `claims_for_building` fail for `building`.
    pub fn fail_building(&mut self, building: BuildingId) {
        self.failing_buildings.insert(building);
    }
}

impl ClaimsRepository for InMemoryClaimsRepository {
    fn claims_for_building(
        &self,
        building: BuildingId,
    ) -> BoxFuture<'_, Result<Vec<ClaimRecord>, ClaimsError>> {
        let result = if self.failing_buildings.contains(&building) {
            Err(ClaimsError::Backend("injected fetch failure".to_string()))
        } else {
            let claims = self.claims.lock().expect("claims lock poisoned");
            Ok(claims.get(&building).cloned().unwrap_or_default())
        };
        Box::pin(std::future::ready(result))
    }

    fn signed_image_url(&self, path: String) -> BoxFuture<'_, Result<String, ClaimsError>> {
        let result = if self.unsignable_paths.contains(&path) {
            Err(ClaimsError::Backend("injected signing failure".to_string()))
        } else {
            Ok(format!("signed://{path}"))
        };
        Box::pin(std::future::ready(result))
    }

    fn delete_claim(&self, claim_id: String) -> BoxFuture<'_, Result<(), ClaimsError>> {
        let mut claims = self.claims.lock().expect("claims lock poisoned");
        let mut found = false;
        for list in claims.values_mut() {
            let before = list.len();
            list.retain(|c| c.id != claim_id);
            found |= list.len() != before;
        }
        let result = if found { Ok(()) } else { Err(ClaimsError::NotFound) };
        Box::pin(std::future::ready(result))
    }
}

#[cfg(test)]
mod tests {
    use foundation::ids::BuildingId;

    use super::{ClaimsError, ClaimsRepository, InMemoryClaimsRepository};
    use crate::record::ClaimRecord;

    fn claim(id: &str, building: &str) -> ClaimRecord {
        ClaimRecord {
            id: id.to_string(),
            building_id: BuildingId::new(building),
            damage_type: "water".to_string(),
            description: "flooded basement".to_string(),
            claim_date: "2024-06-12".to_string(),
            image_paths: vec![],
        }
    }

    #[tokio::test]
    async fn unknown_building_yields_an_empty_list() {
        let repo = InMemoryClaimsRepository::new();
        let claims = repo
            .claims_for_building(BuildingId::new("missing"))
            .await
            .unwrap();
        assert!(claims.is_empty());
    }

    #[tokio::test]
    async fn injected_failures_surface_as_backend_errors() {
        let mut repo = InMemoryClaimsRepository::new();
        repo.insert_claim(claim("c1", "b1"));
        repo.fail_building(BuildingId::new("b1"));

        let err = repo
            .claims_for_building(BuildingId::new("b1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimsError::Backend(_)));
    }

    #[tokio::test]
    async fn delete_removes_the_claim_and_reports_missing_ids() {
        let repo = InMemoryClaimsRepository::new();
        repo.insert_claim(claim("c1", "b1"));

        assert!(repo.delete_claim("c1".to_string()).await.is_ok());
        assert_eq!(
            repo.delete_claim("c1".to_string()).await.unwrap_err(),
            ClaimsError::NotFound
        );
        assert_eq!(
            repo.delete_claim("nope".to_string()).await.unwrap_err(),
            ClaimsError::NotFound
        );
    }
}
