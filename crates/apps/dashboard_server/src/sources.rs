//! HTTP adapters for the upstream collaborators that feed the engine:
//! the hazard/building data source and the geocoder.
//!
//! The engine never sees these types; they produce plain `BuildingRecord`s
//! and coordinates and are injected at startup.

use foundation::geo::LonLat;
use markers::BuildingRecord;
use serde::Deserialize;

/// Error type for collaborator lookups.
#[derive(Debug)]
pub struct SourceError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Client for the hazard/building data service.
pub struct HazardSource {
    client: reqwest::Client,
    base_url: String,
}

impl HazardSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Buildings with risk indices around `center`.
    pub async fn buildings_near(&self, center: LonLat) -> Result<Vec<BuildingRecord>, SourceError> {
        let url = format!("{}/buildings", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .get(&url)
            .query(&[("lon", center.lon), ("lat", center.lat)])
            .send()
            .await
            .map_err(|e| SourceError::with_source("hazard request failed", e))?;

        if !resp.status().is_success() {
            return Err(SourceError::new(format!(
                "hazard service returned {}",
                resp.status()
            )));
        }

        resp.json::<Vec<BuildingRecord>>()
            .await
            .map_err(|e| SourceError::with_source("hazard response was not building records", e))
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    lon: f64,
    lat: f64,
}

/// Client for the free-text address geocoder.
pub struct GeocodeClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeocodeClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub async fn resolve(&self, query: &str) -> Result<LonLat, SourceError> {
        let url = format!("{}/geocode", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| SourceError::with_source("geocode request failed", e))?;

        if !resp.status().is_success() {
            return Err(SourceError::new(format!(
                "geocoder returned {}",
                resp.status()
            )));
        }

        let geo: GeocodeResponse = resp
            .json()
            .await
            .map_err(|e| SourceError::with_source("geocode response was not coordinates", e))?;
        Ok(LonLat::new(geo.lon, geo.lat))
    }
}
