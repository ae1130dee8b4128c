//! REST-backed claims repository.
//!
//! Thin pass-through to the claims backend; all supersession logic lives in
//! the engine's claims loader, so this adapter only translates transport
//! failures into `ClaimsError`s.

use claims::{BoxFuture, ClaimRecord, ClaimsError, ClaimsRepository};
use foundation::ids::BuildingId;
use http::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SignResponse {
    url: String,
}

pub struct HttpClaimsRepository {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClaimsRepository {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl ClaimsRepository for HttpClaimsRepository {
    fn claims_for_building(
        &self,
        building: BuildingId,
    ) -> BoxFuture<'_, Result<Vec<ClaimRecord>, ClaimsError>> {
        Box::pin(async move {
            let resp = self
                .client
                .get(self.endpoint("claims"))
                .query(&[("building_id", building.as_str())])
                .send()
                .await
                .map_err(|e| ClaimsError::Backend(e.to_string()))?;

            if !resp.status().is_success() {
                return Err(ClaimsError::Backend(format!(
                    "claims service returned {}",
                    resp.status()
                )));
            }

            resp.json::<Vec<ClaimRecord>>()
                .await
                .map_err(|e| ClaimsError::Backend(e.to_string()))
        })
    }

    fn signed_image_url(&self, path: String) -> BoxFuture<'_, Result<String, ClaimsError>> {
        Box::pin(async move {
            let resp = self
                .client
                .get(self.endpoint("images/sign"))
                .query(&[("path", path.as_str())])
                .send()
                .await
                .map_err(|e| ClaimsError::Backend(e.to_string()))?;

            if !resp.status().is_success() {
                return Err(ClaimsError::Backend(format!(
                    "image signing returned {}",
                    resp.status()
                )));
            }

            let signed: SignResponse = resp
                .json()
                .await
                .map_err(|e| ClaimsError::Backend(e.to_string()))?;
            Ok(signed.url)
        })
    }

    fn delete_claim(&self, claim_id: String) -> BoxFuture<'_, Result<(), ClaimsError>> {
        Box::pin(async move {
            let resp = self
                .client
                .delete(self.endpoint(&format!("claims/{claim_id}")))
                .send()
                .await
                .map_err(|e| ClaimsError::Backend(e.to_string()))?;

            if resp.status() == StatusCode::NOT_FOUND {
                return Err(ClaimsError::NotFound);
            }
            if !resp.status().is_success() {
                return Err(ClaimsError::Backend(format!(
                    "claims service returned {}",
                    resp.status()
                )));
            }
            Ok(())
        })
    }
}
