//! Outbound notification delivery.
//!
//! The engine hands over only the filtered count and addresses; this module
//! owns the actual delivery (a JSON webhook here). Without a configured
//! webhook the dispatch is logged and dropped, which keeps local development
//! working without a receiver.

use claims::BoxFuture;
use engine::{NotificationSink, NotificationSummary, NotifyError};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

pub struct WebhookNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl WebhookNotifier {
    pub fn new(client: reqwest::Client, webhook_url: Option<String>) -> Self {
        Self {
            client,
            webhook_url,
        }
    }
}

impl NotificationSink for WebhookNotifier {
    fn send(&self, summary: NotificationSummary) -> BoxFuture<'_, Result<(), NotifyError>> {
        Box::pin(async move {
            let Some(url) = self.webhook_url.as_deref() else {
                info!(
                    count = summary.count(),
                    "no notification webhook configured; dispatch dropped"
                );
                return Ok(());
            };

            let body = json!({
                "dispatch_id": Uuid::new_v4().to_string(),
                "mode": summary.mode,
                "threshold": summary.threshold,
                "count": summary.count(),
                "recipients": summary.matching,
            });

            let resp = self
                .client
                .post(url)
                .json(&body)
                .send()
                .await
                .map_err(|e| NotifyError::Delivery(e.to_string()))?;

            if !resp.status().is_success() {
                return Err(NotifyError::Delivery(format!(
                    "webhook returned {}",
                    resp.status()
                )));
            }
            Ok(())
        })
    }
}
