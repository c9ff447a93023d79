use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;
use tokio::runtime::Handle;
use tracing::{debug, warn};
use uuid::Uuid;

use super::AnalyticsSink;
use crate::gate::error::SinkError;
use crate::gate::event::EventPayload;

const POST_TIMEOUT: Duration = Duration::from_secs(5);
const FLUSH_POLL: Duration = Duration::from_millis(10);

#[derive(Debug, Serialize)]
struct EventBody {
    event_id: Uuid,
    name: String,
    params: EventPayload,
}

/// Analytics backend that POSTs each event as JSON.
///
/// Delivery is fire-and-forget on the ambient tokio runtime: `log_event`
/// only schedules the request. Outside a runtime the sink is not
/// initialized; with an unparsable endpoint it is in an invalid state.
#[derive(Debug)]
pub struct HttpAnalyticsSink {
    client: Client,
    endpoint: Option<Url>,
    raw_endpoint: String,
    collecting: AtomicBool,
    in_flight: Arc<AtomicUsize>,
}

impl HttpAnalyticsSink {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let raw_endpoint = endpoint.into();
        Self {
            client: Client::builder()
                .timeout(POST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            endpoint: Url::parse(&raw_endpoint).ok(),
            raw_endpoint,
            collecting: AtomicBool::new(true),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.raw_endpoint
    }

    /// Posts scheduled but not yet finished.
    pub fn pending(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Waits up to `grace` for in-flight posts. Returns how many were still
    /// pending when it gave up.
    pub async fn flush(&self, grace: Duration) -> usize {
        let deadline = tokio::time::Instant::now() + grace;
        while self.pending() > 0 && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(FLUSH_POLL).await;
        }
        self.pending()
    }
}

impl AnalyticsSink for HttpAnalyticsSink {
    fn set_collection_enabled(&self, enabled: bool) -> Result<(), SinkError> {
        self.collecting.store(enabled, Ordering::SeqCst);
        Ok(())
    }

    fn log_event(&self, name: &str, payload: &EventPayload) -> Result<(), SinkError> {
        if !self.collecting.load(Ordering::SeqCst) {
            return Ok(());
        }

        let endpoint = self.endpoint.clone().ok_or_else(|| {
            SinkError::InvalidState(format!("unusable endpoint '{}'", self.raw_endpoint))
        })?;
        let runtime = Handle::try_current()
            .map_err(|e| SinkError::NotInitialized(format!("no async runtime: {}", e)))?;

        let body = EventBody {
            event_id: Uuid::new_v4(),
            name: name.to_string(),
            params: payload.clone(),
        };
        let client = self.client.clone();
        let in_flight = self.in_flight.clone();
        in_flight.fetch_add(1, Ordering::SeqCst);

        runtime.spawn(async move {
            match client.post(endpoint).json(&body).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(event_id = %body.event_id, "analytics event delivered");
                }
                Ok(response) => {
                    warn!(status = %response.status(), "analytics event rejected by server");
                }
                Err(err) => {
                    warn!(error = %err, "failed to deliver analytics event");
                }
            }
            in_flight.fetch_sub(1, Ordering::SeqCst);
        });

        Ok(())
    }
}
