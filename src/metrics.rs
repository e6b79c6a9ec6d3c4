//! Metrics Client
//!
//! Fire-and-forget latency recording for reply turns. The POST runs on a
//! spawned task with a short client timeout, so a slow or absent metrics
//! service can never delay or fail the reply path.

use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// Client timeout for metrics calls, deliberately tight.
const METRICS_TIMEOUT_SECS: u64 = 2;

#[derive(Debug, Serialize)]
struct LatencyRecord {
    service: &'static str,
    latency_ms: f64,
    session_id: String,
    turn_id: String,
    success: bool,
}

/// Best-effort recorder posting latency events to the metrics service.
#[derive(Debug, Clone)]
pub struct MetricsClient {
    base_url: String,
    client: reqwest::Client,
}

impl MetricsClient {
    /// Create a client for a metrics endpoint base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(METRICS_TIMEOUT_SECS))
            .build()
            .expect("failed to build reqwest client");
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// Record one turn latency. Spawns the POST and returns immediately;
    /// failures are logged and otherwise ignored.
    pub fn record_latency(&self, service: &'static str, latency_ms: f64, success: bool) {
        let url = format!("{}/latency", self.base_url.trim_end_matches('/'));
        let client = self.client.clone();
        let turn = Uuid::new_v4();
        let record = LatencyRecord {
            service,
            latency_ms,
            session_id: format!("session_{turn}"),
            turn_id: format!("turn_{turn}"),
            success,
        };

        tokio::spawn(async move {
            match client.post(&url).json(&record).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(service = record.service, latency_ms = record.latency_ms, "latency recorded");
                }
                Ok(response) => {
                    warn!(status = response.status().as_u16(), "metrics service rejected latency record");
                }
                Err(err) => {
                    warn!(error = %err, "failed to record latency metric");
                }
            }
        });
    }
}
