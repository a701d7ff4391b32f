//! # Health Check
//!
//! Probes the upstream backend and reports a typed payload. An unreachable
//! or failing upstream never surfaces as an error: it becomes a degraded
//! report with status code 503.
//!
//! ```text
//! healthy:  200 {"status":"ok","service":"Backend API","version":"1.4.2","ts":"..."}
//! degraded: 503 {"status":"error","service":"Backend API","error":"Failed to connect to backend","ts":"..."}
//! ```

use chrono::Utc;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::BackendClient;

pub const SERVICE_NAME: &str = "Backend API";
pub const CONNECT_FAILURE: &str = "Failed to connect to backend";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub status: String,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub ts: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A report plus the HTTP-style status it would be served with.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthResponse {
    pub status_code: u16,
    pub body: HealthReport,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status_code == 200
    }

    fn healthy(status: Option<String>, version: Option<String>) -> Self {
        Self {
            status_code: 200,
            body: HealthReport {
                status: status.unwrap_or_else(|| "ok".to_string()),
                service: SERVICE_NAME.to_string(),
                version,
                ts: Utc::now().to_rfc3339(),
                error: None,
            },
        }
    }

    fn degraded() -> Self {
        Self {
            status_code: 503,
            body: HealthReport {
                status: "error".to_string(),
                service: SERVICE_NAME.to_string(),
                version: None,
                ts: Utc::now().to_rfc3339(),
                error: Some(CONNECT_FAILURE.to_string()),
            },
        }
    }
}

pub async fn probe(client: &BackendClient) -> HealthResponse {
    match client.upstream_health().await {
        Ok(upstream) => {
            info!("Upstream healthy at {}", client.base_url());
            HealthResponse::healthy(upstream.status, upstream.version)
        }
        Err(e) => {
            warn!("Upstream health check failed: {}", e);
            HealthResponse::degraded()
        }
    }
}
