//! Service status: a snapshot of the backend health probe.
//!
//! A degraded backend still loads; the module reports what it saw.

use std::sync::Arc;

use crate::backend::health::{self, HealthResponse};
use crate::backend::BackendClient;
use crate::core::loader::LoadError;
use crate::core::view::{RenderableUnit, Stat, View, ViewBlock};

pub struct StatusUnit {
    backend_url: String,
    response: HealthResponse,
}

impl StatusUnit {
    pub fn new(backend_url: impl Into<String>, response: HealthResponse) -> Self {
        Self {
            backend_url: backend_url.into(),
            response,
        }
    }
}

impl RenderableUnit for StatusUnit {
    fn render(&self) -> View {
        let body = &self.response.body;
        let state = if self.response.is_healthy() {
            "Operational"
        } else {
            "Degraded"
        };

        let mut details = vec![
            ("Service".to_string(), body.service.clone()),
            ("Endpoint".to_string(), self.backend_url.clone()),
            ("Checked".to_string(), body.ts.clone()),
        ];
        if let Some(version) = &body.version {
            details.push(("Version".to_string(), version.clone()));
        }

        let mut view = View::new("Service Status")
            .with(ViewBlock::Stats(vec![
                Stat::new("State", state),
                Stat::new("HTTP", self.response.status_code.to_string()),
                Stat::new("Reported", body.status.clone()),
            ]))
            .with(ViewBlock::KeyValues(details));

        if let Some(error) = &body.error {
            view = view.with(ViewBlock::Card {
                title: "Problem".to_string(),
                body: error.clone(),
            });
        }
        view
    }
}

pub async fn load(client: Arc<BackendClient>) -> Result<Arc<dyn RenderableUnit>, LoadError> {
    let response = health::probe(&client).await;
    Ok(Arc::new(StatusUnit::new(client.base_url(), response)))
}
