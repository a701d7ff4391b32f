//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::BackendError;
use crate::core::action::{Action, Effect, update};
use crate::core::gate::{Navigator, run_validation};
use crate::core::loader::LoadError;
use crate::core::registry::{AppDescriptor, AppRegistry};
use crate::core::session::{Credentials, SessionValidator, UserProfile};
use crate::core::state::App;
use crate::core::view::{RenderableUnit, View, ViewBlock};

/// A unit that renders a fixed heading.
pub struct StaticUnit {
    heading: String,
}

impl StaticUnit {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
        }
    }
}

impl RenderableUnit for StaticUnit {
    fn render(&self) -> View {
        View::new(self.heading.clone()).with(ViewBlock::Text(format!("{} body", self.heading)))
    }
}

/// Descriptor whose factory yields a `StaticUnit` headed with `title`.
pub fn static_descriptor(code: &str, title: &str) -> AppDescriptor {
    let heading = title.to_string();
    AppDescriptor::new(code, title, move || {
        let heading = heading.clone();
        async move { Ok(Arc::new(StaticUnit::new(heading)) as Arc<dyn RenderableUnit>) }
    })
}

/// Descriptor whose factory always fails.
pub fn failing_descriptor(code: &str, title: &str) -> AppDescriptor {
    AppDescriptor::new(code, title, || async {
        Err(LoadError::Failed("bundle missing".into()))
    })
}

/// Counts how many instantiations actually ran.
#[derive(Clone, Default)]
pub struct CountingFactory {
    calls: Arc<AtomicUsize>,
}

impl CountingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn descriptor(&self, code: &str, title: &str) -> AppDescriptor {
        let calls = self.calls.clone();
        let heading = title.to_string();
        AppDescriptor::new(code, title, move || {
            let calls = calls.clone();
            let heading = heading.clone();
            async move {
                // Counted on first poll, so dropped-before-polled futures don't count.
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::task::yield_now().await;
                Ok(Arc::new(StaticUnit::new(heading)) as Arc<dyn RenderableUnit>)
            }
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    pub redirects: Vec<String>,
}

impl Navigator for RecordingNavigator {
    fn redirect(&mut self, path: &str) {
        self.redirects.push(path.to_string());
    }
}

/// Validator with a canned answer.
pub enum StubValidator {
    Accept,
    Reject,
    Error,
    Hang,
}

#[async_trait]
impl SessionValidator for StubValidator {
    async fn validate_session(&self, _token: &str) -> Result<bool, BackendError> {
        match self {
            StubValidator::Accept => Ok(true),
            StubValidator::Reject => Ok(false),
            StubValidator::Error => Err(BackendError::Network("connection refused".into())),
            StubValidator::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(true)
            }
        }
    }
}

pub fn sample_credentials() -> Credentials {
    Credentials::new(
        "tok-123",
        UserProfile {
            id: "u-1".to_string(),
            email: "ada@example.com".to_string(),
            name: Some("Ada".to_string()),
        },
    )
}

/// Per-process scratch file under the system temp dir.
pub fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("switchboard-tests-{}", std::process::id()))
        .join(name)
}

/// `reports` and `status` load, `broken` always fails.
pub fn test_registry() -> Arc<AppRegistry> {
    let registry = AppRegistry::builder()
        .register(static_descriptor("reports", "Reports"))
        .register(static_descriptor("status", "Service Status"))
        .register(failing_descriptor("broken", "Broken"))
        .build()
        .expect("test registry is valid");
    Arc::new(registry)
}

pub fn test_app(credentials: Option<Credentials>) -> App {
    test_app_with(test_registry(), credentials)
}

pub fn test_app_with(registry: Arc<AppRegistry>, credentials: Option<Credentials>) -> App {
    App::new(
        registry,
        "/login",
        Duration::from_secs(1),
        Duration::from_secs(5),
        credentials,
    )
}

/// Run async effects to completion, feeding results back through `update`.
pub async fn settle(app: &mut App, effects: Vec<Effect>, validator: &dyn SessionValidator) {
    let mut queue: VecDeque<Effect> = effects.into();
    while let Some(effect) = queue.pop_front() {
        let next = match effect {
            Effect::Validate { epoch, token } => {
                let outcome = run_validation(validator, &token, app.validation_timeout).await;
                update(app, Action::ValidationFinished { epoch, outcome })
            }
            Effect::AwaitModule { handle, epoch } => {
                let code = handle.code().to_string();
                let resolved = handle.resolve().await;
                update(
                    app,
                    Action::ModuleLoaded {
                        code,
                        epoch,
                        resolved,
                    },
                )
            }
            _ => Vec::new(),
        };
        queue.extend(next);
    }
}
