//! # App Loader
//!
//! Turns an internal code into something renderable.
//!
//! ```text
//! load(code) ──► registry.resolve(code)
//!                   │
//!          miss ────┴──── hit
//!           │              │
//!   Ready(NotFound)    in flight for this code?
//!                          │
//!                 yes ─────┴───── no
//!                  │               │
//!          share that future   instantiate (with timeout)
//! ```
//!
//! Instantiation futures are wrapped in [`Shared`] so every handle for the
//! same code observes one instantiation. Finished entries are pruned on the
//! next load (or when the reducer consumes a result), so each navigation
//! gets a fresh module and the loader holds no settled modules.
//!
//! Failures never escape: a factory error or timeout becomes
//! [`ResolvedApp::NotFound`] with [`NotFoundReason::LoadFailed`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use log::{debug, info, warn};

use crate::core::registry::AppRegistry;
use crate::core::view::RenderableUnit;

// ============================================================================
// Error Type
// ============================================================================

/// Why a registered module failed to instantiate.
/// `Clone` because it travels through a shared future.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The factory reported a failure (resource fetch, bad payload, ...).
    Failed(String),
    /// The factory did not finish within the configured timeout.
    TimedOut(Duration),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Failed(msg) => write!(f, "module failed to load: {msg}"),
            LoadError::TimedOut(d) => write!(f, "module load timed out after {}s", d.as_secs()),
        }
    }
}

impl std::error::Error for LoadError {}

// ============================================================================
// Resolution Results
// ============================================================================

/// Distinct internal causes that share the same NotFound presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundReason {
    Unregistered,
    LoadFailed(LoadError),
}

#[derive(Clone)]
pub enum ResolvedApp {
    Loaded(Arc<dyn RenderableUnit>),
    NotFound(NotFoundReason),
}

impl ResolvedApp {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ResolvedApp::Loaded(_))
    }
}

impl fmt::Debug for ResolvedApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedApp::Loaded(unit) => f
                .debug_tuple("Loaded")
                .field(&unit.render().heading)
                .finish(),
            ResolvedApp::NotFound(reason) => f.debug_tuple("NotFound").field(reason).finish(),
        }
    }
}

/// Observable state of a [`LoadHandle`].
#[derive(Debug, Clone)]
pub enum LoadState {
    Pending,
    Ready(ResolvedApp),
}

type SharedLoad = Shared<BoxFuture<'static, Result<Arc<dyn RenderableUnit>, LoadError>>>;

enum HandleInner {
    Ready(ResolvedApp),
    InFlight(SharedLoad),
}

/// A pending or settled load for one code.
pub struct LoadHandle {
    code: String,
    inner: HandleInner,
}

impl LoadHandle {
    fn ready(code: &str, resolved: ResolvedApp) -> Self {
        Self {
            code: code.to_string(),
            inner: HandleInner::Ready(resolved),
        }
    }

    fn in_flight(code: &str, shared: SharedLoad) -> Self {
        Self {
            code: code.to_string(),
            inner: HandleInner::InFlight(shared),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Peek without driving the load.
    pub fn state(&self) -> LoadState {
        match &self.inner {
            HandleInner::Ready(resolved) => LoadState::Ready(resolved.clone()),
            HandleInner::InFlight(shared) => match shared.peek() {
                Some(result) => LoadState::Ready(into_resolved(result.clone())),
                None => LoadState::Pending,
            },
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state(), LoadState::Pending)
    }

    /// Drive the load to completion. Never fails.
    pub async fn resolve(self) -> ResolvedApp {
        match self.inner {
            HandleInner::Ready(resolved) => resolved,
            HandleInner::InFlight(shared) => {
                let result = shared.await;
                settle(&self.code, result)
            }
        }
    }
}

impl fmt::Debug for LoadHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadHandle")
            .field("code", &self.code)
            .field("pending", &self.is_pending())
            .finish()
    }
}

fn into_resolved(result: Result<Arc<dyn RenderableUnit>, LoadError>) -> ResolvedApp {
    match result {
        Ok(unit) => ResolvedApp::Loaded(unit),
        Err(e) => ResolvedApp::NotFound(NotFoundReason::LoadFailed(e)),
    }
}

fn settle(code: &str, result: Result<Arc<dyn RenderableUnit>, LoadError>) -> ResolvedApp {
    if let Err(e) = &result {
        warn!("Load failure for '{}': {}", code, e);
    }
    into_resolved(result)
}

// ============================================================================
// Loader
// ============================================================================

pub struct AppLoader {
    registry: Arc<AppRegistry>,
    timeout: Duration,
    in_flight: HashMap<String, SharedLoad>,
}

impl AppLoader {
    pub fn new(registry: Arc<AppRegistry>, timeout: Duration) -> Self {
        Self {
            registry,
            timeout,
            in_flight: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &AppRegistry {
        &self.registry
    }

    pub fn load(&mut self, code: &str) -> LoadHandle {
        self.prune_settled();
        let Some(descriptor) = self.registry.resolve(code) else {
            info!("Resolution miss: no application registered for '{}'", code);
            return LoadHandle::ready(code, ResolvedApp::NotFound(NotFoundReason::Unregistered));
        };

        if let Some(existing) = self.in_flight.get(code) {
            debug!("Reusing in-flight load for '{}'", code);
            return LoadHandle::in_flight(code, existing.clone());
        }

        info!("Instantiating module '{}' ({})", code, descriptor.title());
        let instantiate = descriptor.instantiate();
        let timeout = self.timeout;
        let shared = async move {
            match tokio::time::timeout(timeout, instantiate).await {
                Ok(result) => result,
                Err(_) => Err(LoadError::TimedOut(timeout)),
            }
        }
        .boxed()
        .shared();

        self.in_flight.insert(code.to_string(), shared.clone());
        LoadHandle::in_flight(code, shared)
    }

    /// Number of loads that have not settled yet.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight
            .values()
            .filter(|shared| shared.peek().is_none())
            .count()
    }

    /// Drop entries whose load has settled, releasing their results.
    pub fn prune_settled(&mut self) {
        self.in_flight.retain(|code, shared| {
            let settled = shared.peek().is_some();
            if settled {
                debug!("Releasing settled load for '{}'", code);
            }
            !settled
        });
    }

    /// Entries still held, settled or not.
    pub fn tracked_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Forget every in-flight load so a new session never reuses one.
    /// Handles already given out keep running; their results are discarded
    /// by the caller's epoch check.
    pub fn cancel_all(&mut self) {
        if !self.in_flight.is_empty() {
            debug!("Dropping {} tracked load(s)", self.in_flight.len());
        }
        self.in_flight.clear();
    }
}
