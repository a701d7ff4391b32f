//! # Application State
//!
//! Core business state for Switchboard. This module contains domain logic
//! only, no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── session: Session                // who is signed in, epoch
//! ├── gate: SessionGate               // may protected content render?
//! ├── router: Router                  // current location, redirect sink
//! ├── loader: AppLoader               // code → module (owns the registry)
//! ├── tabs: TabsStore                 // open apps + active pointer
//! ├── modules: HashMap                // loaded unit per tab id
//! ├── pending: Option<String>         // code whose load is in flight
//! ├── not_found: Option<String>       // code shown on the NotFound card
//! ├── status_message: String          // header status text
//! ├── login_error: Option<String>     // inline message on the login screen
//! ├── signing_in: bool                // login request in flight
//! └── validation_timeout: Duration
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! Renderers read through [`App::main_view`], which never mutates.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::info;

use crate::core::config::ResolvedConfig;
use crate::core::gate::{Navigator, SessionGate};
use crate::core::loader::AppLoader;
use crate::core::registry::AppRegistry;
use crate::core::session::{Credentials, Session};
use crate::core::tabs::{Tab, TabsStore};
use crate::core::view::RenderableUnit;

/// Tracks the current location and receives gate redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Router {
    location: String,
    redirect_count: usize,
}

impl Router {
    pub fn new() -> Self {
        Self {
            location: "/".to_string(),
            redirect_count: 0,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn redirect_count(&self) -> usize {
        self.redirect_count
    }

    pub fn go(&mut self, path: impl Into<String>) {
        self.location = path.into();
    }

    pub fn app_path(code: &str) -> String {
        format!("/apps/{code}")
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for Router {
    fn redirect(&mut self, path: &str) {
        info!("Redirecting to {}", path);
        self.location = path.to_string();
        self.redirect_count += 1;
    }
}

/// What the main area shows right now. Derived, never stored.
pub enum MainView<'a> {
    /// Gate denied: sign-in form.
    Login,
    /// Gate suspended while the session is checked.
    Validating,
    Home,
    Loading(&'a str),
    NotFound(&'a str),
    Module {
        tab: &'a Tab,
        unit: &'a Arc<dyn RenderableUnit>,
    },
}

pub struct App {
    pub session: Session,
    pub gate: SessionGate,
    pub router: Router,
    pub loader: AppLoader,
    pub tabs: TabsStore,
    pub modules: HashMap<String, Arc<dyn RenderableUnit>>,
    pub pending: Option<String>,
    pub not_found: Option<String>,
    pub status_message: String,
    pub login_error: Option<String>,
    pub signing_in: bool,
    pub validation_timeout: Duration,
}

impl App {
    pub fn new(
        registry: Arc<AppRegistry>,
        login_path: &str,
        validation_timeout: Duration,
        load_timeout: Duration,
        credentials: Option<Credentials>,
    ) -> Self {
        Self {
            session: Session::restore(credentials),
            gate: SessionGate::new(login_path),
            router: Router::new(),
            loader: AppLoader::new(registry, load_timeout),
            tabs: TabsStore::new(),
            modules: HashMap::new(),
            pending: None,
            not_found: None,
            status_message: String::from("Welcome to Switchboard"),
            login_error: None,
            signing_in: false,
            validation_timeout,
        }
    }

    pub fn from_config(
        registry: Arc<AppRegistry>,
        config: &ResolvedConfig,
        credentials: Option<Credentials>,
    ) -> Self {
        Self::new(
            registry,
            &config.login_path,
            config.validation_timeout,
            config.load_timeout,
            credentials,
        )
    }

    pub fn registry(&self) -> &AppRegistry {
        self.loader.registry()
    }

    /// True while something async is visibly in progress.
    pub fn is_busy(&self) -> bool {
        self.signing_in || self.gate.is_validating() || self.pending.is_some()
    }

    pub fn main_view(&self) -> MainView<'_> {
        if !self.gate.is_open(&self.session) {
            return if self.session.is_authenticated() && self.gate.is_validating() {
                MainView::Validating
            } else {
                MainView::Login
            };
        }
        if let Some(code) = self.not_found.as_deref() {
            return MainView::NotFound(code);
        }
        if let Some(code) = self.pending.as_deref() {
            return MainView::Loading(code);
        }
        if let Some(tab) = self.tabs.active_tab()
            && let Some(unit) = self.modules.get(&tab.id)
        {
            return MainView::Module { tab, unit };
        }
        MainView::Home
    }
}
