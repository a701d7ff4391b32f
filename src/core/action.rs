//! # Actions
//!
//! Everything that can happen in Switchboard becomes an `Action`.
//! User picks an app? That's `Action::Navigate(code)`.
//! Session check comes back? That's `Action::ValidationFinished { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns the effects the adapter must run. No I/O here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Vec<Effect>
//! ```
//!
//! Every update ends with a gate check, so a state change that affects the
//! session (sign-in, sign-out, expiry) is picked up before the next frame.

use log::{debug, info, warn};

use crate::core::gate::{Admission, GateDecision, GateState, ValidationOutcome};
use crate::core::loader::{LoadHandle, LoadState, NotFoundReason, ResolvedApp};
use crate::core::session::{Credentials, Password};
use crate::core::state::{App, Router};
use crate::core::tabs::Tab;

#[derive(Debug)]
pub enum Action {
    /// First action after startup, with the app requested on the command line.
    Boot { initial_app: Option<String> },
    Navigate(String),
    ValidationFinished { epoch: u64, outcome: ValidationOutcome },
    ModuleLoaded { code: String, epoch: u64, resolved: ResolvedApp },
    ActivateTab(String),
    NextTab,
    PreviousTab,
    CloseTab(String),
    CloseActiveTab,
    GoHome,
    SubmitLogin { email: String, password: Password },
    SignedIn(Credentials),
    LoginFailed(String),
    SignOut,
    Quit,
}

/// Side effects requested by `update()`, executed by the adapter.
#[derive(Debug)]
pub enum Effect {
    Quit,
    /// Validate the session token; report back with `ValidationFinished`.
    Validate { epoch: u64, token: String },
    /// Drive a module load; report back with `ModuleLoaded`.
    AwaitModule { handle: LoadHandle, epoch: u64 },
    /// Sign in; report back with `SignedIn` or `LoginFailed`.
    Login { email: String, password: Password },
    /// Persist the current credentials and hand the token to the client.
    StoreCredentials,
    /// Remove persisted credentials and clear the client token.
    ForgetCredentials,
}

pub fn update(app: &mut App, action: Action) -> Vec<Effect> {
    let mut effects = Vec::new();

    match action {
        Action::Boot { initial_app } => {
            if let Some(code) = initial_app {
                request(app, &code, &mut effects);
            }
        }
        Action::Navigate(code) => request(app, &code, &mut effects),
        Action::ValidationFinished { epoch, outcome } => {
            finish_validation(app, epoch, outcome, &mut effects);
        }
        Action::ModuleLoaded {
            code,
            epoch,
            resolved,
        } => {
            app.loader.prune_settled();
            if epoch != app.session.epoch() || !app.gate.is_open(&app.session) {
                info!("Discarding load result for '{}' from a stale session", code);
            } else {
                apply_resolved(app, &code, resolved);
            }
        }
        Action::ActivateTab(id) => match app.tabs.set_active(&id) {
            Ok(()) => show_active(app),
            Err(e) => warn!("Ignoring tab activation: {}", e),
        },
        Action::NextTab => {
            app.tabs.activate_next();
            show_active(app);
        }
        Action::PreviousTab => {
            app.tabs.activate_previous();
            show_active(app);
        }
        Action::CloseTab(id) => close_tab(app, &id),
        Action::CloseActiveTab => {
            if let Some(id) = app.tabs.active_id().map(str::to_string) {
                close_tab(app, &id);
            }
        }
        Action::GoHome => {
            app.tabs.clear_active();
            show_active(app);
        }
        Action::SubmitLogin { email, password } => {
            if app.signing_in {
                debug!("Sign-in already in progress");
            } else if email.trim().is_empty() || password.is_empty() {
                app.login_error = Some("Email and password are required".to_string());
            } else {
                app.signing_in = true;
                app.login_error = None;
                effects.push(Effect::Login {
                    email: email.trim().to_string(),
                    password,
                });
            }
        }
        Action::SignedIn(credentials) => {
            app.signing_in = false;
            app.login_error = None;
            clear_workspace(app);
            app.session.sign_in(credentials);
            app.status_message = "Checking session...".to_string();
            effects.push(Effect::StoreCredentials);
        }
        Action::LoginFailed(message) => {
            app.signing_in = false;
            app.login_error = Some(message);
        }
        Action::SignOut => {
            if app.session.is_authenticated() {
                end_session(app);
                app.status_message = "Signed out".to_string();
                effects.push(Effect::ForgetCredentials);
            }
        }
        Action::Quit => effects.push(Effect::Quit),
    }

    sync_gate(app, &mut effects);
    effects
}

fn sync_gate(app: &mut App, effects: &mut Vec<Effect>) {
    if let GateDecision::StartValidation { epoch } = app.gate.check(&app.session, &mut app.router)
        && let Some(token) = app.session.token()
    {
        effects.push(Effect::Validate {
            epoch,
            token: token.to_string(),
        });
    }
}

fn finish_validation(
    app: &mut App,
    epoch: u64,
    outcome: ValidationOutcome,
    effects: &mut Vec<Effect>,
) {
    if app.gate.state() != (GateState::Validating { epoch }) {
        debug!("Validation result for epoch {} no longer applies", epoch);
        return;
    }

    match app.gate.finish(epoch, &outcome, &mut app.router) {
        GateDecision::Render => {
            if let Some(user) = app.session.user() {
                app.status_message = format!("Signed in as {}", user.email);
            }
            app.router.go("/");
            for code in app.gate.take_deferred() {
                request(app, &code, effects);
            }
        }
        GateDecision::Denied => {
            end_session(app);
            app.login_error = Some(match outcome {
                ValidationOutcome::Rejected => {
                    "Session expired. Please sign in again.".to_string()
                }
                _ => "Could not verify your session. Please sign in again.".to_string(),
            });
            effects.push(Effect::ForgetCredentials);
        }
        GateDecision::Suspend | GateDecision::StartValidation { .. } => {}
    }
}

fn request(app: &mut App, code: &str, effects: &mut Vec<Effect>) {
    let code = code.trim();
    if code.is_empty() {
        return;
    }
    match app.gate.admit(&app.session, code) {
        Admission::Proceed => start_load(app, code, effects),
        Admission::Deferred => app.pending = Some(code.to_string()),
        Admission::Denied => info!("Navigation to '{}' refused: no valid session", code),
    }
}

fn start_load(app: &mut App, code: &str, effects: &mut Vec<Effect>) {
    app.not_found = None;
    app.pending = Some(code.to_string());
    app.router.go(Router::app_path(code));

    let handle = app.loader.load(code);
    match handle.state() {
        LoadState::Ready(resolved) => apply_resolved(app, code, resolved),
        LoadState::Pending => effects.push(Effect::AwaitModule {
            handle,
            epoch: app.session.epoch(),
        }),
    }
}

fn apply_resolved(app: &mut App, code: &str, resolved: ResolvedApp) {
    let current = app.pending.as_deref() == Some(code);
    if current {
        app.pending = None;
    }

    match resolved {
        ResolvedApp::Loaded(unit) => {
            let title = app
                .registry()
                .resolve(code)
                .map(|d| d.title().to_string())
                .unwrap_or_else(|| code.to_string());
            app.modules.insert(code.to_string(), unit);
            if current {
                app.tabs.open(Tab::new(code, title));
                app.router.go(Router::app_path(code));
                app.not_found = None;
            } else {
                debug!("Late load for '{}' opens in the background", code);
                app.tabs.insert(Tab::new(code, title));
            }
        }
        ResolvedApp::NotFound(reason) => {
            match &reason {
                NotFoundReason::Unregistered => {
                    info!("Showing not-found for unregistered code '{}'", code)
                }
                NotFoundReason::LoadFailed(e) => {
                    warn!("Showing not-found for '{}' after load failure: {}", code, e)
                }
            }
            if current {
                app.not_found = Some(code.to_string());
            }
        }
    }
}

fn close_tab(app: &mut App, id: &str) {
    let was_active = app.tabs.active_id() == Some(id);
    if app.tabs.close(id).is_some() {
        app.modules.remove(id);
        if was_active {
            show_active(app);
        }
    }
}

/// Drop transient views and point the router at whatever is active.
fn show_active(app: &mut App) {
    app.pending = None;
    app.not_found = None;
    let path = match app.tabs.active_id() {
        Some(id) => Router::app_path(id),
        None => "/".to_string(),
    };
    app.router.go(path);
}

fn clear_workspace(app: &mut App) {
    app.tabs.clear();
    app.modules.clear();
    app.loader.cancel_all();
    app.pending = None;
    app.not_found = None;
}

fn end_session(app: &mut App) {
    app.session.sign_out();
    clear_workspace(app);
}
