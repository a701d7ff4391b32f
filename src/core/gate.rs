//! # Session Gate
//!
//! Decides whether protected content may render.
//!
//! ```text
//!            not authenticated
//!   Initial ───────────────────────────► Invalid ──► redirect(login)
//!      │
//!      │ authenticated
//!      ▼
//!   Validating{epoch} ── valid ──► Valid{epoch} ──► render
//!      │
//!      └──── rejected / error / timeout ──► Invalid{epoch} ──► redirect(login)
//! ```
//!
//! Every state carries the session epoch it was decided for. When the
//! session changes (sign-in, sign-out) the stale decision no longer applies
//! and the next [`SessionGate::check`] starts a fresh pass.
//!
//! Navigation requested before the session has validated is queued and
//! handed back once it does; it is dropped if validation fails.

use std::time::Duration;

use log::{debug, info, warn};

use crate::core::session::{Session, SessionValidator};

/// Where the gate sends rejected viewers.
pub trait Navigator {
    fn redirect(&mut self, path: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Initial,
    Validating { epoch: u64 },
    Valid { epoch: u64 },
    Invalid { epoch: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Protected content may render.
    Render,
    /// Render nothing and start validating the session for `epoch`.
    StartValidation { epoch: u64 },
    /// Render nothing; validation is in flight.
    Suspend,
    /// Render nothing; the viewer has been redirected.
    Denied,
}

impl GateDecision {
    pub fn renders_protected(&self) -> bool {
        matches!(self, GateDecision::Render)
    }
}

/// Result of one validation attempt. Everything except `Valid` fails closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Rejected,
    Failed(String),
    TimedOut,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }
}

/// What to do with a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Proceed,
    Deferred,
    Denied,
}

#[derive(Debug)]
pub struct SessionGate {
    state: GateState,
    login_path: String,
    deferred: Vec<String>,
}

impl SessionGate {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            state: GateState::Initial,
            login_path: login_path.into(),
            deferred: Vec::new(),
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Pure read used by renderers.
    pub fn is_open(&self, session: &Session) -> bool {
        session.is_authenticated() && self.state == GateState::Valid { epoch: session.epoch() }
    }

    pub fn is_validating(&self) -> bool {
        matches!(self.state, GateState::Validating { .. })
    }

    /// Run on every protected render pass.
    pub fn check(&mut self, session: &Session, nav: &mut dyn Navigator) -> GateDecision {
        let epoch = session.epoch();

        if !session.is_authenticated() {
            if !matches!(self.state, GateState::Invalid { .. }) {
                info!("No authenticated session; redirecting without validation");
                self.deny(epoch, nav);
            }
            return GateDecision::Denied;
        }

        match self.state {
            GateState::Valid { epoch: e } if e == epoch => GateDecision::Render,
            GateState::Validating { epoch: e } if e == epoch => GateDecision::Suspend,
            GateState::Invalid { epoch: e } if e == epoch => GateDecision::Denied,
            _ => {
                debug!("Starting session validation for epoch {}", epoch);
                self.state = GateState::Validating { epoch };
                GateDecision::StartValidation { epoch }
            }
        }
    }

    /// Apply a validation result. Results for a pass that is no longer
    /// current are ignored.
    pub fn finish(
        &mut self,
        epoch: u64,
        outcome: &ValidationOutcome,
        nav: &mut dyn Navigator,
    ) -> GateDecision {
        if self.state != (GateState::Validating { epoch }) {
            debug!("Ignoring stale validation result for epoch {}: {:?}", epoch, outcome);
            return match self.state {
                GateState::Valid { .. } => GateDecision::Render,
                GateState::Invalid { .. } => GateDecision::Denied,
                _ => GateDecision::Suspend,
            };
        }

        if outcome.is_valid() {
            info!("Session validated (epoch {})", epoch);
            self.state = GateState::Valid { epoch };
            GateDecision::Render
        } else {
            warn!("Session rejected (epoch {}): {:?}", epoch, outcome);
            self.deny(epoch, nav);
            GateDecision::Denied
        }
    }

    /// Admit, defer or refuse a navigation to `code`.
    pub fn admit(&mut self, session: &Session, code: &str) -> Admission {
        if !session.is_authenticated() {
            return Admission::Denied;
        }
        match self.state {
            GateState::Valid { epoch } if epoch == session.epoch() => Admission::Proceed,
            GateState::Invalid { epoch } if epoch == session.epoch() => Admission::Denied,
            _ => {
                if !self.deferred.iter().any(|c| c == code) {
                    debug!("Deferring '{}' until the session validates", code);
                    self.deferred.push(code.to_string());
                }
                Admission::Deferred
            }
        }
    }

    /// Hand back queued navigation, oldest first. Empty unless valid.
    pub fn take_deferred(&mut self) -> Vec<String> {
        if matches!(self.state, GateState::Valid { .. }) {
            std::mem::take(&mut self.deferred)
        } else {
            Vec::new()
        }
    }

    pub fn deferred(&self) -> &[String] {
        &self.deferred
    }

    /// Start over at `Initial` (explicit new render pass).
    pub fn reset(&mut self) {
        self.state = GateState::Initial;
        self.deferred.clear();
    }

    fn deny(&mut self, epoch: u64, nav: &mut dyn Navigator) {
        if !self.deferred.is_empty() {
            debug!("Dropping {} deferred navigation(s)", self.deferred.len());
        }
        self.deferred.clear();
        self.state = GateState::Invalid { epoch };
        nav.redirect(&self.login_path);
    }
}

/// Ask the validator about `token`, failing closed on error or timeout.
pub async fn run_validation(
    validator: &dyn SessionValidator,
    token: &str,
    timeout: Duration,
) -> ValidationOutcome {
    match tokio::time::timeout(timeout, validator.validate_session(token)).await {
        Ok(Ok(true)) => ValidationOutcome::Valid,
        Ok(Ok(false)) => ValidationOutcome::Rejected,
        Ok(Err(e)) => {
            warn!("Session validation errored: {}", e);
            ValidationOutcome::Failed(e.to_string())
        }
        Err(_) => {
            warn!("Session validation timed out after {:?}", timeout);
            ValidationOutcome::TimedOut
        }
    }
}
