//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the shell,
//! translates keyboard events into core `Action`s and runs the `Effect`s
//! the reducer hands back.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! ```text
//! keyboard ──► handle_event() ──► update() ──► effects ──► EffectRunner
//!                                    ▲                          │
//!                                    │      tokio::spawn(...)   │
//!                                    └──── mpsc::Receiver ◄─────┘
//! ```
//!
//! Background work (session validation, module loads, sign-in) runs on
//! tokio tasks and reports back through a `std::sync::mpsc` channel that
//! the loop drains after handling input.
//!
//! ## Redraw Strategy
//!
//! - **Busy** (validating, loading, signing in): draws every ~80ms so the
//!   spinner moves.
//! - **Idle**: sleeps up to 200ms and only redraws on input or when a
//!   background result arrives.

mod component;
pub mod components;
pub mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;

use crate::apps;
use crate::backend::{BackendClient, BackendError};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::gate::run_validation;
use crate::core::loader::LoadHandle;
use crate::core::registry::AppRegistry;
use crate::core::session::{self, Password};
use crate::core::state::{App, MainView};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    GotoEvent, GotoPrompt, HomeEvent, HomeState, LoginEvent, LoginForm,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub home: HomeState,
    pub login: LoginForm,
    /// Go-to overlay (None = hidden)
    pub goto: Option<GotoPrompt>,
}

impl TuiState {
    pub fn new(registry: &AppRegistry) -> Self {
        Self {
            home: HomeState::from_registry(registry),
            login: LoginForm::new(),
            goto: None,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock
        )?;
        info!("Terminal modes enabled (bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste);
    }
}

/// Which input routing applies right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Login,
    Validating,
    Home,
    Workspace,
}

fn screen(app: &App) -> Screen {
    match app.main_view() {
        MainView::Login => Screen::Login,
        MainView::Validating => Screen::Validating,
        MainView::Home => Screen::Home,
        MainView::Loading(_) | MainView::NotFound(_) | MainView::Module { .. } => {
            Screen::Workspace
        }
    }
}

/// Route one input event to the focused component or straight to `update()`.
pub fn handle_event(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Vec<Effect> {
    match event {
        TuiEvent::Resize => return Vec::new(),
        TuiEvent::ForceQuit => return update(app, Action::Quit),
        _ => {}
    }

    if let Some(goto) = tui.goto.as_mut() {
        return match goto.handle_event(&event) {
            Some(GotoEvent::Open(code)) => {
                tui.goto = None;
                update(app, Action::Navigate(code))
            }
            Some(GotoEvent::Dismiss) => {
                tui.goto = None;
                Vec::new()
            }
            None => Vec::new(),
        };
    }

    match screen(app) {
        Screen::Login => match tui.login.handle_event(&event) {
            Some(LoginEvent::Submit { email, password }) => {
                update(app, Action::SubmitLogin { email, password })
            }
            None => Vec::new(),
        },
        Screen::Validating => match event {
            TuiEvent::SignOut => update(app, Action::SignOut),
            _ => Vec::new(),
        },
        current @ (Screen::Home | Screen::Workspace) => match event {
            TuiEvent::SignOut => update(app, Action::SignOut),
            TuiEvent::OpenGoto => {
                tui.goto = Some(GotoPrompt::new());
                Vec::new()
            }
            TuiEvent::CloseTab => update(app, Action::CloseActiveTab),
            TuiEvent::NextTab => update(app, Action::NextTab),
            TuiEvent::PreviousTab => update(app, Action::PreviousTab),
            TuiEvent::Escape => update(app, Action::GoHome),
            _ if current == Screen::Home => match tui.home.handle_event(&event) {
                Some(HomeEvent::Open(code)) => update(app, Action::Navigate(code)),
                None => Vec::new(),
            },
            _ => Vec::new(),
        },
    }
}

/// User-facing text for a failed sign-in.
pub fn login_failure_message(error: &BackendError) -> String {
    match error {
        BackendError::Api {
            status: 400 | 401 | 403,
            ..
        } => "Invalid email or password".to_string(),
        BackendError::Network(_) => "Could not reach the backend".to_string(),
        BackendError::Api { message, .. } => format!("Sign-in failed: {message}"),
        other => format!("Sign-in failed: {other}"),
    }
}

/// Executes reducer effects. Async work is spawned on the tokio runtime and
/// reports back as `Action`s on `tx`.
pub struct EffectRunner {
    client: Arc<BackendClient>,
    tx: mpsc::Sender<Action>,
    session_file: Option<PathBuf>,
}

impl EffectRunner {
    pub fn new(
        client: Arc<BackendClient>,
        tx: mpsc::Sender<Action>,
        session_file: Option<PathBuf>,
    ) -> Self {
        Self {
            client,
            tx,
            session_file,
        }
    }

    /// Run `effects`; returns true when the app should quit.
    pub fn run(&self, app: &App, effects: Vec<Effect>) -> bool {
        let mut quit = false;
        for effect in effects {
            match effect {
                Effect::Quit => quit = true,
                Effect::Validate { epoch, token } => {
                    self.spawn_validation(epoch, token, app.validation_timeout)
                }
                Effect::AwaitModule { handle, epoch } => self.spawn_module_wait(handle, epoch),
                Effect::Login { email, password } => self.spawn_login(email, password),
                Effect::StoreCredentials | Effect::ForgetCredentials => {
                    self.client.set_token(app.session.token());
                    if let Some(path) = &self.session_file {
                        session::persist(path, &app.session);
                    }
                }
            }
        }
        quit
    }

    fn spawn_validation(&self, epoch: u64, token: String, timeout: Duration) {
        info!("Spawning session validation (epoch {})", epoch);
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = run_validation(client.as_ref(), &token, timeout).await;
            if tx.send(Action::ValidationFinished { epoch, outcome }).is_err() {
                warn!("Failed to send validation result: receiver dropped");
            }
        });
    }

    fn spawn_module_wait(&self, handle: LoadHandle, epoch: u64) {
        let code = handle.code().to_string();
        debug!("Waiting on module '{}' (epoch {})", code, epoch);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let resolved = handle.resolve().await;
            if tx
                .send(Action::ModuleLoaded {
                    code,
                    epoch,
                    resolved,
                })
                .is_err()
            {
                warn!("Failed to send module result: receiver dropped");
            }
        });
    }

    fn spawn_login(&self, email: String, password: Password) {
        info!("Spawning sign-in request");
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let action = match client.login(&email, &password).await {
                Ok(credentials) => Action::SignedIn(credentials),
                Err(e) => {
                    warn!("Sign-in failed: {}", e);
                    Action::LoginFailed(login_failure_message(&e))
                }
            };
            if tx.send(action).is_err() {
                warn!("Failed to send sign-in result: receiver dropped");
            }
        });
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let client = Arc::new(BackendClient::new(config.backend_url.clone()));
    let registry = apps::builtin_registry(client.clone())
        .map(Arc::new)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    let credentials = session::restore_persisted();
    client.set_token(credentials.as_ref().map(|c| c.token.as_str()));
    let mut app = App::from_config(registry.clone(), &config, credentials);
    let mut tui = TuiState::new(&registry);

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let runner = EffectRunner::new(client, tx, session::session_path());

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let boot = update(
        &mut app,
        Action::Boot {
            initial_app: config.default_app.clone(),
        },
    );
    let mut should_quit = runner.run(&app, boot);

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    while !should_quit {
        let animating = app.is_busy();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(200)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let effects = handle_event(&mut app, &mut tui, event);
            if runner.run(&app, effects) {
                should_quit = true;
                break;
            }
        }

        // Handle background task results
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effects = update(&mut app, action);
            if runner.run(&app, effects) {
                should_quit = true;
            }
        }
    }

    info!("Shutting down");
    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gate::ValidationOutcome;
    use crate::test_support::{StubValidator, sample_credentials, settle, test_app};

    fn tui_for(app: &App) -> TuiState {
        TuiState::new(app.registry())
    }

    async fn validated() -> (App, TuiState) {
        let mut app = test_app(Some(sample_credentials()));
        let effects = update(&mut app, Action::Boot { initial_app: None });
        settle(&mut app, effects, &StubValidator::Accept).await;
        let tui = tui_for(&app);
        (app, tui)
    }

    #[test]
    fn test_force_quit_from_any_screen() {
        let mut app = test_app(None);
        let mut tui = tui_for(&app);
        let effects = handle_event(&mut app, &mut tui, TuiEvent::ForceQuit);
        assert!(effects.iter().any(|e| matches!(e, Effect::Quit)));
    }

    #[test]
    fn test_login_screen_routes_typing_to_form() {
        let mut app = test_app(None);
        update(&mut app, Action::Boot { initial_app: None });
        let mut tui = tui_for(&app);

        for c in "ada@example.com".chars() {
            handle_event(&mut app, &mut tui, TuiEvent::InputChar(c));
        }
        handle_event(&mut app, &mut tui, TuiEvent::NextTab);
        for c in "pw".chars() {
            handle_event(&mut app, &mut tui, TuiEvent::InputChar(c));
        }
        let effects = handle_event(&mut app, &mut tui, TuiEvent::Submit);

        assert!(matches!(
            effects.as_slice(),
            [Effect::Login { email, .. }] if email == "ada@example.com"
        ));
        assert!(app.tabs.is_empty());
    }

    #[tokio::test]
    async fn test_home_enter_opens_selected_app() {
        let (mut app, mut tui) = validated().await;
        let effects = handle_event(&mut app, &mut tui, TuiEvent::Submit);
        assert!(effects.iter().any(|e| matches!(e, Effect::AwaitModule { .. })));
        settle(&mut app, effects, &StubValidator::Accept).await;
        assert_eq!(app.tabs.active_id(), Some("reports"));
    }

    #[tokio::test]
    async fn test_goto_prompt_navigates_by_code() {
        let (mut app, mut tui) = validated().await;
        handle_event(&mut app, &mut tui, TuiEvent::OpenGoto);
        assert!(tui.goto.is_some());

        for c in "xyz123".chars() {
            handle_event(&mut app, &mut tui, TuiEvent::InputChar(c));
        }
        let effects = handle_event(&mut app, &mut tui, TuiEvent::Submit);
        assert!(effects.is_empty());
        assert!(tui.goto.is_none());
        assert!(matches!(app.main_view(), MainView::NotFound("xyz123")));
        assert!(app.tabs.is_empty());
    }

    #[tokio::test]
    async fn test_escape_in_goto_only_closes_prompt() {
        let (mut app, mut tui) = validated().await;
        let effects = handle_event(&mut app, &mut tui, TuiEvent::Submit);
        settle(&mut app, effects, &StubValidator::Accept).await;

        handle_event(&mut app, &mut tui, TuiEvent::OpenGoto);
        handle_event(&mut app, &mut tui, TuiEvent::Escape);
        assert!(tui.goto.is_none());
        assert_eq!(app.tabs.active_id(), Some("reports"));

        handle_event(&mut app, &mut tui, TuiEvent::Escape);
        assert!(matches!(app.main_view(), MainView::Home));
    }

    #[tokio::test]
    async fn test_sign_out_shortcut_returns_to_login() {
        let (mut app, mut tui) = validated().await;
        let effects = handle_event(&mut app, &mut tui, TuiEvent::SignOut);
        assert!(effects.iter().any(|e| matches!(e, Effect::ForgetCredentials)));
        assert!(matches!(app.main_view(), MainView::Login));
    }

    #[test]
    fn test_login_failure_messages() {
        let unauthorized = BackendError::Api {
            status: 401,
            message: "bad credentials".into(),
        };
        assert_eq!(login_failure_message(&unauthorized), "Invalid email or password");
        assert_eq!(
            login_failure_message(&BackendError::Network("refused".into())),
            "Could not reach the backend"
        );
        let server = BackendError::Api {
            status: 500,
            message: "boom".into(),
        };
        assert_eq!(login_failure_message(&server), "Sign-in failed: boom");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_effect_runner_reports_validation_back() {
        let mut app = test_app(Some(sample_credentials()));
        let effects = update(&mut app, Action::Boot { initial_app: None });

        let (tx, rx) = mpsc::channel();
        let client = Arc::new(BackendClient::new("http://127.0.0.1:1"));
        let runner = EffectRunner::new(client, tx, None);
        assert!(!runner.run(&app, effects));

        let action = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .unwrap()
            .unwrap();
        match action {
            Action::ValidationFinished { epoch, outcome } => {
                assert_eq!(epoch, 0);
                // Unreachable backend fails closed.
                assert!(matches!(outcome, ValidationOutcome::Failed(_)));
            }
            other => panic!("unexpected action {:?}", other),
        }
    }
}
