use crate::core::state::{App, MainView};
use crate::core::view::{NotFoundUnit, RenderableUnit};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    Footer, FooterMode, Header, HomeView, LoginView, ModuleView, Placeholder, TabStrip,
};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

/// Header, tab strip, main area, footer. The tab strip stays blank until
/// the session gate is open.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Length(1), Min(0), Length(1)]);
    let [header_area, tabs_area, main_area, footer_area] = layout.areas(frame.area());

    Header::new(
        app.session.user().map(|u| u.email.clone()),
        app.status_message.clone(),
        app.is_busy(),
        spinner_frame,
    )
    .render(frame, header_area);

    let mode = match app.main_view() {
        MainView::Login => {
            LoginView::new(&tui.login, app.login_error.as_deref(), app.signing_in)
                .render(frame, main_area);
            FooterMode::Login
        }
        MainView::Validating => {
            Placeholder::new("Checking your session", spinner_frame).render(frame, main_area);
            FooterMode::Validating
        }
        MainView::Home => {
            TabStrip::new(app.tabs.list(), app.tabs.active_id()).render(frame, tabs_area);
            let open = app.tabs.list().iter().map(|t| t.id.as_str()).collect();
            HomeView::new(&mut tui.home, open).render(frame, main_area);
            FooterMode::Home
        }
        MainView::Loading(code) => {
            TabStrip::new(app.tabs.list(), app.tabs.active_id()).render(frame, tabs_area);
            let title = app.registry().resolve(code).map(|d| d.title()).unwrap_or(code);
            Placeholder::new(format!("Opening {title}"), spinner_frame).render(frame, main_area);
            FooterMode::Workspace
        }
        MainView::NotFound(code) => {
            TabStrip::new(app.tabs.list(), app.tabs.active_id()).render(frame, tabs_area);
            ModuleView::new(NotFoundUnit::new(code).render()).render(frame, main_area);
            FooterMode::Workspace
        }
        MainView::Module { unit, .. } => {
            TabStrip::new(app.tabs.list(), app.tabs.active_id()).render(frame, tabs_area);
            ModuleView::new(unit.render()).render(frame, main_area);
            FooterMode::Workspace
        }
    };

    let mode = match tui.goto.as_mut() {
        Some(goto) => {
            goto.render(frame, main_area);
            FooterMode::Goto
        }
        None => mode,
    };
    Footer::new(mode).render(frame, footer_area);
}
