//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as struct fields:
//! - `Header`: product name, user, status and spinner
//! - `TabStrip`: Home plus open tabs
//! - `Footer`: key hints for the current screen
//! - `Placeholder`: spinner while validating or loading
//! - `ModuleView`: draws a module's `View`
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that keep local state and emit high-level events:
//! - `HomeState` / `HomeView`: application launcher
//! - `LoginForm` / `LoginView`: sign-in form
//! - `GotoPrompt`: open-by-code overlay
//!
//! Stateful components follow the persistent state + transient wrapper
//! pattern: the state lives in `TuiState`, the view is built each frame
//! with borrowed state.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── header.rs
//! ├── tab_strip.rs
//! ├── footer.rs
//! ├── placeholder.rs
//! ├── module_view.rs
//! ├── home.rs
//! ├── login.rs
//! └── goto.rs
//! ```

use ratatui::layout::{Constraint, Flex, Layout, Rect};

pub mod footer;
pub mod goto;
pub mod header;
pub mod home;
pub mod login;
pub mod module_view;
pub mod placeholder;
pub mod tab_strip;

pub use footer::{Footer, FooterMode};
pub use goto::{GotoEvent, GotoPrompt};
pub use header::Header;
pub use home::{HomeEvent, HomeState, HomeView};
pub use login::{LoginEvent, LoginForm, LoginView};
pub use module_view::ModuleView;
pub use placeholder::Placeholder;
pub use tab_strip::TabStrip;

/// A box `percent_x` wide and `height` rows tall, centered in `outer`.
pub(crate) fn centered_box(percent_x: u16, height: u16, outer: Rect) -> Rect {
    let [center_v] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(outer);
    let [center] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_box_is_centered() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_box(50, 10, outer);
        assert_eq!(inner.width, 50);
        assert_eq!(inner.height, 10);
        assert_eq!(inner.x, 25);
        assert_eq!(inner.y, 15);
    }

    #[test]
    fn test_centered_box_clamps_to_small_areas() {
        let outer = Rect::new(0, 0, 20, 4);
        let inner = centered_box(50, 10, outer);
        assert!(inner.height <= 4);
    }
}
