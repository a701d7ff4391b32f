//! # Header Component
//!
//! Top status bar: product name, signed-in user and the current status.
//!
//! ## Conditional Formatting
//!
//! 1. **Busy**: `"Switchboard | ada@example.com | ⠋ Checking session..."`
//! 2. **Status message**: `"Switchboard | ada@example.com | Signed in as ..."`
//! 3. **Signed out**: `"Switchboard | not signed in"`
//!
//! Stateless: everything arrives as props.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn spinner_glyph(frame: usize) -> &'static str {
    SPINNER[frame % SPINNER.len()]
}

pub struct Header {
    /// Email of the signed-in user, if any.
    pub user: Option<String>,
    pub status_message: String,
    pub busy: bool,
    pub spinner_frame: usize,
}

impl Header {
    pub fn new(user: Option<String>, status_message: String, busy: bool, spinner_frame: usize) -> Self {
        Self {
            user,
            status_message,
            busy,
            spinner_frame,
        }
    }
}

impl Component for Header {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let dim = Style::default().fg(Color::DarkGray);
        let mut spans = vec![Span::styled(
            "Switchboard",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )];

        spans.push(Span::styled(" | ", dim));
        match &self.user {
            Some(email) => spans.push(Span::raw(email.clone())),
            None => spans.push(Span::styled("not signed in", dim)),
        }

        if self.busy {
            spans.push(Span::styled(" | ", dim));
            spans.push(Span::styled(
                format!("{} ", spinner_glyph(self.spinner_frame)),
                Style::default().fg(Color::Yellow),
            ));
            spans.push(Span::raw(self.status_message.clone()));
        } else if !self.status_message.is_empty() {
            spans.push(Span::styled(" | ", dim));
            spans.push(Span::raw(self.status_message.clone()));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
