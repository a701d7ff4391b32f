//! # Login Form
//!
//! Email and password fields. The password is masked on screen and wrapped
//! in [`Password`] as soon as it leaves the form.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::session::Password;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::centered_box;
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

pub struct LoginForm {
    pub email: String,
    password: String,
    pub focus: LoginField,
}

#[derive(Debug, PartialEq, Eq)]
pub enum LoginEvent {
    Submit { email: String, password: Password },
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            focus: LoginField::Email,
        }
    }

    pub fn password_len(&self) -> usize {
        self.password.chars().count()
    }

    /// Forget the typed password (after sign-out or a failed attempt).
    pub fn clear_password(&mut self) {
        self.password.clear();
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for LoginForm {
    type Event = LoginEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<LoginEvent> {
        match event {
            TuiEvent::InputChar(c) => {
                self.focused_mut().push(*c);
                None
            }
            TuiEvent::Paste(text) => {
                let line: String = text.chars().filter(|c| !c.is_control()).collect();
                self.focused_mut().push_str(&line);
                None
            }
            TuiEvent::Backspace => {
                self.focused_mut().pop();
                None
            }
            TuiEvent::NextTab
            | TuiEvent::PreviousTab
            | TuiEvent::CursorUp
            | TuiEvent::CursorDown => {
                self.toggle_focus();
                None
            }
            TuiEvent::Submit => {
                if self.focus == LoginField::Email && self.password.is_empty() {
                    self.focus = LoginField::Password;
                    return None;
                }
                let password = Password::new(std::mem::take(&mut self.password));
                self.focus = LoginField::Password;
                Some(LoginEvent::Submit {
                    email: self.email.trim().to_string(),
                    password,
                })
            }
            _ => None,
        }
    }
}

/// Transient render wrapper for the sign-in screen.
pub struct LoginView<'a> {
    form: &'a LoginForm,
    error: Option<&'a str>,
    signing_in: bool,
}

impl<'a> LoginView<'a> {
    pub fn new(form: &'a LoginForm, error: Option<&'a str>, signing_in: bool) -> Self {
        Self {
            form,
            error,
            signing_in,
        }
    }
}

impl Component for LoginView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_box(50, 10, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Sign in ")
            .padding(Padding::horizontal(1));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let [email_area, password_area, _, message_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(0),
            Constraint::Min(1),
        ])
        .areas(inner);

        let masked = "•".repeat(self.form.password_len());
        for (label, value, field, field_area) in [
            ("Email", self.form.email.as_str(), LoginField::Email, email_area),
            ("Password", masked.as_str(), LoginField::Password, password_area),
        ] {
            let focused = self.form.focus == field;
            let border = if focused {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let input = Paragraph::new(value).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(format!(" {label} ")),
            );
            frame.render_widget(input, field_area);

            if focused && !self.signing_in {
                let x = field_area.x + 1 + value.width() as u16;
                let max_x = field_area.right().saturating_sub(2);
                frame.set_cursor_position(Position::new(x.min(max_x), field_area.y + 1));
            }
        }

        let message = if self.signing_in {
            Line::from(Span::styled("Signing in...", Style::default().fg(Color::Yellow)))
        } else if let Some(error) = self.error {
            Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
        } else {
            Line::from(Span::styled(
                "Enter your dashboard credentials",
                Style::default().fg(Color::DarkGray),
            ))
        };
        frame.render_widget(Paragraph::new(message), message_area);
    }
}
