//! # Go-To Prompt
//!
//! Small overlay (Ctrl+G) where the user types an application code.
//! Unknown codes are not rejected here; the shell resolves them and shows
//! the not-found card.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::components::centered_box;
use crate::tui::event::TuiEvent;

#[derive(Debug, Default)]
pub struct GotoPrompt {
    pub buffer: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum GotoEvent {
    Open(String),
    Dismiss,
}

impl GotoPrompt {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventHandler for GotoPrompt {
    type Event = GotoEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<GotoEvent> {
        match event {
            TuiEvent::Escape => Some(GotoEvent::Dismiss),
            TuiEvent::InputChar(c) if !c.is_whitespace() => {
                self.buffer.push(*c);
                None
            }
            TuiEvent::Paste(text) => {
                self.buffer.push_str(text.trim());
                None
            }
            TuiEvent::Backspace => {
                self.buffer.pop();
                None
            }
            TuiEvent::Submit => {
                let code = self.buffer.trim();
                if code.is_empty() {
                    Some(GotoEvent::Dismiss)
                } else {
                    Some(GotoEvent::Open(code.to_string()))
                }
            }
            _ => None,
        }
    }
}

impl Component for GotoPrompt {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_box(40, 3, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Open app ")
            .title_bottom(Line::from(" Enter open  Esc cancel ").centered());
        let input = Paragraph::new(self.buffer.as_str()).block(block);
        frame.render_widget(input, overlay);

        let x = overlay.x + 1 + self.buffer.width() as u16;
        frame.set_cursor_position(Position::new(
            x.min(overlay.right().saturating_sub(2)),
            overlay.y + 1,
        ));
    }
}
