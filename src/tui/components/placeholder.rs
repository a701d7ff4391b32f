//! Centered spinner with a message, shown while something loads.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;
use crate::tui::components::header::spinner_glyph;

pub struct Placeholder {
    pub message: String,
    pub spinner_frame: usize,
}

impl Placeholder {
    pub fn new(message: impl Into<String>, spinner_frame: usize) -> Self {
        Self {
            message: message.into(),
            spinner_frame,
        }
    }
}

impl Component for Placeholder {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [center] = Layout::vertical([Constraint::Length(1)])
            .flex(Flex::Center)
            .areas(area);
        let line = Line::from(vec![
            Span::styled(
                format!("{} ", spinner_glyph(self.spinner_frame)),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(self.message.clone(), Style::default().fg(Color::Gray)),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), center);
    }
}
