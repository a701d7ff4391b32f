//! Key hints for the current screen.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterMode {
    Login,
    Validating,
    Home,
    Workspace,
    Goto,
}

pub struct Footer {
    pub mode: FooterMode,
}

impl Footer {
    pub fn new(mode: FooterMode) -> Self {
        Self { mode }
    }

    pub fn hints(&self) -> &'static [(&'static str, &'static str)] {
        match self.mode {
            FooterMode::Login => &[("Tab", "next field"), ("Enter", "sign in"), ("Ctrl+C", "quit")],
            FooterMode::Validating => &[("Ctrl+L", "sign out"), ("Ctrl+C", "quit")],
            FooterMode::Home => &[
                ("↑↓", "select"),
                ("Enter", "open"),
                ("Ctrl+G", "go to"),
                ("Tab", "tabs"),
                ("Ctrl+L", "sign out"),
                ("Ctrl+C", "quit"),
            ],
            FooterMode::Workspace => &[
                ("Tab", "next"),
                ("Ctrl+W", "close"),
                ("Esc", "home"),
                ("Ctrl+G", "go to"),
                ("Ctrl+L", "sign out"),
                ("Ctrl+C", "quit"),
            ],
            FooterMode::Goto => &[("Enter", "open"), ("Esc", "cancel")],
        }
    }
}

impl Component for Footer {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let key_style = Style::default().fg(Color::Cyan);
        let text_style = Style::default().fg(Color::DarkGray);
        let mut spans = Vec::new();
        for (i, (key, label)) in self.hints().iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", text_style));
            }
            spans.push(Span::styled(*key, key_style));
            spans.push(Span::styled(format!(" {label}"), text_style));
        }
        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_mode_can_quit_or_cancel() {
        for mode in [
            FooterMode::Login,
            FooterMode::Validating,
            FooterMode::Home,
            FooterMode::Workspace,
        ] {
            assert!(Footer::new(mode).hints().iter().any(|(k, _)| *k == "Ctrl+C"));
        }
        assert!(Footer::new(FooterMode::Goto).hints().iter().any(|(k, _)| *k == "Esc"));
    }
}
