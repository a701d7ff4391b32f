//! # Tab Strip Component
//!
//! One line under the header: a fixed `Home` entry followed by every open
//! tab, with the active one highlighted. Long titles are truncated by
//! display width so wide characters don't push later tabs off screen.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Tabs;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::tabs::Tab;
use crate::tui::component::Component;

pub const MAX_TITLE_WIDTH: usize = 20;

pub struct TabStrip<'a> {
    pub tabs: &'a [Tab],
    pub active: Option<&'a str>,
}

impl<'a> TabStrip<'a> {
    pub fn new(tabs: &'a [Tab], active: Option<&'a str>) -> Self {
        Self { tabs, active }
    }

    /// Titles in display order; index 0 is Home.
    pub fn titles(&self) -> Vec<String> {
        std::iter::once("Home".to_string())
            .chain(
                self.tabs
                    .iter()
                    .map(|t| truncate_title(&t.title, MAX_TITLE_WIDTH)),
            )
            .collect()
    }

    /// Index into [`Self::titles`] of the highlighted entry.
    pub fn selected(&self) -> usize {
        self.active
            .and_then(|id| self.tabs.iter().position(|t| t.id == id))
            .map(|i| i + 1)
            .unwrap_or(0)
    }
}

impl Component for TabStrip<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let tabs = Tabs::new(self.titles())
            .select(self.selected())
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .divider("│");
        frame.render_widget(tabs, area);
    }
}

/// Truncate to `max_width` display columns, ending with `…` when cut.
pub fn truncate_title(title: &str, max_width: usize) -> String {
    if title.width() <= max_width {
        return title.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in title.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_truncate_title_by_display_width() {
        assert_eq!(truncate_title("Reports", 20), "Reports");
        assert_eq!(truncate_title("Quarterly Reports", 10), "Quarterly…");
        // Each CJK character is two columns wide.
        assert_eq!(truncate_title("報告書一覧", 5), "報告…");
        assert_eq!(truncate_title("abc", 0), "");
    }

    #[test]
    fn test_selected_index_accounts_for_home() {
        let tabs = vec![Tab::new("reports", "Reports"), Tab::new("status", "Service Status")];
        assert_eq!(TabStrip::new(&tabs, None).selected(), 0);
        assert_eq!(TabStrip::new(&tabs, Some("status")).selected(), 2);
        assert_eq!(TabStrip::new(&tabs, Some("gone")).selected(), 0);
        assert_eq!(
            TabStrip::new(&tabs, None).titles(),
            vec!["Home", "Reports", "Service Status"]
        );
    }

    #[test]
    fn test_render_lists_tabs() {
        let tabs = vec![Tab::new("reports", "Reports")];
        let backend = TestBackend::new(40, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| TabStrip::new(&tabs, Some("reports")).render(f, f.area()))
            .unwrap();
        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Home"));
        assert!(text.contains("Reports"));
    }
}
