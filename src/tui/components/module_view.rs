//! # Module View
//!
//! Draws a [`View`] produced by a loaded module (or the not-found card).
//!
//! ```text
//! ┌ Heading ────────────────────────────────┐
//! │ Text paragraph                          │
//! │ ┌ Revenue ──┐┌ Orders ───┐┌ Churn ────┐ │
//! │ │ $12,400   ││ 318       ││ 2.1%      │ │
//! │ │ +4%       ││           ││ -0.3%     │ │
//! │ └───────────┘└───────────┘└───────────┘ │
//! │ ┌ Card title ───────────────────────────┐│
//! │ │ body                                  ││
//! │ └───────────────────────────────────────┘│
//! └─────────────────────────────────────────┘
//! ```
//!
//! Blocks stack top to bottom; whatever doesn't fit is clipped.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};

use crate::core::view::{Stat, View, ViewBlock};
use crate::tui::component::Component;

const STAT_CARD_HEIGHT: u16 = 4;

pub struct ModuleView {
    view: View,
}

impl ModuleView {
    pub fn new(view: View) -> Self {
        Self { view }
    }
}

impl Component for ModuleView {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let outer = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                format!(" {} ", self.view.heading),
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .padding(Padding::horizontal(1));
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let width = inner.width;
        let constraints: Vec<Constraint> = self
            .view
            .blocks
            .iter()
            .map(|b| Constraint::Length(block_height(b, width)))
            .chain(std::iter::once(Constraint::Min(0)))
            .collect();
        let areas = Layout::vertical(constraints).split(inner);

        for (block, area) in self.view.blocks.iter().zip(areas.iter()) {
            render_block(frame, *area, block);
        }
    }
}

fn block_height(block: &ViewBlock, width: u16) -> u16 {
    match block {
        ViewBlock::Text(text) => Paragraph::new(text.as_str())
            .wrap(Wrap { trim: true })
            .line_count(width) as u16,
        ViewBlock::Stats(_) => STAT_CARD_HEIGHT,
        ViewBlock::Card { body, .. } => {
            Paragraph::new(body.as_str())
                .wrap(Wrap { trim: false })
                .line_count(width.saturating_sub(2)) as u16
                + 2
        }
        ViewBlock::KeyValues(pairs) => pairs.len() as u16,
    }
}

fn render_block(frame: &mut Frame, area: Rect, block: &ViewBlock) {
    match block {
        ViewBlock::Text(text) => {
            frame.render_widget(
                Paragraph::new(text.as_str()).wrap(Wrap { trim: true }),
                area,
            );
        }
        ViewBlock::Stats(stats) => render_stats(frame, area, stats),
        ViewBlock::Card { title, body } => {
            let card = Paragraph::new(body.as_str())
                .wrap(Wrap { trim: false })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::DarkGray))
                        .title(format!(" {title} ")),
                );
            frame.render_widget(card, area);
        }
        ViewBlock::KeyValues(pairs) => {
            let key_width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
            let lines: Vec<Line> = pairs
                .iter()
                .map(|(k, v)| {
                    Line::from(vec![
                        Span::styled(
                            format!("{k:<key_width$}  "),
                            Style::default().fg(Color::DarkGray),
                        ),
                        Span::raw(v.clone()),
                    ])
                })
                .collect();
            frame.render_widget(Paragraph::new(lines), area);
        }
    }
}

fn render_stats(frame: &mut Frame, area: Rect, stats: &[Stat]) {
    if stats.is_empty() {
        return;
    }
    let columns = Layout::horizontal(vec![Constraint::Fill(1); stats.len()]).split(area);
    for (stat, column) in stats.iter().zip(columns.iter()) {
        let mut lines = vec![Line::from(Span::styled(
            stat.value.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        if let Some(hint) = &stat.hint {
            let color = if hint.starts_with('-') {
                Color::Red
            } else {
                Color::Green
            };
            lines.push(Line::from(Span::styled(hint.clone(), Style::default().fg(color))));
        }
        let card = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(" {} ", stat.label)),
        );
        frame.render_widget(card, *column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::view::NotFoundUnit;
    use crate::core::view::RenderableUnit;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_text(view: View) -> String {
        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut module = ModuleView::new(view);
        terminal.draw(|f| module.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_renders_every_block_kind() {
        let view = View::new("Weekly Summary")
            .with(ViewBlock::Text("Period: W41".into()))
            .with(ViewBlock::Stats(vec![Stat {
                hint: Some("+4%".into()),
                ..Stat::new("Revenue", "$12,400")
            }]))
            .with(ViewBlock::KeyValues(vec![("Service".into(), "Backend API".into())]))
            .with(ViewBlock::Card {
                title: "Highlights".into(),
                body: "Best Tuesday".into(),
            });
        let text = render_text(view);
        for expected in [
            "Weekly Summary",
            "Period: W41",
            "Revenue",
            "$12,400",
            "+4%",
            "Backend API",
            "Highlights",
            "Best Tuesday",
        ] {
            assert!(text.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn test_not_found_card_renders() {
        let text = render_text(NotFoundUnit::new("xyz123").render());
        assert!(text.contains("Application not found"));
        assert!(text.contains("xyz123"));
    }
}
