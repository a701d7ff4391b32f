//! # Home Launcher
//!
//! Lists every registered application. Enter opens the selected one.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `HomeState` lives in `TuiState`
//! - `HomeView` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding};

use crate::core::registry::AppRegistry;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeEntry {
    pub code: String,
    pub title: String,
}

pub struct HomeState {
    pub entries: Vec<HomeEntry>,
    pub selected: usize,
    pub list_state: ListState,
}

impl HomeState {
    pub fn new(entries: Vec<HomeEntry>) -> Self {
        let mut list_state = ListState::default();
        if !entries.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            entries,
            selected: 0,
            list_state,
        }
    }

    pub fn from_registry(registry: &AppRegistry) -> Self {
        Self::new(
            registry
                .descriptors()
                .iter()
                .map(|d| HomeEntry {
                    code: d.code().to_string(),
                    title: d.title().to_string(),
                })
                .collect(),
        )
    }

    fn select(&mut self, index: usize) {
        self.selected = index;
        self.list_state.select(Some(index));
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum HomeEvent {
    Open(String),
}

impl EventHandler for HomeState {
    type Event = HomeEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<HomeEvent> {
        if self.entries.is_empty() {
            return None;
        }
        match event {
            TuiEvent::CursorUp => {
                self.select(self.selected.saturating_sub(1));
                None
            }
            TuiEvent::CursorDown => {
                self.select((self.selected + 1).min(self.entries.len() - 1));
                None
            }
            TuiEvent::Submit => self
                .entries
                .get(self.selected)
                .map(|e| HomeEvent::Open(e.code.clone())),
            _ => None,
        }
    }
}

/// Transient render wrapper for the launcher.
pub struct HomeView<'a> {
    state: &'a mut HomeState,
    open_codes: Vec<&'a str>,
}

impl<'a> HomeView<'a> {
    pub fn new(state: &'a mut HomeState, open_codes: Vec<&'a str>) -> Self {
        Self { state, open_codes }
    }
}

impl Component for HomeView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Applications ")
            .title_alignment(Alignment::Left)
            .padding(Padding::horizontal(1));

        let code_width = self
            .state
            .entries
            .iter()
            .map(|e| e.code.len())
            .max()
            .unwrap_or(0);

        let items: Vec<ListItem> = self
            .state
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let style = if i == self.state.selected {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                let marker = if self.open_codes.contains(&entry.code.as_str()) {
                    "  ● open"
                } else {
                    ""
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<code_width$}  ", entry.code), style),
                    Span::styled(entry.title.clone(), style),
                    Span::styled(marker, Style::default().fg(Color::Green)),
                ]))
            })
            .collect();

        frame.render_stateful_widget(List::new(items).block(block), area, &mut self.state.list_state);
    }
}
