//! # Renderable Units
//!
//! Framework-agnostic description of what an application module shows.
//! Modules implement [`RenderableUnit`] and hand back a [`View`]; the TUI
//! adapter decides how each [`ViewBlock`] looks on screen.

/// Something the shell can display inside its chrome.
pub trait RenderableUnit: Send + Sync {
    /// Produce the current view. Called on every frame, so keep it cheap.
    fn render(&self) -> View;
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub heading: String,
    pub blocks: Vec<ViewBlock>,
}

impl View {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            blocks: Vec::new(),
        }
    }

    pub fn with(mut self, block: ViewBlock) -> Self {
        self.blocks.push(block);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewBlock {
    /// Free-form paragraph.
    Text(String),
    /// A row of stat cards.
    Stats(Vec<Stat>),
    /// Bordered card with a title.
    Card { title: String, body: String },
    /// Aligned `key: value` lines.
    KeyValues(Vec<(String, String)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stat {
    pub label: String,
    pub value: String,
    pub hint: Option<String>,
}

impl Stat {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            hint: None,
        }
    }
}

/// The static unit shown for unknown codes and failed loads.
pub struct NotFoundUnit {
    code: String,
}

impl NotFoundUnit {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

impl RenderableUnit for NotFoundUnit {
    fn render(&self) -> View {
        View::new("Not found").with(ViewBlock::Card {
            title: "Application not found".to_string(),
            body: format!(
                "No application is available for code \"{}\". Check the code or pick one from the home view.",
                self.code
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_unit_names_the_code() {
        let view = NotFoundUnit::new("xyz123").render();
        assert_eq!(view.heading, "Not found");
        match &view.blocks[0] {
            ViewBlock::Card { title, body } => {
                assert_eq!(title, "Application not found");
                assert!(body.contains("xyz123"));
            }
            other => panic!("expected card, got {:?}", other),
        }
    }

    #[test]
    fn test_view_builder_keeps_block_order() {
        let view = View::new("Reports")
            .with(ViewBlock::Text("intro".into()))
            .with(ViewBlock::Stats(vec![Stat::new("Users", "12")]));
        assert_eq!(view.blocks.len(), 2);
        assert!(matches!(view.blocks[0], ViewBlock::Text(_)));
        assert!(matches!(view.blocks[1], ViewBlock::Stats(_)));
    }
}
