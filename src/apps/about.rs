//! Static information about this build and its key bindings.

use std::sync::Arc;

use crate::core::loader::LoadError;
use crate::core::view::{RenderableUnit, View, ViewBlock};

pub struct AboutUnit;

impl RenderableUnit for AboutUnit {
    fn render(&self) -> View {
        View::new("About Switchboard")
            .with(ViewBlock::Text(
                "A terminal shell that hosts dashboard applications behind one session.".to_string(),
            ))
            .with(ViewBlock::KeyValues(vec![
                ("Version".to_string(), env!("CARGO_PKG_VERSION").to_string()),
                ("Log file".to_string(), "switchboard.log".to_string()),
            ]))
            .with(ViewBlock::Card {
                title: "Keys".to_string(),
                body: [
                    "Ctrl+G  open an app by code",
                    "Tab / Shift+Tab  switch tabs",
                    "Ctrl+W  close tab",
                    "Esc  home",
                    "Ctrl+L  sign out",
                    "Ctrl+C  quit",
                ]
                .join("\n"),
            })
    }
}

pub async fn load() -> Result<Arc<dyn RenderableUnit>, LoadError> {
    Ok(Arc::new(AboutUnit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_about_lists_version_and_keys() {
        let view = AboutUnit.render();
        assert!(view.blocks.iter().any(|b| matches!(
            b,
            ViewBlock::KeyValues(pairs) if pairs.iter().any(|(k, v)| k == "Version" && v == env!("CARGO_PKG_VERSION"))
        )));
        assert!(view.blocks.iter().any(|b| matches!(
            b,
            ViewBlock::Card { body, .. } if body.contains("Ctrl+G")
        )));
    }
}
