//! Reports: the backend's summary figures as stat cards.
//!
//! Data is fetched once when the module is instantiated. A failed fetch
//! fails the load, which the shell shows as not found.

use std::sync::Arc;

use log::{info, warn};

use crate::backend::{BackendClient, ReportSummary};
use crate::core::loader::LoadError;
use crate::core::view::{RenderableUnit, Stat, View, ViewBlock};

pub struct ReportsUnit {
    summary: ReportSummary,
}

impl ReportsUnit {
    pub fn new(summary: ReportSummary) -> Self {
        Self { summary }
    }
}

impl RenderableUnit for ReportsUnit {
    fn render(&self) -> View {
        let mut view = View::new(self.summary.title.clone());

        if let Some(period) = &self.summary.period {
            view = view.with(ViewBlock::Text(format!("Period: {period}")));
        }

        if self.summary.stats.is_empty() {
            view = view.with(ViewBlock::Text(
                "No figures reported for this period.".to_string(),
            ));
        } else {
            let stats = self
                .summary
                .stats
                .iter()
                .map(|s| Stat {
                    hint: s.change.clone(),
                    ..Stat::new(&s.label, &s.value)
                })
                .collect();
            view = view.with(ViewBlock::Stats(stats));
        }

        if !self.summary.highlights.is_empty() {
            let body = self
                .summary
                .highlights
                .iter()
                .map(|h| format!("• {h}"))
                .collect::<Vec<_>>()
                .join("\n");
            view = view.with(ViewBlock::Card {
                title: "Highlights".to_string(),
                body,
            });
        }

        view
    }
}

pub async fn load(client: Arc<BackendClient>) -> Result<Arc<dyn RenderableUnit>, LoadError> {
    match client.fetch_report_summary().await {
        Ok(summary) => {
            info!("Loaded report summary with {} stats", summary.stats.len());
            Ok(Arc::new(ReportsUnit::new(summary)))
        }
        Err(e) => {
            warn!("Report summary fetch failed: {}", e);
            Err(LoadError::Failed(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ReportStat;

    fn summary() -> ReportSummary {
        ReportSummary {
            title: "Weekly Summary".to_string(),
            period: Some("2026-W41".to_string()),
            stats: vec![
                ReportStat {
                    label: "Revenue".to_string(),
                    value: "$12,400".to_string(),
                    change: Some("+4%".to_string()),
                },
                ReportStat {
                    label: "Orders".to_string(),
                    value: "318".to_string(),
                    change: None,
                },
            ],
            highlights: vec!["Best Tuesday this quarter".to_string()],
        }
    }

    #[test]
    fn test_render_builds_stats_and_highlights() {
        let view = ReportsUnit::new(summary()).render();
        assert_eq!(view.heading, "Weekly Summary");
        assert_eq!(view.blocks[0], ViewBlock::Text("Period: 2026-W41".to_string()));
        match &view.blocks[1] {
            ViewBlock::Stats(stats) => {
                assert_eq!(stats.len(), 2);
                assert_eq!(stats[0].hint.as_deref(), Some("+4%"));
                assert_eq!(stats[1].hint, None);
            }
            other => panic!("expected stats, got {:?}", other),
        }
        assert!(matches!(&view.blocks[2], ViewBlock::Card { title, .. } if title == "Highlights"));
    }

    #[test]
    fn test_render_without_stats_says_so() {
        let view = ReportsUnit::new(ReportSummary {
            stats: Vec::new(),
            highlights: Vec::new(),
            period: None,
            ..summary()
        })
        .render();
        assert_eq!(
            view.blocks,
            vec![ViewBlock::Text("No figures reported for this period.".to_string())]
        );
    }

    #[tokio::test]
    async fn test_load_against_unreachable_backend_fails() {
        let client = Arc::new(BackendClient::new("http://127.0.0.1:1"));
        assert!(matches!(load(client).await, Err(LoadError::Failed(_))));
    }
}
