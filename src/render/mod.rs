//! Turns a [`DashboardSnapshot`] into something a person can look at.
use thiserror::Error;

use crate::monitor::DashboardSnapshot;

pub mod html;
pub mod json;
pub mod output;
pub mod terminal;

pub use html::HtmlRenderer;
pub use json::JsonRenderer;
pub use output::write_output;
pub use terminal::TerminalRenderer;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Templating error: {0}")]
    Template(#[from] tera::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A rendering surface for completed refresh cycles.
pub trait Renderer: Send + Sync {
    fn render(&self, snapshot: &DashboardSnapshot) -> Result<String, RenderError>;
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Html,
    Json,
}

/// `auto_refresh_secs` only affects HTML, where it becomes a meta refresh.
pub fn renderer_for(
    format: OutputFormat,
    title: &str,
    auto_refresh_secs: Option<u64>,
) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Text => Box::new(TerminalRenderer::new(title)),
        OutputFormat::Html => Box::new(HtmlRenderer::new(title).with_auto_refresh(auto_refresh_secs)),
        OutputFormat::Json => Box::new(JsonRenderer),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};

    use crate::monitor::{CheckResult, DashboardSnapshot, SiteOutcome, SiteReport};

    fn report(name: &str, hosting: &str, outcome: SiteOutcome) -> SiteReport {
        SiteReport {
            name: name.to_string(),
            url: format!("https://{}.gr", name.to_lowercase().replace(' ', "")),
            hosting: hosting.to_string(),
            outcome,
        }
    }

    pub fn snapshot() -> DashboardSnapshot {
        let started_at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        let finished_at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 2).unwrap();
        DashboardSnapshot::from_reports(
            vec![
                report("Kubik Digital", "GitHub", SiteOutcome::Checked(CheckResult::from_status_code(200, 150))),
                report("SEPAM", "Business Hosting (GR)", SiteOutcome::Checked(CheckResult::from_status_code(526, 320))),
                report("Be Vintage", "Shared Hosting (GR)", SiteOutcome::Checked(CheckResult::from_status_code(404, 90))),
                report(
                    "Sauvage Night Club",
                    "N/A",
                    SiteOutcome::Manual {
                        status: "DEACTIVATED".to_string(),
                    },
                ),
            ],
            started_at,
            finished_at,
        )
    }
}
