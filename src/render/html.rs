use serde::Serialize;
use tera::{Context, Tera};

use super::{RenderError, Renderer};
use crate::monitor::DashboardSnapshot;

const TEMPLATE: &str = include_str!("templates/dashboard.html");

#[derive(Serialize)]
struct Row {
    name: String,
    url: String,
    status: String,
    badge_class: &'static str,
    response_time: String,
    hosting: String,
}

/// Self-contained static HTML page, one table row per site.
pub struct HtmlRenderer {
    title: String,
    auto_refresh_secs: Option<u64>,
}

impl HtmlRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            auto_refresh_secs: None,
        }
    }

    /// Adds a `<meta http-equiv="refresh">` so an open page reloads itself.
    pub fn with_auto_refresh(mut self, secs: Option<u64>) -> Self {
        self.auto_refresh_secs = secs;
        self
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, snapshot: &DashboardSnapshot) -> Result<String, RenderError> {
        let rows: Vec<Row> = snapshot
            .reports
            .iter()
            .map(|r| Row {
                name: r.name.clone(),
                url: r.url.clone(),
                status: r.status_text(),
                badge_class: r.badge().css_class(),
                response_time: r.response_time_display(),
                hosting: r.hosting.clone(),
            })
            .collect();

        let mut context = Context::new();
        context.insert("title", &self.title);
        context.insert("refresh_secs", &self.auto_refresh_secs);
        context.insert("overall_label", snapshot.overall.label());
        context.insert("overall_class", snapshot.overall.css_class());
        context.insert("rows", &rows);
        context.insert(
            "last_checked",
            &snapshot.finished_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        );

        Ok(Tera::one_off(TEMPLATE, &context, true)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{CheckResult, SiteOutcome};
    use crate::render::fixtures;

    #[test]
    fn test_badges_and_aggregate_banner() {
        let html = HtmlRenderer::new("Website Status").render(&fixtures::snapshot()).unwrap();

        assert!(html.contains(r#"<div class="overall outage">Major Outage</div>"#));
        assert!(html.contains(r#"<span class="status-badge up">Up</span>"#));
        assert!(html.contains(r#"<span class="status-badge warning">Up (check ssl certificate)</span>"#));
        assert!(html.contains(r#"<span class="status-badge down">Down (404)</span>"#));
        assert!(html.contains(r#"<span class="status-badge hosting-off">DEACTIVATED</span>"#));
        assert!(html.contains("150 ms"));
        assert!(html.contains("Last checked: 2026-10-19 08:30:02 UTC"));
        assert!(!html.contains("http-equiv=\"refresh\""));
    }

    #[test]
    fn test_auto_refresh_meta() {
        let html = HtmlRenderer::new("Website Status")
            .with_auto_refresh(Some(60))
            .render(&fixtures::snapshot())
            .unwrap();
        assert!(html.contains(r#"<meta http-equiv="refresh" content="60">"#));
    }

    #[test]
    fn test_site_names_are_escaped() {
        let mut snapshot = fixtures::snapshot();
        snapshot.reports[0].name = "<script>alert(1)</script>".to_string();
        snapshot.reports[0].outcome = SiteOutcome::Checked(CheckResult::timeout());

        let html = HtmlRenderer::new("t").render(&snapshot).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Down (Timeout)"));
    }
}
