use std::fmt::Write;

use super::{RenderError, Renderer};
use crate::monitor::DashboardSnapshot;

const HEADERS: [&str; 4] = ["Website", "Status", "Response Time", "Hosting Package"];

/// Plain, aligned text table.
pub struct TerminalRenderer {
    title: String,
}

impl TerminalRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }
}

impl Renderer for TerminalRenderer {
    fn render(&self, snapshot: &DashboardSnapshot) -> Result<String, RenderError> {
        let rows: Vec<[String; 4]> = snapshot
            .reports
            .iter()
            .map(|r| {
                [
                    r.name.clone(),
                    r.status_text(),
                    r.response_time_display(),
                    r.hosting.clone(),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(out, "{}", snapshot.overall.label());
        let _ = writeln!(out);
        push_row(&mut out, &HEADERS.map(str::to_string), &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let _ = writeln!(out, "{}", rule.join("  "));
        for row in &rows {
            push_row(&mut out, row, &widths);
        }
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Last checked: {}",
            snapshot.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        Ok(out)
    }
}

fn push_row(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", padded.join("  ").trim_end());
}
