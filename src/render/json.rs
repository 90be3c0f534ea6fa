use super::{RenderError, Renderer};
use crate::monitor::DashboardSnapshot;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, snapshot: &DashboardSnapshot) -> Result<String, RenderError> {
        Ok(serde_json::to_string_pretty(snapshot)?)
    }
}
