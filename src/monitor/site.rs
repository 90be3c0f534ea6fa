use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StatusboardError};

fn default_hosting() -> String {
    "N/A".to_string()
}

/// One row of the dashboard, as declared in the `[[sites]]` list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SiteEntry {
    pub name: String,
    pub url: String,
    #[serde(default = "default_hosting")]
    pub hosting: String,
    #[serde(default)]
    pub manual_status: Option<String>,
}

impl SiteEntry {
    pub fn new(name: impl Into<String>, url: impl Into<String>, hosting: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            hosting: hosting.into(),
            manual_status: None,
        }
    }

    pub fn with_manual_status(mut self, status: impl Into<String>) -> Self {
        self.manual_status = Some(status.into());
        self
    }

    /// The override text, if one is set. Blank overrides count as unset.
    pub fn manual_override(&self) -> Option<&str> {
        self.manual_status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn is_manual(&self) -> bool {
        self.manual_override().is_some()
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(StatusboardError::InvalidConfig(format!(
                "site with url '{}' has an empty name",
                self.url
            )));
        }
        // Manual rows are never checked but their url is still rendered as a link.
        let parsed = Url::parse(&self.url).map_err(|e| {
            StatusboardError::InvalidConfig(format!(
                "site '{}' has an invalid url '{}': {e}",
                self.name, self.url
            ))
        })?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(StatusboardError::InvalidConfig(format!(
                "site '{}' uses unsupported scheme '{other}'",
                self.name
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_manual_status_is_not_manual() {
        let site = SiteEntry::new("Blank", "https://example.com", "GitHub").with_manual_status("  ");
        assert!(!site.is_manual());
        assert_eq!(site.manual_override(), None);

        let site = site.with_manual_status("DEACTIVATED");
        assert!(site.is_manual());
        assert_eq!(site.manual_override(), Some("DEACTIVATED"));
    }

    #[test]
    fn test_validate_rejects_bad_entries() {
        assert!(SiteEntry::new("", "https://example.com", "x").validate().is_err());
        assert!(SiteEntry::new("Ftp", "ftp://example.com", "x").validate().is_err());
        assert!(SiteEntry::new("Relative", "example.com", "x").validate().is_err());
        assert!(SiteEntry::new("Ok", "https://example.com/", "x").validate().is_ok());
    }

    #[test]
    fn test_validate_checks_url_of_manual_entries() {
        let site = SiteEntry::new("Gone", "https://sauvagenightclub.eu", "N/A").with_manual_status("DEACTIVATED");
        assert!(site.validate().is_ok());

        let empty = SiteEntry::new("Gone", "", "N/A").with_manual_status("DEACTIVATED");
        assert!(empty.validate().is_err());

        let script = SiteEntry::new("Gone", "javascript:alert(1)", "N/A").with_manual_status("DEACTIVATED");
        assert!(script.validate().is_err());
    }

    #[test]
    fn test_hosting_defaults_when_missing() {
        let site: SiteEntry = toml::from_str(
            r#"
            name = "Kubik Digital"
            url = "https://kubik.gr"
            "#,
        )
        .unwrap();
        assert_eq!(site.hosting, "N/A");
        assert_eq!(site.manual_status, None);
    }
}
