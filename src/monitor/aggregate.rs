use serde::Serialize;

use super::checker::CheckStatus;

/// Health of the whole dashboard, driven by its worst checked site.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Operational,
    Degraded,
    MajorOutage,
}

impl OverallStatus {
    /// Manual rows must be filtered out by the caller; only check results count.
    pub fn from_statuses<'a, I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = &'a CheckStatus>,
    {
        statuses
            .into_iter()
            .map(|status| match status {
                CheckStatus::Up => OverallStatus::Operational,
                CheckStatus::UpCheckSsl => OverallStatus::Degraded,
                _ => OverallStatus::MajorOutage,
            })
            .max()
            .unwrap_or(OverallStatus::Operational)
    }

    pub fn label(&self) -> &'static str {
        match self {
            OverallStatus::Operational => "All Systems Operational",
            OverallStatus::Degraded => "Degraded Performance",
            OverallStatus::MajorOutage => "Major Outage",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            OverallStatus::Operational => "operational",
            OverallStatus::Degraded => "degraded",
            OverallStatus::MajorOutage => "outage",
        }
    }
}

/// Visual treatment of a single status badge.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKind {
    Up,
    Warning,
    Down,
    Manual,
}

impl BadgeKind {
    pub fn for_status(status: &CheckStatus) -> Self {
        match status {
            CheckStatus::Up => BadgeKind::Up,
            CheckStatus::UpCheckSsl => BadgeKind::Warning,
            _ => BadgeKind::Down,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            BadgeKind::Up => "up",
            BadgeKind::Warning => "warning",
            BadgeKind::Down => "down",
            BadgeKind::Manual => "hosting-off",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_is_operational() {
        let statuses: [CheckStatus; 0] = [];
        assert_eq!(OverallStatus::from_statuses(&statuses), OverallStatus::Operational);
    }

    #[test]
    fn test_all_up_is_operational() {
        let statuses = [CheckStatus::Up, CheckStatus::Up];
        assert_eq!(OverallStatus::from_statuses(&statuses), OverallStatus::Operational);
    }

    #[test]
    fn test_ssl_case_degrades_when_nothing_worse() {
        let statuses = [CheckStatus::Up, CheckStatus::UpCheckSsl];
        assert_eq!(OverallStatus::from_statuses(&statuses), OverallStatus::Degraded);
    }

    #[test]
    fn test_any_down_kind_is_major_outage() {
        for bad in [CheckStatus::Down(500), CheckStatus::Timeout, CheckStatus::Error] {
            let statuses = [CheckStatus::UpCheckSsl, bad, CheckStatus::Up];
            assert_eq!(OverallStatus::from_statuses(&statuses), OverallStatus::MajorOutage);
        }
    }

    #[test]
    fn test_badge_classes() {
        assert_eq!(BadgeKind::for_status(&CheckStatus::Up).css_class(), "up");
        assert_eq!(BadgeKind::for_status(&CheckStatus::UpCheckSsl).css_class(), "warning");
        assert_eq!(BadgeKind::for_status(&CheckStatus::Timeout).css_class(), "down");
        assert_eq!(BadgeKind::Manual.css_class(), "hosting-off");
    }
}
