//! Site probing, aggregation and refresh cycles.
pub mod aggregate;
pub mod checker;
pub mod refresh;
pub mod site;

pub use aggregate::{BadgeKind, OverallStatus};
pub use checker::{CheckResult, CheckStatus, SiteChecker, StatusChecker};
pub use refresh::{DashboardSnapshot, RefreshOrchestrator, SiteOutcome, SiteReport};
pub use site::SiteEntry;
