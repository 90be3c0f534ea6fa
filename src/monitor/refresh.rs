//! Refresh cycles: fan out one check per site, wait for all of them, aggregate.
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::aggregate::{BadgeKind, OverallStatus};
use super::checker::{CheckResult, CheckStatus, SiteChecker};
use super::site::SiteEntry;
use crate::error::{Result, StatusboardError};

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SiteOutcome {
    Checked(CheckResult),
    Manual { status: String },
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SiteReport {
    pub name: String,
    pub url: String,
    pub hosting: String,
    pub outcome: SiteOutcome,
}

impl SiteReport {
    pub fn badge(&self) -> BadgeKind {
        match &self.outcome {
            SiteOutcome::Checked(result) => BadgeKind::for_status(&result.status),
            SiteOutcome::Manual { .. } => BadgeKind::Manual,
        }
    }

    pub fn status_text(&self) -> String {
        match &self.outcome {
            SiteOutcome::Checked(result) => result.status.to_string(),
            SiteOutcome::Manual { status } => status.clone(),
        }
    }

    pub fn response_time_display(&self) -> String {
        match &self.outcome {
            SiteOutcome::Checked(result) => result.response_time_display(),
            SiteOutcome::Manual { .. } => "N/A".to_string(),
        }
    }

    pub fn checked_status(&self) -> Option<&CheckStatus> {
        match &self.outcome {
            SiteOutcome::Checked(result) => Some(&result.status),
            SiteOutcome::Manual { .. } => None,
        }
    }
}

/// Everything a renderer needs for one completed cycle, in configuration order.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub reports: Vec<SiteReport>,
    pub overall: OverallStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DashboardSnapshot {
    pub fn from_reports(
        reports: Vec<SiteReport>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let overall = OverallStatus::from_statuses(reports.iter().filter_map(SiteReport::checked_status));
        Self {
            reports,
            overall,
            started_at,
            finished_at,
        }
    }
}

// Clears the in-progress flag even when the cycle future is dropped mid-flight.
struct InProgressGuard<'a>(&'a AtomicBool);

impl Drop for InProgressGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct RefreshOrchestrator {
    sites: Vec<SiteEntry>,
    checker: Arc<dyn SiteChecker>,
    in_progress: AtomicBool,
}

impl RefreshOrchestrator {
    pub fn new(sites: Vec<SiteEntry>, checker: Arc<dyn SiteChecker>) -> Self {
        Self {
            sites,
            checker,
            in_progress: AtomicBool::new(false),
        }
    }

    pub fn sites(&self) -> &[SiteEntry] {
        &self.sites
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Runs one cycle. Every non-manual site is checked concurrently and the
    /// cycle settles only once all checks have.
    ///
    /// Returns [`StatusboardError::RefreshInProgress`] without probing anything
    /// if another cycle is still running.
    pub async fn refresh(&self) -> Result<DashboardSnapshot> {
        if self
            .in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(StatusboardError::RefreshInProgress);
        }
        let _guard = InProgressGuard(&self.in_progress);

        let started_at = Utc::now();
        info!(site_count = self.sites.len(), "Starting refresh cycle.");

        let checks = self.sites.iter().map(|site| async move {
            let outcome = match site.manual_override() {
                Some(status) => SiteOutcome::Manual {
                    status: status.to_string(),
                },
                None => SiteOutcome::Checked(self.checker.check(&site.url).await),
            };
            SiteReport {
                name: site.name.clone(),
                url: site.url.clone(),
                hosting: site.hosting.clone(),
                outcome,
            }
        });
        let reports = join_all(checks).await;

        let snapshot = DashboardSnapshot::from_reports(reports, started_at, Utc::now());
        info!(
            overall = ?snapshot.overall,
            elapsed_ms = (snapshot.finished_at - snapshot.started_at).num_milliseconds(),
            "Refresh cycle finished."
        );
        Ok(snapshot)
    }

    /// Periodic refresh loop with on-demand triggers.
    ///
    /// A cycle starts on every `interval` tick and whenever a message arrives on
    /// `trigger_rx`. Triggers that arrive while a cycle is running are dropped.
    /// The loop exits when `shutdown_rx` changes or its sender goes away.
    pub async fn watch<F>(
        &self,
        interval: Duration,
        mut trigger_rx: mpsc::Receiver<()>,
        mut shutdown_rx: watch::Receiver<()>,
        mut on_snapshot: F,
    ) where
        F: FnMut(&DashboardSnapshot) + Send,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = shutdown_rx.changed() => {
                    info!("Shutdown signal received, stopping refresh loop.");
                    break;
                }
                _ = ticker.tick() => {}
                Some(()) = trigger_rx.recv() => {
                    info!("On-demand refresh requested.");
                }
            }

            let cycle = self.refresh();
            tokio::pin!(cycle);
            let result = loop {
                tokio::select! {
                    biased;

                    _ = shutdown_rx.changed() => {
                        info!("Shutdown signal received during a refresh cycle, abandoning it.");
                        return;
                    }
                    Some(()) = trigger_rx.recv() => {
                        warn!("Refresh already in progress, ignoring on-demand request.");
                    }
                    result = &mut cycle => break result,
                }
            };

            match result {
                Ok(snapshot) => on_snapshot(&snapshot),
                Err(e) => warn!(error = %e, "Refresh cycle did not run."),
            }
        }
        info!("Refresh loop gracefully shut down.");
    }
}
