//! Proxied reachability check and the classification of its outcome.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::version::user_agent;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const DEFAULT_PROXY_URL: &str = "https://corsproxy.io/";

/// Cloudflare's "Invalid SSL Certificate" status.
const SSL_HANDSHAKE_FAILED: u16 = 526;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Up,
    UpCheckSsl,
    Down(u16),
    Timeout,
    Error,
}

impl CheckStatus {
    pub fn from_status_code(code: u16) -> Self {
        if code == SSL_HANDSHAKE_FAILED {
            CheckStatus::UpCheckSsl
        } else if (200..400).contains(&code) {
            CheckStatus::Up
        } else {
            CheckStatus::Down(code)
        }
    }

    pub fn is_up(&self) -> bool {
        matches!(self, CheckStatus::Up | CheckStatus::UpCheckSsl)
    }

    pub fn is_down(&self) -> bool {
        !self.is_up()
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Up => f.write_str("Up"),
            CheckStatus::UpCheckSsl => f.write_str("Up (check ssl certificate)"),
            CheckStatus::Down(code) => write!(f, "Down ({code})"),
            CheckStatus::Timeout => f.write_str("Down (Timeout)"),
            CheckStatus::Error => f.write_str("Down (Error)"),
        }
    }
}

impl Serialize for CheckStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of one check. Latency is only ever present for the up kinds.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub status: CheckStatus,
    pub response_time_ms: Option<u64>,
}

impl CheckResult {
    pub fn from_status_code(code: u16, elapsed_ms: u64) -> Self {
        let status = CheckStatus::from_status_code(code);
        let response_time_ms = status.is_up().then_some(elapsed_ms);
        Self {
            status,
            response_time_ms,
        }
    }

    pub fn timeout() -> Self {
        Self {
            status: CheckStatus::Timeout,
            response_time_ms: None,
        }
    }

    pub fn error() -> Self {
        Self {
            status: CheckStatus::Error,
            response_time_ms: None,
        }
    }

    pub fn response_time_display(&self) -> String {
        match self.response_time_ms {
            Some(ms) => format!("{ms} ms"),
            None => "N/A".to_string(),
        }
    }
}

/// Anything able to produce a [`CheckResult`] for a target url.
#[async_trait]
pub trait SiteChecker: Send + Sync {
    async fn check(&self, url: &str) -> CheckResult;
}

/// Checks targets through a CORS-forwarding proxy that passes the target's
/// status code through unchanged.
#[derive(Debug, Clone)]
pub struct StatusChecker {
    client: Client,
    proxy_url: String,
    timeout: Duration,
}

impl StatusChecker {
    pub fn new(proxy_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent()).build()?;
        Ok(Self {
            client,
            proxy_url: proxy_url.into(),
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `<proxy>/?<percent-encoded target>`
    pub fn proxied_url(&self, target: &str) -> String {
        format!(
            "{}/?{}",
            self.proxy_url.trim_end_matches('/'),
            urlencoding::encode(target)
        )
    }

    #[instrument(skip(self), fields(timeout_ms = self.timeout.as_millis() as u64))]
    pub async fn check_status(&self, url: &str) -> CheckResult {
        let request_url = self.proxied_url(url);
        let start_time = Instant::now();
        let outcome = tokio::time::timeout(self.timeout, self.client.get(&request_url).send()).await;
        let elapsed_ms = (start_time.elapsed().as_secs_f64() * 1000.0).round() as u64;

        let result = match outcome {
            Ok(Ok(response)) => {
                let code = response.status().as_u16();
                CheckResult::from_status_code(code, elapsed_ms)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Request through proxy failed.");
                CheckResult::error()
            }
            Err(_) => CheckResult::timeout(),
        };

        if result.status.is_up() {
            debug!(status = %result.status, response_time_ms = elapsed_ms, "Site is up.");
        } else {
            warn!(status = %result.status, "Site is down.");
        }
        result
    }
}

#[async_trait]
impl SiteChecker for StatusChecker {
    async fn check(&self, url: &str) -> CheckResult {
        self.check_status(url).await
    }
}
