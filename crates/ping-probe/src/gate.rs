//! Baseline gate: is there internet access at all?
//!
//! Probes a reliable third-party URL before every target probe. If that
//! fails, a target failure would say nothing about the target, so the
//! cycle is skipped.

use std::time::Duration;

use tracing::{debug, warn};

use ping_core::config::BASELINE_TIMEOUT;

use crate::checker::{ProbeResult, Prober};

/// Decides whether local connectivity is up, using a baseline URL.
#[derive(Debug, Clone)]
pub struct BaselineGate {
    prober: Prober,
    url: String,
    timeout: Duration,
}

impl BaselineGate {
    pub fn new(prober: Prober, url: impl Into<String>) -> Self {
        Self {
            prober,
            url: url.into(),
            timeout: BASELINE_TIMEOUT,
        }
    }

    /// Override the fixed baseline timeout (for testing).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// True only if the baseline answered HTTP 200. Never fails.
    pub async fn is_reachable(&self) -> bool {
        match self.prober.check(&self.url, self.timeout).await {
            ProbeResult::Success(200) => {
                debug!(baseline = %self.url, "baseline reachable");
                true
            }
            other => {
                warn!(
                    baseline = %self.url,
                    reason = %other,
                    "couldn't reach baseline URL, assuming no internet"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Fixture, refused_url, spawn_fixture};

    fn gate(url: &str) -> BaselineGate {
        BaselineGate::new(Prober::direct().unwrap(), url)
    }

    #[test]
    fn default_timeout_is_one_second() {
        let gate = gate("http://example.com");
        assert_eq!(gate.timeout, Duration::from_secs(1));
        assert_eq!(gate.url(), "http://example.com");
    }

    #[tokio::test]
    async fn reachable_on_200() {
        let url = spawn_fixture(Fixture::Status(200)).await;
        assert!(gate(&url).is_reachable().await);
    }

    #[tokio::test]
    async fn other_statuses_are_unreachable() {
        for status in [204, 404, 503] {
            let url = spawn_fixture(Fixture::Status(status)).await;
            assert!(!gate(&url).is_reachable().await, "status {status}");
        }
    }

    #[tokio::test]
    async fn connection_errors_are_unreachable() {
        let url = refused_url().await;
        assert!(!gate(&url).is_reachable().await);

        let url = spawn_fixture(Fixture::CloseAfterRequest).await;
        assert!(!gate(&url).is_reachable().await);
    }

    #[tokio::test]
    async fn slow_baseline_is_unreachable() {
        let url = spawn_fixture(Fixture::Hang).await;
        let gate = gate(&url).with_timeout(Duration::from_millis(100));
        assert!(!gate.is_reachable().await);
    }
}
