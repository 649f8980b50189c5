//! Reachability probe logic.
//!
//! Performs one HTTP GET against a URL with a hard timeout and classifies
//! the outcome. There are no retries here: the next scheduler tick is the
//! retry.

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use ping_core::{CODE_MISC, MonitorConfig, ProbeOutcome};

/// Raw result of a single probe, before mapping onto `(code, label)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// The server answered with this status code.
    Success(u16),
    /// The connection was closed or reset before the response completed.
    Disconnected,
    /// The request did not complete within the timeout.
    Timeout,
    /// Anything else: DNS failure, refused connection, malformed response.
    Other(String),
}

impl ProbeResult {
    /// Map onto the fixed code/label table.
    pub fn outcome(&self) -> ProbeOutcome {
        match self {
            ProbeResult::Success(status) => ProbeOutcome::good(*status),
            ProbeResult::Disconnected => ProbeOutcome::disconnected(),
            ProbeResult::Timeout => ProbeOutcome::timeout(),
            ProbeResult::Other(_) => ProbeOutcome::misc(),
        }
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeResult::Success(status) => write!(f, "HTTP {status}"),
            ProbeResult::Disconnected => f.write_str("remote end closed connection without response"),
            ProbeResult::Timeout => f.write_str("timed out"),
            ProbeResult::Other(detail) => f.write_str(detail),
        }
    }
}

/// Errors constructing a prober.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Issues probes. Cheap to clone; clones share one HTTP client.
#[derive(Debug, Clone)]
pub struct Prober {
    client: reqwest::Client,
}

impl Prober {
    /// Build a prober that opens a fresh connection for every probe,
    /// going through the `HTTP_PROXY`/`HTTPS_PROXY` proxies when set.
    pub fn new() -> Result<Self, ProbeError> {
        Self::build(client_builder())
    }

    /// Like [`Prober::new`], but always connects to the target directly.
    pub fn direct() -> Result<Self, ProbeError> {
        Self::build(client_builder().no_proxy())
    }

    /// Send every probe through `proxy_url`.
    pub fn via_proxy(proxy_url: &str) -> Result<Self, ProbeError> {
        Self::build(client_builder().proxy(reqwest::Proxy::all(proxy_url)?))
    }

    /// [`Prober::new`] or [`Prober::direct`], per the `proxy` setting.
    pub fn for_config(config: &MonitorConfig) -> Result<Self, ProbeError> {
        if config.proxy {
            Self::new()
        } else {
            Self::direct()
        }
    }

    fn build(builder: reqwest::ClientBuilder) -> Result<Self, ProbeError> {
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// GET `url` once and classify the result.
    pub async fn check(&self, url: &str, timeout: Duration) -> ProbeResult {
        let result = self.client.get(url).timeout(timeout).send().await;
        match result {
            Ok(resp) => ProbeResult::Success(resp.status().as_u16()),
            Err(e) => classify_error(&e),
        }
    }

    /// GET `url` once and return its `(code, label)`.
    ///
    /// Miscellaneous failures are reported on the operator log; the detail
    /// is not part of the returned outcome.
    pub async fn probe(&self, url: &str, timeout: Duration) -> ProbeOutcome {
        let result = self.check(url, timeout).await;
        match &result {
            ProbeResult::Other(detail) => {
                warn!(%url, code = CODE_MISC, error = %detail, "using misc code for probe failure");
            }
            other => {
                debug!(%url, result = %other, "probe finished");
            }
        }
        result.outcome()
    }
}

fn client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .user_agent(concat!("pingwatch/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(0)
}

/// Classify a client error. Checked in order: disconnected, timeout, other.
pub fn classify_error(err: &reqwest::Error) -> ProbeResult {
    if is_disconnect(err) {
        ProbeResult::Disconnected
    } else if err.is_timeout() {
        ProbeResult::Timeout
    } else {
        ProbeResult::Other(error_chain(err))
    }
}

/// Whether anything in the error chain says the peer hung up mid-exchange.
fn is_disconnect(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(hyper_err) = e.downcast_ref::<hyper::Error>() {
            if hyper_err.is_incomplete_message() {
                return true;
            }
        }
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            if matches!(
                io_err.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::UnexpectedEof
                    | io::ErrorKind::BrokenPipe
            ) {
                return true;
            }
        }
        current = e.source();
    }
    false
}

/// `outer: inner: root` rendering of an error and its sources.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut current = err.source();
    while let Some(e) = current {
        out.push_str(": ");
        out.push_str(&e.to_string());
        current = e.source();
    }
    out
}
