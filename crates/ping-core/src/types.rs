//! Record and outcome types shared by the prober, monitor, and log crates.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Synthetic code: the peer closed the connection before a response completed.
pub const CODE_DISCONNECTED: u16 = 590;

/// Synthetic code: the request did not complete within its timeout.
pub const CODE_TIMEOUT: u16 = 591;

/// Synthetic code: any other failure (DNS, refused, malformed response...).
pub const CODE_MISC: u16 = 599;

/// The status code counted as "up" when rendering uptime.
pub const CODE_UP: u16 = 200;

// ── Labels ─────────────────────────────────────────────────────────

/// Short fixed label stored alongside each code.
///
/// Synthetic codes map 1:1 onto `Disconnected`, `Timeout` and `Misc`;
/// any status code actually returned by a server is `Good`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeLabel {
    Good,
    Disconnected,
    Timeout,
    Misc,
}

impl ProbeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeLabel::Good => "good",
            ProbeLabel::Disconnected => "disconnected",
            ProbeLabel::Timeout => "timeout",
            ProbeLabel::Misc => "misc",
        }
    }

    /// The synthetic code for a failure label, `None` for `Good`.
    pub fn synthetic_code(&self) -> Option<u16> {
        match self {
            ProbeLabel::Good => None,
            ProbeLabel::Disconnected => Some(CODE_DISCONNECTED),
            ProbeLabel::Timeout => Some(CODE_TIMEOUT),
            ProbeLabel::Misc => Some(CODE_MISC),
        }
    }

    /// Derive the label for a bare code (used for label-less legacy lines).
    pub fn for_code(code: u16) -> Self {
        match code {
            CODE_DISCONNECTED => ProbeLabel::Disconnected,
            CODE_TIMEOUT => ProbeLabel::Timeout,
            CODE_MISC => ProbeLabel::Misc,
            _ => ProbeLabel::Good,
        }
    }
}

impl fmt::Display for ProbeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a label string is not one of the fixed labels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown probe label {0:?}")]
pub struct UnknownLabel(pub String);

impl FromStr for ProbeLabel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "good" => Ok(ProbeLabel::Good),
            "disconnected" => Ok(ProbeLabel::Disconnected),
            "timeout" => Ok(ProbeLabel::Timeout),
            "misc" => Ok(ProbeLabel::Misc),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

// ── Outcomes ───────────────────────────────────────────────────────

/// The `(code, label)` pair a single probe produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub code: u16,
    pub label: ProbeLabel,
}

impl ProbeOutcome {
    /// A response was received; `code` is whatever the server returned.
    pub fn good(code: u16) -> Self {
        Self {
            code,
            label: ProbeLabel::Good,
        }
    }

    pub fn disconnected() -> Self {
        Self {
            code: CODE_DISCONNECTED,
            label: ProbeLabel::Disconnected,
        }
    }

    pub fn timeout() -> Self {
        Self {
            code: CODE_TIMEOUT,
            label: ProbeLabel::Timeout,
        }
    }

    pub fn misc() -> Self {
        Self {
            code: CODE_MISC,
            label: ProbeLabel::Misc,
        }
    }

    /// Whether this outcome carries a locally invented code.
    pub fn is_synthetic(&self) -> bool {
        self.label != ProbeLabel::Good
    }
}

// ── Records ────────────────────────────────────────────────────────

/// One line of the append-only poll log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollRecord {
    /// Cycle start time, epoch seconds.
    pub timestamp: f64,
    pub code: u16,
    pub label: ProbeLabel,
}

impl PollRecord {
    pub fn new(timestamp: f64, outcome: ProbeOutcome) -> Self {
        Self {
            timestamp,
            code: outcome.code,
            label: outcome.label,
        }
    }

    pub fn outcome(&self) -> ProbeOutcome {
        ProbeOutcome {
            code: self.code,
            label: self.label,
        }
    }

    /// Whether the target counted as up for this sample.
    pub fn is_up(&self) -> bool {
        self.code == CODE_UP
    }
}

/// Current wall-clock time as fractional epoch seconds.
pub fn epoch_secs_f64() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
