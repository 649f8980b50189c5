//! ping-probe — reachability probes for pingwatch.
//!
//! A probe is a single GET with a hard timeout. Its network result is
//! expressed as a [`ProbeResult`] and then mapped onto the fixed
//! `(code, label)` taxonomy by a pure function:
//!
//! ```text
//! Success(status) → (status, "good")
//! Disconnected    → (590, "disconnected")
//! Timeout         → (591, "timeout")
//! Other(detail)   → (599, "misc")
//! ```
//!
//! The [`BaselineGate`] runs the same probe against a reliable reference
//! URL to tell "target down" apart from "local network down".

pub mod checker;
pub mod gate;

pub use checker::{ProbeError, ProbeResult, Prober, classify_error};
pub use gate::BaselineGate;

#[cfg(any(test, feature = "test-util"))]
pub mod fixtures;
