//! ping-monitor — the pingwatch poll loop.
//!
//! # Architecture
//!
//! ```text
//! Scheduler (Running → Stopped)
//!   ├── CycleController::observe()
//!   │   ├── BaselineGate::is_reachable()   (1s timeout)
//!   │   └── Prober::probe(target)          (min(1s, interval) timeout)
//!   ├── LogWriter::append(record)          (never interrupted)
//!   └── sleep(interval - elapsed) | ShutdownToken::cancelled()
//! ```
//!
//! Each tick is independent: no retries, no backoff. A cycle whose
//! baseline check fails produces no record. No single cycle's failure
//! stops the loop; only the shutdown token does.

pub mod cycle;
pub mod scheduler;
pub mod shutdown;

pub use cycle::CycleController;
pub use scheduler::{RunStats, Scheduler, SchedulerState};
pub use shutdown::{ShutdownToken, spawn_signal_listener};
