//! Fixed-interval scheduler.
//!
//! Starts a cycle every `interval` (measured start to start) until the
//! shutdown token fires. Both the probe phase and the wait between cycles
//! race the token, so shutdown does not wait out the interval.

use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::cycle::CycleController;
use crate::shutdown::ShutdownToken;

/// Scheduler lifecycle. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    Stopped,
}

/// Counters for one `run`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Cycles that ran to completion.
    pub cycles: u64,
    /// Records written.
    pub records: u64,
    /// Cycles skipped because the baseline was unreachable.
    pub skipped: u64,
    /// Cycles whose record could not be written.
    pub write_failures: u64,
}

pub struct Scheduler {
    controller: CycleController,
    interval: Duration,
    shutdown: ShutdownToken,
}

impl Scheduler {
    pub fn new(controller: CycleController, shutdown: ShutdownToken) -> Self {
        let interval = controller.config().interval();
        Self {
            controller,
            interval,
            shutdown,
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.shutdown.is_triggered() {
            SchedulerState::Stopped
        } else {
            SchedulerState::Running
        }
    }

    /// Poll until shutdown.
    pub async fn run(&self) -> RunStats {
        let mut stats = RunStats::default();
        info!(interval_secs = self.interval.as_secs_f64(), "poll loop started");

        while self.state() == SchedulerState::Running {
            let started = Instant::now();

            // A probe in flight is abandoned on shutdown; nothing has been
            // written yet at this point.
            let observed = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    debug!("shutdown during probe, cycle abandoned");
                    break;
                }
                record = self.controller.observe() => record,
            };

            // Once a write starts it runs to completion.
            match observed {
                Some(record) => match self.controller.record(&record) {
                    Ok(path) => {
                        stats.records += 1;
                        debug!(path = ?path, code = record.code, "cycle recorded");
                    }
                    Err(e) => {
                        stats.write_failures += 1;
                        error!(error = %e, "failed to write poll record, observation lost");
                    }
                },
                None => stats.skipped += 1,
            }
            stats.cycles += 1;

            if self.state() == SchedulerState::Stopped {
                break;
            }

            let remaining = self.interval.saturating_sub(started.elapsed());
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(remaining) => {}
            }
        }

        info!(
            cycles = stats.cycles,
            records = stats.records,
            skipped = stats.skipped,
            write_failures = stats.write_failures,
            "poll loop stopped"
        );
        stats
    }
}
