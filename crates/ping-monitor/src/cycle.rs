//! One poll cycle: baseline gate, target probe, log write.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use ping_core::{MonitorConfig, PollRecord, epoch_secs_f64};
use ping_log::{LogResult, LogWriter};
use ping_probe::{BaselineGate, Prober};

/// Runs single cycles against a fixed configuration.
#[derive(Debug, Clone)]
pub struct CycleController {
    config: Arc<MonitorConfig>,
    gate: BaselineGate,
    prober: Prober,
    writer: LogWriter,
}

impl CycleController {
    pub fn new(config: Arc<MonitorConfig>, prober: Prober) -> Self {
        let gate = BaselineGate::new(prober.clone(), config.baseline_url.clone());
        let writer = LogWriter::new(config.log_directory.clone(), config.rotation);
        Self {
            config,
            gate,
            prober,
            writer,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn writer(&self) -> &LogWriter {
        &self.writer
    }

    /// Gate and probe, without writing anything.
    ///
    /// Returns `None` when the baseline is unreachable. The record's
    /// timestamp is taken before the baseline check.
    pub async fn observe(&self) -> Option<PollRecord> {
        let start = epoch_secs_f64();

        if !self.gate.is_reachable().await {
            debug!("cycle skipped, baseline unreachable");
            return None;
        }

        let outcome = self
            .prober
            .probe(&self.config.target_url, self.config.target_timeout())
            .await;
        Some(PollRecord::new(start, outcome))
    }

    /// Persist a record observed by [`observe`](Self::observe).
    pub fn record(&self, record: &PollRecord) -> LogResult<PathBuf> {
        self.writer.append(record)
    }

    /// A complete cycle. A write failure loses this cycle's observation and
    /// is returned; gate and probe failures never are.
    pub async fn run_cycle(&self) -> LogResult<Option<PollRecord>> {
        match self.observe().await {
            Some(record) => {
                self.record(&record)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }
}
