//! Append-only log writer.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use tracing::debug;

use ping_core::{PollRecord, Rotation, epoch_secs_f64};

use crate::codec::encode_line;
use crate::error::{LogError, LogResult};

/// Appends poll records to files in one directory.
#[derive(Debug, Clone)]
pub struct LogWriter {
    directory: PathBuf,
    rotation: Rotation,
    /// Fixes the file name under `Rotation::PerRun`.
    run_started: f64,
}

impl LogWriter {
    pub fn new(directory: impl Into<PathBuf>, rotation: Rotation) -> Self {
        Self {
            directory: directory.into(),
            rotation,
            run_started: epoch_secs_f64(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Create the log directory (and parents) if missing.
    pub fn ensure_directory(&self) -> LogResult<()> {
        std::fs::create_dir_all(&self.directory).map_err(|source| LogError::CreateDir {
            path: self.directory.clone(),
            source,
        })
    }

    /// File the given record belongs in.
    pub fn path_for(&self, record: &PollRecord) -> PathBuf {
        let name = match self.rotation {
            Rotation::Daily => daily_file_name(record.timestamp),
            Rotation::PerRun => format!("run-{}.log", self.run_started as u64),
        };
        self.directory.join(name)
    }

    /// Append one line for `record`. Returns the file written to.
    ///
    /// The file handle is scoped to this call and dropped on every path.
    pub fn append(&self, record: &PollRecord) -> LogResult<PathBuf> {
        let path = self.path_for(record);
        let line = encode_line(record);

        let write = || -> std::io::Result<()> {
            let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
            file.write_all(line.as_bytes())?;
            file.flush()
        };
        write().map_err(|source| LogError::Write {
            path: path.clone(),
            source,
        })?;

        debug!(path = ?path, code = record.code, label = %record.label, "record appended");
        Ok(path)
    }
}

/// `YYYY-MM-DD.log` for the local calendar day containing `timestamp`.
pub fn daily_file_name(timestamp: f64) -> String {
    match local_datetime(timestamp) {
        Some(dt) => format!("{}.log", dt.format("%Y-%m-%d")),
        None => "unknown-date.log".to_string(),
    }
}

/// Local time for fractional epoch seconds.
pub fn local_datetime(timestamp: f64) -> Option<DateTime<Local>> {
    if !timestamp.is_finite() {
        return None;
    }
    let secs = timestamp.floor();
    let nanos = ((timestamp - secs) * 1e9) as u32;
    Local.timestamp_opt(secs as i64, nanos.min(999_999_999)).single()
}
