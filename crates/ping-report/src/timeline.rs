//! Series extraction and smoothing.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use ping_core::PollRecord;
use ping_log::local_datetime;

/// What the y axis shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotMode {
    /// 1 when the target answered 200, else 0.
    #[default]
    Uptime,
    /// The recorded status code.
    Codes,
}

impl FromStr for PlotMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "uptime" => Ok(PlotMode::Uptime),
            "codes" => Ok(PlotMode::Codes),
            other => Err(format!("unknown plot mode {other:?} (expected uptime or codes)")),
        }
    }
}

impl fmt::Display for PlotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlotMode::Uptime => "uptime",
            PlotMode::Codes => "codes",
        })
    }
}

/// Symmetric any-down-in-window filter.
///
/// Output sample `i` covers input `i ..= i + 2 * window` and is up only if
/// every sample in that window is up. Samples without a full window on
/// both sides are dropped, so the output has `len - 2 * window` entries.
pub fn any_down_filter(up: &[bool], window: usize) -> Vec<bool> {
    let span = 2 * window + 1;
    if up.len() < span {
        return Vec::new();
    }
    up.windows(span).map(|w| w.iter().all(|&u| u)).collect()
}

/// Points ready to plot: `(epoch seconds, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub mode: PlotMode,
    pub filter_window: usize,
    pub points: Vec<(f64, f64)>,
}

impl Timeline {
    pub fn build(records: &[PollRecord], mode: PlotMode, filter_window: usize) -> Self {
        let points = match mode {
            PlotMode::Uptime => {
                let up: Vec<bool> = records.iter().map(PollRecord::is_up).collect();
                any_down_filter(&up, filter_window)
                    .into_iter()
                    .zip(records.iter().skip(filter_window))
                    .map(|(up, r)| (r.timestamp, if up { 1.0 } else { 0.0 }))
                    .collect()
            }
            // Smoothing only applies to the boolean series.
            PlotMode::Codes => records
                .iter()
                .map(|r| (r.timestamp, f64::from(r.code)))
                .collect(),
        };
        Self {
            mode,
            filter_window,
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Per-file numbers printed by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogSummary {
    pub file: String,
    /// Local date of the first record, `YYYY-MM-DD`.
    pub day: String,
    pub samples: usize,
    pub up: usize,
    pub uptime_pct: f64,
    pub first: f64,
    pub last: f64,
    /// Occurrences of each code.
    pub codes: BTreeMap<u16, usize>,
}

impl LogSummary {
    /// `None` for an empty log.
    pub fn from_records(file: impl Into<String>, records: &[PollRecord]) -> Option<Self> {
        let first = records.first()?.timestamp;
        let last = records.last()?.timestamp;
        let up = records.iter().filter(|r| r.is_up()).count();
        let mut codes = BTreeMap::new();
        for r in records {
            *codes.entry(r.code).or_insert(0) += 1;
        }
        Some(Self {
            file: file.into(),
            day: day_of(first),
            samples: records.len(),
            up,
            uptime_pct: 100.0 * up as f64 / records.len() as f64,
            first,
            last,
            codes,
        })
    }
}

/// Local calendar day containing `timestamp`.
pub fn day_of(timestamp: f64) -> String {
    local_datetime(timestamp)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
