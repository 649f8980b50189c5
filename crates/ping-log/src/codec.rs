//! Text encoding of a single poll record.

use thiserror::Error;

use ping_core::{PollRecord, ProbeLabel, UnknownLabel};

/// Why a log line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("expected 2 or 3 comma-separated fields, found {0}")]
    FieldCount(usize),

    #[error("invalid timestamp {0:?}")]
    Timestamp(String),

    #[error("invalid status code {0:?}")]
    Code(String),

    #[error(transparent)]
    Label(#[from] UnknownLabel),

    #[error("line is not valid UTF-8")]
    Encoding,
}

/// Encode a record as one newline-terminated line.
pub fn encode_line(record: &PollRecord) -> String {
    format!("{:.6}, {}, {}\n", record.timestamp, record.code, record.label)
}

/// Parse one line. Blank lines yield `Ok(None)`.
///
/// Accepts the label-less two-field form written by older versions, in
/// which case the label is derived from the code.
pub fn parse_line(line: &str) -> Result<Option<PollRecord>, LineError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let (ts, code, label) = match fields.as_slice() {
        [ts, code] => (*ts, *code, None),
        [ts, code, label] => (*ts, *code, Some(*label)),
        other => return Err(LineError::FieldCount(other.len())),
    };

    let timestamp: f64 = ts
        .parse()
        .ok()
        .filter(|t: &f64| t.is_finite())
        .ok_or_else(|| LineError::Timestamp(ts.to_string()))?;
    let code: u16 = code
        .parse()
        .map_err(|_| LineError::Code(code.to_string()))?;
    let label = match label {
        Some(label) => label.parse::<ProbeLabel>()?,
        None => ProbeLabel::for_code(code),
    };

    Ok(Some(PollRecord {
        timestamp,
        code,
        label,
    }))
}
