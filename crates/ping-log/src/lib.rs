//! ping-log — flat, append-only poll logs.
//!
//! One directory holds one or more log files, rotated by day or by run.
//! Each line is a single record:
//!
//! ```text
//! <epoch-seconds>, <code>, <label>
//! ```
//!
//! Files are only ever opened in append mode; nothing here truncates or
//! rewrites existing content. A single writer per file is assumed.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{LineError, encode_line, parse_line};
pub use error::{LogError, LogResult};
pub use reader::{LogFile, MalformedLine, latest_log_file, list_log_files, load_log};
pub use writer::{LogWriter, daily_file_name, local_datetime};
