//! Loading poll logs back from disk.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use ping_core::PollRecord;

use crate::codec::{LineError, parse_line};
use crate::error::{LogError, LogResult};

/// A line that failed to parse, with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    pub line: usize,
    pub error: LineError,
}

/// Parsed contents of one log file.
#[derive(Debug, Clone)]
pub struct LogFile {
    pub path: PathBuf,
    pub records: Vec<PollRecord>,
    pub malformed: Vec<MalformedLine>,
}

impl LogFile {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// File name without the `.log` extension, e.g. `2024-03-01`.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "log".to_string())
    }
}

/// All log files directly inside `dir`, sorted by file name.
///
/// A file counts as a log if its name contains `.log` (so rotated
/// `x.log.1` files are included).
pub fn list_log_files(dir: &Path) -> LogResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| LogError::List {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && entry.file_name().to_string_lossy().contains(".log") {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// The newest log in `dir`: the greatest file name, which for daily logs
/// is the most recent day.
pub fn latest_log_file(dir: &Path) -> LogResult<Option<PathBuf>> {
    Ok(list_log_files(dir)?.pop())
}

/// Parse every line of a log file. Malformed lines are collected, not fatal.
///
/// Lines are decoded one at a time, so a file with undecodable bytes (a
/// compressed `x.log.gz`, say) loads with those lines marked malformed.
pub fn load_log(path: &Path) -> LogResult<LogFile> {
    let content = std::fs::read(path).map_err(|source| LogError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut records = Vec::new();
    let mut malformed = Vec::new();
    for (idx, raw) in content.split(|&b| b == b'\n').enumerate() {
        let parsed = std::str::from_utf8(raw)
            .map_err(|_| LineError::Encoding)
            .and_then(parse_line);
        match parsed {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(error) => {
                debug!(path = ?path, line = idx + 1, %error, "skipping malformed log line");
                malformed.push(MalformedLine {
                    line: idx + 1,
                    error,
                });
            }
        }
    }

    if !malformed.is_empty() {
        warn!(
            path = ?path,
            malformed = malformed.len(),
            records = records.len(),
            first = malformed[0].line,
            "skipped malformed log lines"
        );
    }

    Ok(LogFile {
        path: path.to_path_buf(),
        records,
        malformed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::LogWriter;
    use ping_core::{ProbeLabel, ProbeOutcome, Rotation};

    #[test]
    fn lists_only_log_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["2024-03-02.log", "2024-03-01.log", "notes.txt", "old.log.1"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.log")).unwrap();

        let files = list_log_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["2024-03-01.log", "2024-03-02.log", "old.log.1"]);
    }

    #[test]
    fn latest_is_greatest_name() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(latest_log_file(dir.path()).unwrap(), None);

        std::fs::write(dir.path().join("2024-03-01.log"), "").unwrap();
        std::fs::write(dir.path().join("2024-03-09.log"), "").unwrap();
        let latest = latest_log_file(dir.path()).unwrap().unwrap();
        assert!(latest.ends_with("2024-03-09.log"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let err = list_log_files(Path::new("/nonexistent/pingwatch-logs")).unwrap_err();
        assert!(matches!(err, LogError::List { .. }));
    }

    #[test]
    fn load_reads_back_written_records() {
        let dir = tempfile::tempdir().unwrap();
        let writer = LogWriter::new(dir.path(), Rotation::PerRun);
        let written = [
            PollRecord::new(1_700_000_000.0, ProbeOutcome::good(200)),
            PollRecord::new(1_700_000_005.0, ProbeOutcome::disconnected()),
            PollRecord::new(1_700_000_010.0, ProbeOutcome::good(404)),
        ];
        let mut path = PathBuf::new();
        for record in &written {
            path = writer.append(record).unwrap();
        }

        let log = load_log(&path).unwrap();
        assert!(log.malformed.is_empty());
        assert_eq!(log.records, written);
        assert!(log.stem().starts_with("run-"));
    }

    #[test]
    fn load_tolerates_legacy_and_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.log");
        // Older versions wrote a leading newline and no label.
        std::fs::write(&path, "\n1571234567.1, 200\n1571234572.1, 590\ngarbage\n").unwrap();

        let log = load_log(&path).unwrap();
        assert_eq!(log.records.len(), 2);
        assert_eq!(log.records[1].label, ProbeLabel::Disconnected);
        assert_eq!(log.malformed.len(), 1);
        assert_eq!(log.malformed[0].line, 4);
        assert_eq!(log.stem(), "log");
    }

    #[test]
    fn binary_file_loads_with_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("2024-02-28.log"),
            "1709078400.000000, 200, good\n",
        )
        .unwrap();
        let gz = dir.path().join("2024-02-28.log.gz");
        std::fs::write(&gz, [0x1f, 0x8b, 0x08, 0x00, 0xff, 0xfe, b'\n', 0x80, 0x81]).unwrap();

        let latest = latest_log_file(dir.path()).unwrap().unwrap();
        assert_eq!(latest, gz);

        let log = load_log(&gz).unwrap();
        assert!(log.is_empty());
        assert_eq!(log.malformed.len(), 2);
        assert!(log.malformed.iter().all(|m| m.error == LineError::Encoding));

        let log = load_log(&dir.path().join("2024-02-28.log")).unwrap();
        assert_eq!(log.records.len(), 1);
    }

    #[test]
    fn bad_bytes_only_spoil_their_own_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.log");
        let mut content = b"1709078400.0, 200, good\n".to_vec();
        content.extend_from_slice(b"17090784\xff05.0, 200, good\r\n");
        content.extend_from_slice(b"1709078410.0, 591, timeout\n");
        std::fs::write(&path, content).unwrap();

        let log = load_log(&path).unwrap();
        assert_eq!(log.records.len(), 2);
        assert_eq!(log.records[1].label, ProbeLabel::Timeout);
        assert_eq!(
            log.malformed,
            [MalformedLine {
                line: 2,
                error: LineError::Encoding
            }]
        );
    }

    #[test]
    fn empty_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.log");
        std::fs::write(&path, "").unwrap();
        assert!(load_log(&path).unwrap().is_empty());
    }
}
