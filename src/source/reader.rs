//! File reader that turns the telemetry file into a [`Snapshot`].

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::parser::parse_line;
use super::SnapshotReader;
use crate::error::FeedError;
use crate::model::{ReadingKind, ReadingValue, Snapshot, TextAccumulator};

/// Reads the telemetry file written by the sensor daemon.
///
/// The file is opened read-only with sharing that lets the daemon keep
/// writing while we read. A missing or unset path is not an error, and
/// neither is a path naming a directory: each reads as an empty snapshot
/// ("nothing to show yet").
#[derive(Debug)]
pub struct TelemetryReader {
    path: PathBuf,
    description: String,
    accumulator: TextAccumulator,
}

impl TelemetryReader {
    /// Create a reader for the given path. The path may be empty.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            accumulator: TextAccumulator::new(),
        }
    }

    /// The running text transcript shared by this reader's text readings.
    pub fn transcript(&self) -> &str {
        self.accumulator.text()
    }

    fn path_is_unset(&self) -> bool {
        self.path.as_os_str().to_string_lossy().trim().is_empty()
    }

    fn open(&self) -> Result<File, FeedError> {
        let mut options = OpenOptions::new();
        options.read(true);
        #[cfg(windows)]
        {
            use std::os::windows::fs::OpenOptionsExt;
            // FILE_SHARE_READ | FILE_SHARE_WRITE
            options.share_mode(0x1 | 0x2);
        }
        options.open(&self.path).map_err(|e| FeedError::from_io(&self.path, e))
    }
}

impl SnapshotReader for TelemetryReader {
    fn read(&mut self) -> Result<Snapshot, FeedError> {
        debug!("Reading telemetry from {}", self.path.display());

        if self.path_is_unset() || !self.path.is_file() {
            warn!(
                "Telemetry path is empty, missing, or not a regular file: {}",
                self.path.display()
            );
            return Ok(Snapshot::new());
        }

        let mut reader = BufReader::new(self.open()?);
        let mut snapshot = Snapshot::new();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| FeedError::from_io(&self.path, e))?;
            if n == 0 {
                break;
            }

            // The daemon may be mid-write; never fail on a torn UTF-8 sequence.
            let line = String::from_utf8_lossy(&buf);
            let Some(mut reading) = parse_line(&line) else {
                continue;
            };

            if let ReadingValue::Text(token) = reading.value() {
                let transcript = self.accumulator.append(token).to_string();
                reading.set_value(ReadingValue::Text(transcript));
            }
            snapshot.push(reading);
        }

        // Every text reading shows the whole transcript, including tokens
        // appended by lines further down this same file.
        let transcript = self.accumulator.text();
        for reading in snapshot.iter_mut().filter(|r| r.kind() == ReadingKind::String) {
            reading.set_value(ReadingValue::Text(transcript.to_string()));
        }

        debug!(
            "Read completed for {}, items: {}",
            self.path.display(),
            snapshot.len()
        );
        Ok(snapshot)
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_reads_lines_in_order() {
        let file = write_file("cpu_temp 54.5\nfan1 1200\nthrottled false\n");
        let mut reader = TelemetryReader::new(file.path());

        let snapshot = reader.read().unwrap();
        let names: Vec<&str> = snapshot.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["cpu_temp", "fan1", "throttled"]);
        assert_eq!(snapshot[0].kind(), ReadingKind::Float);
        assert_eq!(snapshot[1].kind(), ReadingKind::Int);
        assert_eq!(snapshot[2].kind(), ReadingKind::Bool);
    }

    #[test]
    fn test_skips_blank_lines_and_handles_crlf() {
        let file = write_file("\r\ncpu_load 12\r\n   \r\n\r\ngpu_load 7\r\n");
        let mut reader = TelemetryReader::new(file.path());

        let snapshot = reader.read().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[1].value(), &ReadingValue::Int(7));
    }

    #[test]
    fn test_last_line_without_newline() {
        let file = write_file("a 1\nb 2");
        let mut reader = TelemetryReader::new(file.path());
        assert_eq!(reader.read().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_file_is_empty_snapshot() {
        let mut reader = TelemetryReader::new("/nonexistent/path/sensors.txt");
        let snapshot = reader.read().unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_empty_path_is_empty_snapshot() {
        let mut reader = TelemetryReader::new("");
        assert!(reader.read().unwrap().is_empty());

        let mut reader = TelemetryReader::new("   ");
        assert!(reader.read().unwrap().is_empty());
    }

    #[test]
    fn test_directory_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let mut reader = TelemetryReader::new(dir.path());

        assert_eq!(reader.read().unwrap(), Snapshot::new());
        assert_eq!(reader.transcript(), "");
    }

    #[test]
    fn test_text_readings_share_transcript() {
        let file = write_file("status foo\nfan1 900\nmode bar\n");
        let mut reader = TelemetryReader::new(file.path());

        let snapshot = reader.read().unwrap();
        assert_eq!(snapshot[0].value(), &ReadingValue::Text("foo bar".into()));
        assert_eq!(snapshot[1].value(), &ReadingValue::Int(900));
        assert_eq!(snapshot[2].value(), &ReadingValue::Text("foo bar".into()));
        assert_eq!(reader.transcript(), "foo bar");
    }

    #[test]
    fn test_transcript_carries_across_reads() {
        let file = write_file("status foo\n");
        let mut reader = TelemetryReader::new(file.path());

        reader.read().unwrap();
        let snapshot = reader.read().unwrap();
        assert_eq!(snapshot[0].value(), &ReadingValue::Text("foo foo".into()));
    }

    #[test]
    fn test_transcript_is_per_reader() {
        let file = write_file("status foo\n");

        let mut first = TelemetryReader::new(file.path());
        first.read().unwrap();
        first.read().unwrap();

        let mut second = TelemetryReader::new(file.path());
        let snapshot = second.read().unwrap();
        assert_eq!(snapshot[0].value(), &ReadingValue::Text("foo".into()));
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"label caf\xC3\nfan 3\n").unwrap();
        file.flush().unwrap();

        let mut reader = TelemetryReader::new(file.path());
        let snapshot = reader.read().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].kind(), ReadingKind::String);
        assert_eq!(snapshot[1].value(), &ReadingValue::Int(3));
    }

    #[test]
    fn test_description() {
        let reader = TelemetryReader::new("/tmp/sensors.txt");
        assert_eq!(reader.description(), "file: /tmp/sensors.txt");
    }
}
