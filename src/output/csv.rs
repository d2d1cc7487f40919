//! Appending CSV sink with a once-per-lifetime header row.

use crate::advertisement::Advertisement;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Column order for the header and every value row.
pub const HEADER: &str = "ts,did,dt,ev,rssi,name";

/// A pre-existing file at or below this size is treated as new and still
/// gets a header row.
const HEADER_SIZE_THRESHOLD: u64 = 10;

/// CSV sink for normalized advertisement records.
///
/// The header row is written at most once per sink lifetime, and skipped
/// entirely when appending to a pre-existing non-empty file. Values are
/// comma-joined without quoting, so a device name containing a comma
/// corrupts its row; the format is append-only logging, not strict CSV.
pub struct CsvSink {
    writer: Box<dyn Write + Send>,
    write_header: bool,
}

impl CsvSink {
    /// Open `path` for appending, creating the file if needed.
    pub fn append(path: &Path) -> io::Result<Self> {
        let write_header = match fs::metadata(path) {
            Ok(meta) => meta.len() <= HEADER_SIZE_THRESHOLD,
            Err(_) => true,
        };
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::from_writer(Box::new(file), write_header))
    }

    /// Build a sink over an arbitrary writer.
    pub fn from_writer(writer: Box<dyn Write + Send>, write_header: bool) -> Self {
        Self {
            writer,
            write_header,
        }
    }

    /// Whether the next non-empty write will emit the header row.
    pub fn pending_header(&self) -> bool {
        self.write_header
    }

    /// Append one batch of records in delivery order.
    ///
    /// The header is emitted just before the first record ever written, then
    /// never again for this sink.
    pub fn write_records(&mut self, records: &[Advertisement]) -> io::Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        if self.write_header {
            writeln!(self.writer, "{HEADER}")?;
            self.write_header = false;
        }
        for r in records {
            writeln!(
                self.writer,
                "{},{},{},{},{},{}",
                r.ts, r.did, r.dt, r.ev, r.rssi, r.name
            )?;
        }
        Ok(())
    }

    /// Flush buffered rows to the underlying file.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
