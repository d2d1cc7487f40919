//! Console writer for normalized records.

use crate::advertisement::Advertisement;
use std::io::{self, Write};

/// Write one `key=value` line per record, preserving batch order.
pub fn write_records(out: &mut dyn Write, records: &[Advertisement]) -> io::Result<()> {
    for record in records {
        writeln!(out, "{record}")?;
    }
    Ok(())
}
