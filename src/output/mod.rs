//! Output sinks for normalized advertisement records.
//!
//! Records go to the console always and to a CSV file when the user asked
//! for one. Both writers preserve the delivery order of the batch.

pub mod console;
pub mod csv;
