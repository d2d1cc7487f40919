//! `gateway-listener` library.
//!
//! The binary (`src/main.rs`) is responsible for CLI parsing and process exit
//! codes. The core “business logic” lives in [`crate::app`] where it can be
//! tested deterministically with an in-memory gateway session + injected
//! output streams.

pub mod address;
pub mod advertisement;
pub mod app;
pub mod filter;
pub mod gateway;
pub mod output;
pub mod prefs;
pub mod prompt;
pub mod scan;
pub mod shutdown;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types at the crate root
pub use address::{swap_byte_order, to_display_address};
pub use advertisement::{AdField, Advertisement, RawAdvertisement, extract};
pub use filter::{AdvFilter, MatchAll, MatchName};
pub use gateway::{GatewayError, GatewayEvent, GatewayReport, GatewaySession};
pub use output::csv::CsvSink;
pub use prefs::Preferences;
pub use scan::{ScanConfig, ScanMode, ScanOrchestrator, ScanSession};
pub use shutdown::ShutdownController;
