//! Retention predicates for normalized advertisement records.
//!
//! Every record in a report batch is run through one predicate before it is
//! printed or written. The default retains everything; alternate predicates
//! can narrow the stream to a device of interest.

use crate::advertisement::Advertisement;

/// Predicate deciding whether a normalized record is retained.
pub trait AdvFilter: Send + Sync {
    fn retain(&self, record: &Advertisement) -> bool;
}

/// Retains every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct MatchAll;

impl AdvFilter for MatchAll {
    fn retain(&self, _record: &Advertisement) -> bool {
        true
    }
}

/// Retains records whose device name matches exactly.
///
/// Useful for following a single known device, e.g.
/// `MatchName::new("CC2650 SensorTag")`.
#[derive(Debug, Clone)]
pub struct MatchName {
    name: String,
}

impl MatchName {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl AdvFilter for MatchName {
    fn retain(&self, record: &Advertisement) -> bool {
        record.name == self.name
    }
}
