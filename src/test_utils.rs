//! Shared builders for unit tests.

use crate::advertisement::{AdField, Advertisement, RawAdvertisement};

/// A raw record with fixed transport fields and the given payloads.
pub fn raw_advertisement(adv: Vec<AdField>, rsp: Vec<AdField>) -> RawAdvertisement {
    RawAdvertisement {
        timestamp_secs: 1_700_000_000.25,
        address_hex: "a6b5c4d3e2f1".to_string(),
        address_type: 0,
        event_type: 0,
        rssi: -60,
        adv,
        rsp,
    }
}

/// A normalized record with the given name and RSSI.
pub fn normalized(name: &str, rssi: i16) -> Advertisement {
    Advertisement {
        ts: "2026-08-30T12:00:00.000".to_string(),
        did: "F1:E2:D3:C4:B5:A6".to_string(),
        dt: 0,
        ev: 0,
        rssi,
        name: name.to_string(),
    }
}
