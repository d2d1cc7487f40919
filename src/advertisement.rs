//! Advertisement records and the extraction pipeline.
//!
//! Raw records arrive from the gateway with transport-level encodings (epoch
//! timestamps, reversed-order hex addresses, typed AD structure lists).
//! [`extract`] normalizes one raw record into the form printed to the console
//! and written to the CSV file.

use crate::address::to_display_address;
use chrono::{Local, TimeZone};
use std::fmt;

/// AD type code for a shortened local name.
const AD_TYPE_NAME_SHORT: u8 = 8;
/// AD type code for a complete local name.
const AD_TYPE_NAME_COMPLETE: u8 = 9;

/// One typed AD structure within an advertisement or scan-response payload.
#[derive(Debug, Clone, PartialEq)]
pub struct AdField {
    /// AD type code.
    pub t: u8,
    /// Decoded value.
    pub v: String,
}

impl AdField {
    pub fn new(t: u8, v: impl Into<String>) -> Self {
        Self { t, v: v.into() }
    }
}

/// A raw advertisement record as delivered by the gateway transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAdvertisement {
    /// Unix epoch seconds with microsecond fraction.
    pub timestamp_secs: f64,
    /// Device address hex in reversed byte order, as delivered.
    pub address_hex: String,
    /// Device address type.
    pub address_type: u8,
    /// Advertisement packet category.
    pub event_type: u8,
    /// Signal strength in dBm.
    pub rssi: i16,
    /// AD structures from the advertisement payload, in wire order.
    pub adv: Vec<AdField>,
    /// AD structures from the scan-response payload, in wire order.
    pub rsp: Vec<AdField>,
}

/// A normalized advertisement record, derived once per raw record.
///
/// Records live for a single print/write cycle; nothing accumulates or
/// deduplicates them.
#[derive(Debug, Clone, PartialEq)]
pub struct Advertisement {
    /// ISO-8601 local time with millisecond precision, no UTC suffix.
    pub ts: String,
    /// Colon-separated uppercase display address.
    pub did: String,
    /// Device address type, passed through.
    pub dt: u8,
    /// Advertisement packet category, passed through.
    pub ev: u8,
    /// Signal strength in dBm, passed through.
    pub rssi: i16,
    /// Device name from the first name-type AD structure, or empty.
    pub name: String,
}

impl fmt::Display for Advertisement {
    /// One stable-order `key=value` console line per record.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ts={} did={} dt={} ev={} rssi={} name={}",
            self.ts, self.did, self.dt, self.ev, self.rssi, self.name
        )
    }
}

/// Normalize one raw advertisement record.
pub fn extract(raw: &RawAdvertisement) -> Advertisement {
    Advertisement {
        ts: local_iso_millis(raw.timestamp_secs),
        did: to_display_address(&raw.address_hex),
        dt: raw.address_type,
        ev: raw.event_type,
        rssi: raw.rssi,
        name: device_name(&raw.adv, &raw.rsp),
    }
}

/// Best-effort device name lookup.
///
/// Scans the advertisement payload first, then the scan response, for the
/// first AD structure typed 8 (shortened local name) or 9 (complete local
/// name). The advertisement-before-response order decides which name wins
/// when both payloads carry one. Returns an empty string when neither does.
fn device_name(adv: &[AdField], rsp: &[AdField]) -> String {
    adv.iter()
        .chain(rsp.iter())
        .find(|field| field.t == AD_TYPE_NAME_SHORT || field.t == AD_TYPE_NAME_COMPLETE)
        .map(|field| field.v.clone())
        .unwrap_or_default()
}

/// Format epoch seconds as local wall-clock time truncated to milliseconds,
/// e.g. `2026-08-30T14:05:09.123`. No trailing `Z`: the value is local time.
fn local_iso_millis(epoch_secs: f64) -> String {
    let secs = epoch_secs.trunc() as i64;
    let nanos = (epoch_secs.fract() * 1e9) as u32;
    Local
        .timestamp_opt(secs, nanos)
        .single()
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%.3f").to_string())
        .unwrap_or_default()
}
