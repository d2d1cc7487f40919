//! Device address formatting for gateway-delivered hex strings.
//!
//! The gateway transport delivers device addresses as raw hex strings with
//! the byte order reversed. This module swaps them back and formats them in
//! the standard colon-separated BLE display form.

/// Swap the byte order of a hex string.
///
/// Strings longer than two characters are left-padded with a `0` to an even
/// length, split into two-character octets and reversed. Strings of two
/// characters or fewer are returned unchanged, including odd-length ones.
pub fn swap_byte_order(hex: &str) -> String {
    match octets(hex) {
        Some(octets) => octets.join(""),
        None => hex.to_string(),
    }
}

/// Format a raw reversed-order device address for display.
///
/// Applies the same octet swap as [`swap_byte_order`], but joins the octets
/// with `:` and upper-cases the result: `"0102030405060708"` becomes
/// `"08:07:06:05:04:03:02:01"`. Short strings pass through unchanged.
pub fn to_display_address(hex: &str) -> String {
    match octets(hex) {
        Some(octets) => octets.join(":").to_uppercase(),
        None => hex.to_string(),
    }
}

/// Split `hex` into two-character octets in reverse order.
///
/// Odd-length input is padded with a leading zero rather than rejected.
/// Returns `None` for strings of two characters or fewer, which are passed
/// through by the callers.
fn octets(hex: &str) -> Option<Vec<String>> {
    let mut chars: Vec<char> = hex.chars().collect();
    if chars.len() <= 2 {
        return None;
    }
    if chars.len() % 2 != 0 {
        chars.insert(0, '0');
    }
    Some(chars.rchunks(2).map(|pair| pair.iter().collect()).collect())
}
