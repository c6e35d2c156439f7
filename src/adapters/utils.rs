//! Shared helpers for adapter-layer input filtering.

/// Returns `true` for bytes in the printable ASCII range `0x20..=0x7E`
/// (space through tilde, inclusive).
///
/// Used by the BLE command channel to filter characteristic writes
/// before token matching.
pub(super) fn is_printable_ascii(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte)
}
