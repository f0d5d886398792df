//! Property-based tests for record encoding and parsing.
//!
//! These tests use proptest to generate random payloads and window
//! placements and verify that the wire-format invariants hold for all
//! of them.

use proptest::prelude::*;
use taglock_core::constants::{RECORD_LEN, SCAN_WINDOW, START_BYTE};
use taglock_protocol::{encode_record, parse_record, scan_window};

/// Strategy for window filler bytes that cannot be mistaken for a
/// start marker.
fn garbage_byte() -> impl Strategy<Value = u8> {
    any::<u8>().prop_filter("must not be STX", |b| *b != START_BYTE)
}

proptest! {
    /// Property: encoding any (version, id) payload and parsing it back
    /// recovers the id with no checksum error.
    #[test]
    fn prop_record_roundtrip(version in any::<u8>(), id in any::<u32>()) {
        let rec = encode_record(version, id);
        prop_assert_eq!(parse_record(&rec).unwrap(), id);
    }

    /// Property: a record is found and parsed at any alignment inside
    /// the scan window, surrounded by non-marker garbage.
    #[test]
    fn prop_scan_window_any_alignment(
        version in any::<u8>(),
        id in any::<u32>(),
        offset in 0usize..=(SCAN_WINDOW - RECORD_LEN),
        filler in garbage_byte(),
    ) {
        let mut window = [0u8; SCAN_WINDOW];
        window.fill(filler);
        window[offset..offset + RECORD_LEN].copy_from_slice(&encode_record(version, id));

        prop_assert_eq!(scan_window(&window).unwrap(), id);
    }

    /// Property: replacing any single payload character with a
    /// different hex digit changes the encoded byte pair, so the
    /// checksum comparison must reject the record.
    #[test]
    fn prop_corrupted_payload_rejected(
        version in any::<u8>(),
        id in any::<u32>(),
        pos in 1usize..11,
        digit in 0u8..16,
    ) {
        const HEX: &[u8; 16] = b"0123456789ABCDEF";

        let mut rec = encode_record(version, id);
        let replacement = HEX[digit as usize];
        prop_assume!(rec[pos] != replacement);
        rec[pos] = replacement;

        prop_assert!(parse_record(&rec).is_err());
    }
}
