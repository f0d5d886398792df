//! Wire-format functions for the RDM6300-class reader protocol.
//!
//! This crate contains the pure, allocation-free half of the tag-ingest
//! pipeline: locating a record inside a raw scan window, validating its
//! checksum, and extracting the tag identifier. Everything here operates
//! on fixed-length byte slices and has no I/O, which is what makes the
//! decoder in `taglock-rfid` testable byte-for-byte.

pub mod record;

pub use record::{encode_record, find_sync, parse_hex_prefix, parse_record, payload_checksum, scan_window};
