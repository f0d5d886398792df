//! Record parsing and encoding for the reader wire format.
//!
//! A record is 14 bytes: STX, ten ASCII-hex payload characters (two
//! version + eight data), two ASCII-hex checksum characters, ETX. The
//! reader transmits records back-to-back while a tag is in range and
//! emits partial records on insertion/removal, so parsing starts from a
//! linear scan for the start marker inside a larger window.
//!
//! # Parse Pipeline
//!
//! ```text
//! raw window ──find_sync──> offset ──parse_record──> raw tag id
//!                                        │
//!                                        ├── marker validation
//!                                        ├── payload_checksum vs transmitted
//!                                        └── parse_hex_prefix(data field)
//! ```
//!
//! All functions are pure and never panic on malformed input; every
//! malformed condition degrades to an error the caller maps to an
//! invalid read.

use taglock_core::{Error, Result, constants::*};

/// Minimum bytes a record needs from its start marker: STX + payload +
/// checksum. The trailing ETX may be cut off at the scan-window edge.
const MIN_RECORD: usize = 1 + PAYLOAD_LEN + CHECKSUM_LEN;

/// Locate the start marker of a parseable record in a scan window.
///
/// Returns the offset of the first STX byte that leaves room for at
/// least a marker-to-checksum record, or `None` if no such byte exists.
#[must_use]
pub fn find_sync(window: &[u8]) -> Option<usize> {
    let last = window.len().checked_sub(MIN_RECORD)?;
    window[..=last].iter().position(|&b| b == START_BYTE)
}

/// Parse an ASCII-hex numeric prefix into an unsigned 32-bit value.
///
/// Accumulates hexadecimal digits from the start of `bytes` and stops
/// at the first non-hex character, mirroring standard numeric-prefix
/// parsing. The partial value on malformed input is deterministic and
/// load-bearing for compatibility; malformed records are independently
/// rejected by the checksum comparison.
#[must_use]
pub fn parse_hex_prefix(bytes: &[u8]) -> u32 {
    let mut value: u32 = 0;
    for &b in bytes {
        let digit = match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            b'A'..=b'F' => b - b'A' + 10,
            _ => break,
        };
        value = (value << 4) | u32::from(digit);
    }
    value
}

/// Compute the checksum of a record payload.
///
/// The payload is the ten ASCII-hex characters between the start marker
/// and the transmitted checksum. Each consecutive pair encodes one
/// byte; the checksum is the running XOR of those five bytes.
#[must_use]
pub fn payload_checksum(payload: &[u8]) -> u8 {
    payload
        .chunks_exact(2)
        .fold(0u8, |acc, pair| acc ^ (parse_hex_prefix(pair) as u8))
}

/// Parse and validate one record starting at `rec[0]`.
///
/// Validates the start marker, the end marker when it is present inside
/// the slice, and the checksum, then extracts the raw 32-bit tag value
/// from the data field. A raw value of zero is returned as-is; callers
/// treat it as "no tag".
///
/// # Errors
/// - `Error::TruncatedRecord` if fewer than 13 bytes are available
/// - `Error::MarkerMismatch` if the start byte is not STX, or a byte
///   exists at the end-marker position and is not ETX
/// - `Error::ChecksumMismatch` if the computed checksum differs from
///   the transmitted one
pub fn parse_record(rec: &[u8]) -> Result<u32> {
    if rec.len() < MIN_RECORD {
        return Err(Error::TruncatedRecord {
            offset: 0,
            available: rec.len(),
            needed: MIN_RECORD,
        });
    }

    if rec[0] != START_BYTE {
        return Err(Error::MarkerMismatch {
            expected: START_BYTE,
            actual: rec[0],
        });
    }

    // ETX is only checked when the window still contains it.
    if rec.len() > MIN_RECORD && rec[MIN_RECORD] != END_BYTE {
        return Err(Error::MarkerMismatch {
            expected: END_BYTE,
            actual: rec[MIN_RECORD],
        });
    }

    let payload = &rec[1..1 + PAYLOAD_LEN];
    let computed = payload_checksum(payload);
    let transmitted = parse_hex_prefix(&rec[1 + PAYLOAD_LEN..MIN_RECORD]) as u8;

    if computed != transmitted {
        return Err(Error::ChecksumMismatch {
            expected: computed,
            actual: transmitted,
        });
    }

    Ok(parse_hex_prefix(&rec[1 + VERSION_LEN..1 + PAYLOAD_LEN]))
}

/// Scan a raw window for a record and parse it.
///
/// Convenience composition of [`find_sync`] and [`parse_record`] used
/// by the decoder hot path.
///
/// # Errors
/// Returns `Error::SyncNotFound` if no start marker with room for a
/// record exists in the window, otherwise whatever [`parse_record`]
/// reports for the located record.
pub fn scan_window(window: &[u8]) -> Result<u32> {
    let offset = find_sync(window).ok_or(Error::SyncNotFound)?;
    parse_record(&window[offset..])
}

/// Encode a version byte and tag id into a complete 14-byte record.
///
/// Inverse of [`parse_record`]; used by the mock reader and tests.
#[must_use]
pub fn encode_record(version: u8, id: u32) -> [u8; RECORD_LEN] {
    fn hex(nibble: u8) -> u8 {
        match nibble {
            0..=9 => b'0' + nibble,
            _ => b'A' + nibble - 10,
        }
    }

    let mut rec = [0u8; RECORD_LEN];
    rec[0] = START_BYTE;

    let mut payload = [0u8; PAYLOAD_LEN / 2];
    payload[0] = version;
    payload[1..].copy_from_slice(&id.to_be_bytes());

    for (i, &byte) in payload.iter().enumerate() {
        rec[1 + i * 2] = hex(byte >> 4);
        rec[2 + i * 2] = hex(byte & 0x0F);
    }

    let checksum = payload.iter().fold(0u8, |acc, &b| acc ^ b);
    rec[1 + PAYLOAD_LEN] = hex(checksum >> 4);
    rec[2 + PAYLOAD_LEN] = hex(checksum & 0x0F);
    rec[RECORD_LEN - 1] = END_BYTE;

    rec
}
