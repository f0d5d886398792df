//! Core constants for the tag-ingest pipeline.
//!
//! This module defines the wire-format geometry of the RDM6300-class
//! reader protocol, the sizing of the whitelist store, and the fixed
//! channel names used for remote management and outbound reporting.
//!
//! # Record Format
//!
//! The reader transmits each tag read as a fixed 14-byte ASCII record:
//!
//! ```text
//! <STX> V V D D D D D D D D C C <ETX>
//! 0x02  version  8 hex data   checksum  0x03
//! ```
//!
//! Where:
//! - `<STX>` - Start of text marker (0x02)
//! - `V V` - 2 ASCII-hex version characters
//! - `D..D` - 8 ASCII-hex data characters encoding the 32-bit tag id
//! - `C C` - 2 ASCII-hex checksum characters (XOR of the five payload bytes)
//! - `<ETX>` - End of text marker (0x03)
//!
//! Because the reader re-transmits continuously while a tag is in range
//! and emits partial records on insertion/removal, decoding reads a
//! [`SCAN_WINDOW`]-byte window and scans it for the start marker rather
//! than trusting record alignment.

// ============================================================================
// Record Framing
// ============================================================================

/// Start of text marker (STX).
///
/// ASCII control character marking the beginning of a reader record.
///
/// # Record Position
///
/// ```text
/// <STX>VVDDDDDDDDCC<ETX>
/// ^^^^^
/// Start marker
/// ```
pub const START_BYTE: u8 = 0x02; // STX

/// End of text marker (ETX).
///
/// ASCII control character terminating a reader record. Only present in
/// full records; a record truncated at the scan-window edge may lose it.
pub const END_BYTE: u8 = 0x03; // ETX

/// Length of the version field in ASCII-hex characters.
pub const VERSION_LEN: usize = 2;

/// Length of the data field in ASCII-hex characters.
///
/// Eight hex characters encode the unsigned 32-bit tag identifier.
pub const DATA_LEN: usize = 8;

/// Length of the checksum field in ASCII-hex characters.
pub const CHECKSUM_LEN: usize = 2;

/// Length of the checksummed payload (version + data) in characters.
///
/// The transmitted checksum is the XOR of the five bytes these ten
/// characters encode pairwise.
pub const PAYLOAD_LEN: usize = VERSION_LEN + DATA_LEN;

/// Total length of one reader record in bytes, markers included.
pub const RECORD_LEN: usize = 1 + PAYLOAD_LEN + CHECKSUM_LEN + 1;

/// Size of the raw scan window read from the byte source.
///
/// Large enough to contain at least one complete record at any
/// alignment the continuously-transmitting reader produces.
pub const SCAN_WINDOW: usize = 64;

// ============================================================================
// Whitelist Sizing
// ============================================================================

/// Maximum number of authorized tags the whitelist holds.
pub const MAX_TAGS: usize = 128;

/// Size in bytes of one persisted tag slot (little-endian u32).
pub const TAG_SLOT_BYTES: usize = 4;

/// Exact size in bytes of the persisted whitelist blob.
///
/// The whitelist is persisted as a flat array of [`MAX_TAGS`]
/// little-endian u32 slots, zero meaning empty. This layout has no
/// schema version; changing it breaks devices in the field.
pub const WHITELIST_BLOB_LEN: usize = MAX_TAGS * TAG_SLOT_BYTES;

/// Key under which the whitelist blob is persisted in durable storage.
pub const WHITELIST_BLOB_KEY: &str = "tags";

// ============================================================================
// Timing
// ============================================================================

/// Default debounce idle window in milliseconds.
///
/// Two accepted decodes of the same continuous tag presence must be at
/// least this far apart; the reader re-transmits roughly every 100 ms
/// while a tag is held against it. Also used as the re-scan delay after
/// a manual button-triggered open.
pub const DEFAULT_IDLE_WINDOW_MS: u64 = 2000;

/// Duration of the door actuation pulse in milliseconds.
pub const DOOR_PULSE_MS: u64 = 100;

/// Serial baud rate of the reader link.
pub const READER_BAUD_RATE: u32 = 9600;

// ============================================================================
// Channel Names
// ============================================================================

/// Inbound topic carrying tag toggle commands (ASCII decimal payload).
pub const TOPIC_TOGGLE_TAG: &str = "/taglock/add_tag";

/// Outbound topic reporting an authorized tag read.
pub const TOPIC_AUTHORIZED: &str = "/taglock/authorized";

/// Outbound topic reporting a denied tag read.
pub const TOPIC_DENIED: &str = "/taglock/denied";

/// Outbound topic reporting a manual button-triggered open.
pub const TOPIC_BUTTON: &str = "/taglock/button";

/// Literal payload published on [`TOPIC_BUTTON`] events.
pub const BUTTON_PAYLOAD: &str = "button";
