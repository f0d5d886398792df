use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Frame errors
    #[error("No start marker in scan window")]
    SyncNotFound,

    #[error("Record truncated at offset {offset}: {available} of {needed} bytes")]
    TruncatedRecord {
        offset: usize,
        available: usize,
        needed: usize,
    },

    #[error("Marker mismatch: expected {expected:#04X}, got {actual:#04X}")]
    MarkerMismatch { expected: u8, actual: u8 },

    #[error("Checksum mismatch: expected {expected:02X}, got {actual:02X}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    // Tag errors
    #[error("Tag value 0 is reserved")]
    ReservedTag,

    #[error("Invalid tag value: {0}")]
    InvalidTag(String),
}

pub type Result<T> = std::result::Result<T, Error>;
