use crate::{Result, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// RFID tag identifier (unsigned 32-bit, non-zero).
///
/// Zero is reserved as the "no tag / empty slot" sentinel throughout
/// the system, so a `TagId` can never hold it: the decoder maps a
/// parsed zero to an invalid read, and a whitelist search can never
/// match an empty slot.
///
/// # Security
/// Equality is constant-time to prevent timing attacks when comparing
/// tag identifiers during authorization.
#[derive(Debug, Clone, Copy, Eq, Serialize, Deserialize)]
pub struct TagId(u32);

impl TagId {
    /// Create a new tag identifier with validation.
    ///
    /// # Errors
    /// Returns `Error::ReservedTag` if `raw` is zero.
    pub fn new(raw: u32) -> Result<Self> {
        if raw == 0 {
            return Err(Error::ReservedTag);
        }
        Ok(TagId(raw))
    }

    /// Get the raw identifier as u32.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Serialize into the persisted slot layout (little-endian).
    #[must_use]
    pub const fn to_le_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Constant-time comparison against a raw whitelist slot value.
    ///
    /// Never matches an empty slot: a `TagId` cannot hold zero.
    #[must_use]
    pub fn matches_slot(self, slot: u32) -> bool {
        self.0.ct_eq(&slot).into()
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TagId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let raw: u32 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidTag(s.to_string()))?;
        TagId::new(raw)
    }
}

/// Constant-time comparison implementation for TagId
///
/// This prevents timing attacks by ensuring comparison takes the same
/// time regardless of which bits differ.
impl PartialEq for TagId {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

/// Hash implementation for TagId
///
/// Implements standard hashing for use in hash-based collections.
impl std::hash::Hash for TagId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
