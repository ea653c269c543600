//! # Chain Hash
//!
//! 32-byte double-SHA-256 digest used for block and transaction identifiers.
//!
//! Nodes display hashes byte-reversed: the last byte of the digest is the
//! first pair of hex digits. `Display` and `FromStr` both use that order, so
//! `hash.to_string().parse::<Hash>()` is the identity.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::errors::HashError;

/// Size of a hash in bytes.
pub const HASH_SIZE: usize = 32;

/// Maximum length of a hash display string.
pub const MAX_HASH_STRING_SIZE: usize = HASH_SIZE * 2;

/// A 32-byte chain hash stored in internal (little-endian) byte order.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    /// The all-zero hash (previous-block hash of the genesis block).
    pub const ZERO: Hash = Hash([0u8; HASH_SIZE]);

    /// Wrap raw bytes already in internal order.
    pub const fn from_bytes(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw bytes in internal order.
    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// SHA-256 applied twice.
    pub fn double_sha256(data: &[u8]) -> Self {
        let first = Sha256::digest(data);
        let second = Sha256::digest(first);
        let mut bytes = [0u8; HASH_SIZE];
        bytes.copy_from_slice(&second);
        Self(bytes)
    }

    /// Whether every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; HASH_SIZE]
    }
}

impl FromStr for Hash {
    type Err = HashError;

    /// Parse a display string of up to 64 hex digits.
    ///
    /// Shorter strings are treated as having leading zeros, which is also how
    /// an odd number of digits is handled.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(HashError::Empty);
        }
        if s.len() > MAX_HASH_STRING_SIZE {
            return Err(HashError::StringSizeMismatch {
                len: s.len(),
                max: MAX_HASH_STRING_SIZE,
            });
        }

        let padded = format!("{:0>width$}", s, width = MAX_HASH_STRING_SIZE);
        let mut bytes = [0u8; HASH_SIZE];
        hex::decode_to_slice(padded, &mut bytes)?;
        bytes.reverse();
        Ok(Self(bytes))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        f.write_str(&hex::encode(reversed))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self)
    }
}

impl From<[u8; HASH_SIZE]> for Hash {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Hash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
