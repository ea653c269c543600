//! # Error Types
//!
//! Failures produced while turning node replies into domain values.

use thiserror::Error;

/// Errors parsing a hash from its display string.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HashError {
    /// The string held no hex digits at all.
    #[error("hash string is empty")]
    Empty,

    /// More hex digits than a hash can hold.
    #[error("max hash string length is {max} characters, got {len}")]
    StringSizeMismatch { len: usize, max: usize },

    /// The string is not hexadecimal.
    #[error("invalid hex in hash string: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Errors decoding the binary block / transaction encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// Input ended before the field at `offset` was complete.
    #[error("unexpected end of data at offset {offset}: needed {needed} bytes, {remaining} left")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// A var-int used a longer encoding than its value requires.
    #[error("non-canonical varint: value {value} encoded with discriminant {discriminant:#04x}")]
    NonCanonicalVarInt { value: u64, discriminant: u8 },

    /// A declared element count cannot possibly fit in the remaining bytes.
    #[error("{what} count {count} exceeds the maximum of {max}")]
    CountTooLarge {
        what: &'static str,
        count: u64,
        max: u64,
    },

    /// Segregated-witness marker present but the flag byte is wrong.
    #[error("witness flag must be 0x01, got {0:#04x}")]
    InvalidWitnessFlag(u8),

    /// Serialized block exceeds the protocol limit.
    #[error("block payload of {len} bytes exceeds the maximum of {max}")]
    PayloadTooLarge { len: usize, max: usize },

    /// Bytes left over after the last transaction.
    #[error("{0} trailing bytes after block")]
    TrailingBytes(usize),
}
