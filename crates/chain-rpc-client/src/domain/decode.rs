//! Typed result decoders.
//!
//! Each operation pairs its request with one of these functions. They are
//! pure: raw reply payload in, typed value or [`ClientError`] out.

use crate::domain::error::ClientError;
use chain_types::{Block, GetTxOutResult, Hash};
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;

/// Decoder from a raw reply payload to an operation's result type.
pub type DecodeFn<T> = fn(&RawValue) -> Result<T, ClientError>;

/// Decode the payload as any JSON-deserializable type.
pub fn json<T: DeserializeOwned>(raw: &RawValue) -> Result<T, ClientError> {
    serde_json::from_str(raw.get()).map_err(ClientError::Decode)
}

/// A JSON string holding a hash in display order.
pub fn hash(raw: &RawValue) -> Result<Hash, ClientError> {
    let s: String = json(raw)?;
    Ok(s.parse()?)
}

/// A JSON array of hash strings.
///
/// The first malformed element fails the whole list.
pub fn hash_list(raw: &RawValue) -> Result<Vec<Hash>, ClientError> {
    let strings: Vec<String> = json(raw)?;
    strings
        .iter()
        .map(|s| s.parse::<Hash>().map_err(ClientError::from))
        .collect()
}

/// A JSON string holding the hex of a serialized block.
pub fn block(raw: &RawValue) -> Result<Block, ClientError> {
    let s: String = json(raw)?;
    let bytes = hex::decode(s).map_err(ClientError::BlockHex)?;
    Ok(Block::deserialize(&bytes)?)
}

/// `gettxout` reply: `null` means the output is spent or unknown.
pub fn tx_out(raw: &RawValue) -> Result<Option<GetTxOutResult>, ClientError> {
    if raw.get().trim() == "null" {
        return Ok(None);
    }
    json(raw).map(Some)
}
