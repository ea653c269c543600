//! # Command Results
//!
//! JSON shapes the node returns for the verbose chain commands.
//!
//! Fields the node always sends are required, so a reply missing them fails
//! to decode instead of silently defaulting. Fields that only appear for some
//! blocks or node versions carry `#[serde(default)]`.

use serde::{Deserialize, Serialize};

use crate::chainhash::Hash;
use crate::errors::HashError;

/// `getblock` with verbosity on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetBlockVerboseResult {
    pub hash: String,
    pub confirmations: i64,
    #[serde(rename = "strippedsize")]
    pub stripped_size: i32,
    pub size: i32,
    pub weight: i32,
    pub height: i64,
    pub version: i32,
    #[serde(rename = "versionHex")]
    pub version_hex: String,
    #[serde(rename = "merkleroot")]
    pub merkle_root: String,
    /// Transaction ids; present when transactions are not expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx: Option<Vec<String>>,
    /// Expanded transactions; present when `verbose_tx` was requested.
    #[serde(rename = "rawtx", default, skip_serializing_if = "Option::is_none")]
    pub raw_tx: Option<Vec<TxRawResult>>,
    pub time: i64,
    pub nonce: u32,
    pub bits: String,
    pub difficulty: f64,
    /// Absent for the genesis block.
    #[serde(rename = "previousblockhash", default, skip_serializing_if = "Option::is_none")]
    pub previous_hash: Option<String>,
    /// Absent for the chain tip.
    #[serde(rename = "nextblockhash", default, skip_serializing_if = "Option::is_none")]
    pub next_hash: Option<String>,
}

impl GetBlockVerboseResult {
    /// Parsed block hash.
    pub fn block_hash(&self) -> Result<Hash, HashError> {
        self.hash.parse()
    }
}

/// A transaction as expanded inside a verbose block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxRawResult {
    pub hex: String,
    pub txid: String,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub size: Option<i32>,
    #[serde(default)]
    pub vsize: Option<i32>,
    #[serde(default)]
    pub weight: Option<i32>,
    pub version: u32,
    #[serde(rename = "locktime")]
    pub lock_time: u32,
    pub vin: Vec<Vin>,
    pub vout: Vec<Vout>,
    #[serde(rename = "blockhash", default)]
    pub block_hash: Option<String>,
    #[serde(default)]
    pub confirmations: Option<u64>,
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(rename = "blocktime", default)]
    pub block_time: Option<i64>,
}

/// Transaction input in a verbose transaction.
///
/// Coinbase inputs carry `coinbase`; all others carry `txid`/`vout`/`scriptSig`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coinbase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vout: Option<u32>,
    #[serde(rename = "scriptSig", default, skip_serializing_if = "Option::is_none")]
    pub script_sig: Option<ScriptSig>,
    #[serde(rename = "txinwitness", default, skip_serializing_if = "Option::is_none")]
    pub witness: Option<Vec<String>>,
    pub sequence: u32,
}

impl Vin {
    pub fn is_coinbase(&self) -> bool {
        self.coinbase.is_some()
    }
}

/// Signature script of an input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSig {
    pub asm: String,
    pub hex: String,
}

/// Transaction output in a verbose transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vout {
    pub value: f64,
    pub n: u32,
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: ScriptPubKeyResult,
}

/// Decoded public key script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptPubKeyResult {
    pub asm: String,
    pub hex: String,
    #[serde(rename = "reqSigs", default, skip_serializing_if = "Option::is_none")]
    pub req_sigs: Option<i32>,
    #[serde(rename = "type")]
    pub script_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<String>>,
}

/// One entry of `getrawmempool` with verbosity on, keyed by txid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetRawMempoolVerboseResult {
    pub size: i32,
    #[serde(default)]
    pub vsize: i32,
    #[serde(default)]
    pub weight: i32,
    pub fee: f64,
    pub time: i64,
    pub height: i64,
    #[serde(rename = "startingpriority")]
    pub starting_priority: f64,
    #[serde(rename = "currentpriority")]
    pub current_priority: f64,
    /// Unconfirmed parents of this transaction.
    pub depends: Vec<String>,
}

/// `gettxout` for an unspent output.
///
/// Every field is required: a reply object without them is malformed, which
/// is distinct from the `null` reply meaning "spent or unknown".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetTxOutResult {
    #[serde(rename = "bestblock")]
    pub best_block: String,
    pub confirmations: i64,
    pub value: f64,
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: ScriptPubKeyResult,
    pub coinbase: bool,
}

impl GetTxOutResult {
    /// Parsed hash of the chain tip the answer was computed against.
    pub fn best_block_hash(&self) -> Result<Hash, HashError> {
        self.best_block.parse()
    }
}
