//! Request registry: the commands the client can send and their wire frames.

use crate::domain::correlation::CorrelationId;
use crate::domain::error::ClientError;
use chain_types::Hash;
use serde::Serialize;
use serde_json::Value;

/// Protocol version written into every request.
pub const JSONRPC_VERSION: &str = "1.0";

/// Chain commands understood by the node.
///
/// `Option` parameters are optional positional arguments; see
/// [`Command::params`] for how they are emitted.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ═══════════════════════════════════════════════════════════════════════
    // BLOCKS
    // ═══════════════════════════════════════════════════════════════════════
    GetBestBlockHash,
    GetBlock {
        hash: Hash,
        verbose: Option<bool>,
        verbose_tx: Option<bool>,
    },
    GetBlockCount,
    GetBlockHash {
        height: i64,
    },
    GetDifficulty,

    // ═══════════════════════════════════════════════════════════════════════
    // MEMPOOL
    // ═══════════════════════════════════════════════════════════════════════
    GetRawMempool {
        verbose: Option<bool>,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // VERIFICATION & UTXO
    // ═══════════════════════════════════════════════════════════════════════
    VerifyChain {
        check_level: Option<i32>,
        check_depth: Option<i32>,
    },
    GetTxOut {
        txid: Hash,
        index: u32,
        include_mempool: Option<bool>,
    },
}

impl Command {
    /// Method name on the wire.
    pub fn method(&self) -> &'static str {
        match self {
            Command::GetBestBlockHash => "getbestblockhash",
            Command::GetBlock { .. } => "getblock",
            Command::GetBlockCount => "getblockcount",
            Command::GetBlockHash { .. } => "getblockhash",
            Command::GetDifficulty => "getdifficulty",
            Command::GetRawMempool { .. } => "getrawmempool",
            Command::VerifyChain { .. } => "verifychain",
            Command::GetTxOut { .. } => "gettxout",
        }
    }

    /// Ordered positional parameters.
    ///
    /// Optional parameters are emitted up to the last one that is set; an
    /// unset optional before a set one becomes `null`.
    pub fn params(&self) -> Vec<Value> {
        match self {
            Command::GetBestBlockHash | Command::GetBlockCount | Command::GetDifficulty => {
                Vec::new()
            }
            Command::GetBlock {
                hash,
                verbose,
                verbose_tx,
            } => with_optional(
                vec![Value::String(hash.to_string())],
                [verbose.map(Value::Bool), verbose_tx.map(Value::Bool)],
            ),
            Command::GetBlockHash { height } => vec![Value::from(*height)],
            Command::GetRawMempool { verbose } => {
                with_optional(Vec::new(), [verbose.map(Value::Bool)])
            }
            Command::VerifyChain {
                check_level,
                check_depth,
            } => with_optional(
                Vec::new(),
                [check_level.map(Value::from), check_depth.map(Value::from)],
            ),
            Command::GetTxOut {
                txid,
                index,
                include_mempool,
            } => with_optional(
                vec![Value::String(txid.to_string()), Value::from(*index)],
                [include_mempool.map(Value::Bool)],
            ),
        }
    }
}

fn with_optional<const N: usize>(mut params: Vec<Value>, optional: [Option<Value>; N]) -> Vec<Value> {
    let set = optional
        .iter()
        .rposition(Option::is_some)
        .map_or(0, |last| last + 1);
    params.extend(
        optional
            .into_iter()
            .take(set)
            .map(|v| v.unwrap_or(Value::Null)),
    );
    params
}

/// Request frame as sent to the node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: Vec<Value>,
    pub id: CorrelationId,
}

impl Request {
    pub fn new(id: CorrelationId, command: &Command) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method: command.method(),
            params: command.params(),
            id,
        }
    }

    /// Serialized frame bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ClientError> {
        serde_json::to_vec(self).map_err(ClientError::Encode)
    }
}
