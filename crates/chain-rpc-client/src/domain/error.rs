//! Client error types and the node's JSON-RPC error codes.

use crate::domain::correlation::CorrelationId;
use chain_types::{HashError, WireError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Error codes the node reports in the `error` member of a reply.
pub mod codes {
    // JSON-RPC standard errors
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    // General application errors
    pub const MISC_ERROR: i32 = -1;
    pub const TYPE_ERROR: i32 = -3;
    pub const INVALID_ADDRESS_OR_KEY: i32 = -5;
    pub const OUT_OF_MEMORY: i32 = -7;
    pub const INVALID_PARAMETER: i32 = -8;
    pub const DATABASE_ERROR: i32 = -20;
    pub const DESERIALIZATION_ERROR: i32 = -22;
    pub const VERIFY_ERROR: i32 = -25;

    // Node state
    pub const CLIENT_NOT_CONNECTED: i32 = -9;
    pub const CLIENT_IN_INITIAL_DOWNLOAD: i32 = -10;
    pub const IN_WARMUP: i32 = -28;
}

/// Error object reported by the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    /// Some nodes omit the message; it reads as empty.
    #[serde(default)]
    pub message: String,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for RpcError {}

/// Failures of the connection underneath the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("not connected")]
    NotConnected,

    #[error("connection lost: {0}")]
    ConnectionLost(String),

    /// The client was torn down while the request was outstanding.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    #[error("request of {size} bytes exceeds the limit of {max}")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("outbound queue full")]
    QueueFull,

    #[error("I/O error: {0}")]
    Io(String),
}

impl TransportError {
    pub fn is_connection_closed(&self) -> bool {
        matches!(self, TransportError::ConnectionClosed(_))
    }
}

/// Reasons an inbound frame was discarded before reaching a handle.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame of {size} bytes exceeds the limit of {max}")]
    Oversized { size: usize, max: usize },

    #[error("malformed response frame: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("response frame has no id")]
    MissingId,

    #[error("response id is not an unsigned integer: {0}")]
    InvalidId(String),
}

/// Coarse classification of [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request never got a reply.
    Transport,
    /// The node answered with an error object.
    Server,
    /// The reply did not have the expected shape.
    Decode,
    /// A hash string in the reply was malformed.
    Format,
    /// The caller misused the client.
    Usage,
    /// The caller stopped waiting.
    Timeout,
}

/// Error returned by every client operation.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("server error: {0}")]
    Server(#[from] RpcError),

    #[error("failed to decode result: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("malformed hash: {0}")]
    Format(#[from] HashError),

    #[error("invalid block hex: {0}")]
    BlockHex(#[source] hex::FromHexError),

    #[error("malformed block: {0}")]
    Wire(#[from] WireError),

    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// The handle's result was already taken by an earlier receive.
    #[error("response already consumed")]
    AlreadyConsumed,

    /// A request was registered under an id that is still pending.
    #[error("correlation id {0} is already pending")]
    DuplicateId(CorrelationId),

    #[error("{method} timed out after {elapsed_ms}ms")]
    Timeout { method: String, elapsed_ms: u64 },
}

impl ClientError {
    /// Timeout for `method` after `elapsed`, saturating at `u64::MAX` ms.
    pub(crate) fn timeout(method: &str, elapsed: Duration) -> Self {
        ClientError::Timeout {
            method: method.to_string(),
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Transport(_) => ErrorKind::Transport,
            ClientError::Server(_) => ErrorKind::Server,
            ClientError::Decode(_) | ClientError::BlockHex(_) | ClientError::Wire(_) => {
                ErrorKind::Decode
            }
            ClientError::Format(_) => ErrorKind::Format,
            ClientError::Encode(_) | ClientError::AlreadyConsumed | ClientError::DuplicateId(_) => {
                ErrorKind::Usage
            }
            ClientError::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    /// Node-reported error, if this is one.
    pub fn rpc_error(&self) -> Option<&RpcError> {
        match self {
            ClientError::Server(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_connection_closed(&self) -> bool {
        matches!(self, ClientError::Transport(e) if e.is_connection_closed())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
