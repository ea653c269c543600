//! Domain types for the RPC client.
//!
//! Correlation, configuration, errors, the one-shot response handles, the
//! pending table they are registered in, and the typed result decoders.

pub mod config;
pub mod correlation;
pub mod decode;
pub mod error;
pub mod future;
pub mod pending;

// Re-exports for convenience
pub use config::{ClientConfig, ConfigError, LimitsConfig, TimeoutConfig};
pub use correlation::{CorrelationId, IdGenerator};
pub use decode::DecodeFn;
pub use error::{ClientError, ClientResult, ErrorKind, FrameError, RpcError, TransportError};
pub use future::{FillError, RawResult, ResponseCell, ResponseFuture, ResponseHandle};
pub use pending::{PendingStats, PendingTable, StatsSnapshot};
