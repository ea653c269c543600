//! # Chain Telemetry
//!
//! Structured logging bootstrap for applications embedding the RPC client.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chain_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CHAIN_RPC_SERVICE_NAME` | `chain-rpc` | Service name in the startup event |
//! | `CHAIN_RPC_LOG_LEVEL` | `info` | Log level filter (`RUST_LOG` wins if set) |
//! | `CHAIN_RPC_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `CHAIN_RPC_JSON_LOGS` | `false` | JSON lines instead of pretty output |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(String),
}
