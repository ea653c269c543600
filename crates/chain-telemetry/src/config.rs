//! Logging configuration from environment variables.

use std::env;

/// Configuration for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to the startup event
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error, or a full directive)
    pub log_level: String,

    /// Whether to write logs to stdout at all
    pub console_output: bool,

    /// Whether to write JSON lines instead of human-readable output
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "chain-rpc".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CHAIN_RPC_SERVICE_NAME`: Service name (default: chain-rpc)
    /// - `CHAIN_RPC_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `CHAIN_RPC_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `CHAIN_RPC_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("CHAIN_RPC_SERVICE_NAME")
                .unwrap_or_else(|_| "chain-rpc".to_string()),

            log_level: env::var("CHAIN_RPC_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("CHAIN_RPC_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: env::var("CHAIN_RPC_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),
        }
    }

    /// Same configuration with a different service name.
    pub fn for_service(name: &str) -> Self {
        Self {
            service_name: name.to_string(),
            ..Self::from_env()
        }
    }
}
