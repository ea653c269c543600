//! Client configuration with validation.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Name attached to the client's log events
    pub name: String,
    /// Request expiry configuration
    pub timeouts: TimeoutConfig,
    /// Frame size limits
    pub limits: LimitsConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            name: "chain-rpc".to_string(),
            timeouts: TimeoutConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("name cannot be empty".into()));
        }

        if self.limits.max_request_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_request_size cannot be 0".into(),
            ));
        }

        if self.limits.max_frame_size == 0 {
            return Err(ConfigError::InvalidLimit("max_frame_size cannot be 0".into()));
        }

        if self.timeouts.expire_requests {
            if self.timeouts.request.is_zero() {
                return Err(ConfigError::InvalidTimeout(
                    "request timeout cannot be 0 when expiry is enabled".into(),
                ));
            }
            if self.timeouts.sweep_interval.is_zero() {
                return Err(ConfigError::InvalidTimeout(
                    "sweep_interval cannot be 0 when expiry is enabled".into(),
                ));
            }
        }

        Ok(())
    }

    /// Build configuration from `CHAIN_RPC_*` environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CHAIN_RPC_NAME`: Log name (default: chain-rpc)
    /// - `CHAIN_RPC_EXPIRE_REQUESTS`: Expire unanswered requests (default: false)
    /// - `CHAIN_RPC_REQUEST_TIMEOUT`: Age at which requests expire, e.g. `30s` (default: 30s)
    /// - `CHAIN_RPC_SWEEP_INTERVAL`: How often expiry runs, e.g. `500ms` (default: 1s)
    /// - `CHAIN_RPC_MAX_REQUEST_SIZE`: Outbound frame limit in bytes (default: 1MB)
    /// - `CHAIN_RPC_MAX_FRAME_SIZE`: Inbound frame limit in bytes (default: 16MB)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = lookup("CHAIN_RPC_NAME") {
            config.name = name;
        }
        if let Some(v) = lookup("CHAIN_RPC_EXPIRE_REQUESTS") {
            config.timeouts.expire_requests = parse_bool("CHAIN_RPC_EXPIRE_REQUESTS", &v)?;
        }
        if let Some(v) = lookup("CHAIN_RPC_REQUEST_TIMEOUT") {
            config.timeouts.request = parse_env_duration("CHAIN_RPC_REQUEST_TIMEOUT", &v)?;
        }
        if let Some(v) = lookup("CHAIN_RPC_SWEEP_INTERVAL") {
            config.timeouts.sweep_interval = parse_env_duration("CHAIN_RPC_SWEEP_INTERVAL", &v)?;
        }
        if let Some(v) = lookup("CHAIN_RPC_MAX_REQUEST_SIZE") {
            config.limits.max_request_size = parse_size("CHAIN_RPC_MAX_REQUEST_SIZE", &v)?;
        }
        if let Some(v) = lookup("CHAIN_RPC_MAX_FRAME_SIZE") {
            config.limits.max_frame_size = parse_size("CHAIN_RPC_MAX_FRAME_SIZE", &v)?;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Request expiry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Resolve requests older than `request` with a timeout error
    pub expire_requests: bool,
    /// Age after which an unanswered request expires
    #[serde(with = "humantime_serde")]
    pub request: Duration,
    /// Interval of the expiry sweep
    #[serde(with = "humantime_serde")]
    pub sweep_interval: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            expire_requests: false,
            request: Duration::from_secs(30),
            sweep_interval: Duration::from_secs(1),
        }
    }
}

/// Frame size limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Max serialized request size in bytes (default: 1MB)
    pub max_request_size: usize,
    /// Max inbound reply frame size in bytes (default: 16MB)
    pub max_frame_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_size: 1024 * 1024,     // 1MB
            max_frame_size: 16 * 1024 * 1024, // 16MB, a full block in hex plus envelope
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Invalid size limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// Environment variable could not be parsed
    #[error("invalid value for {var}: {reason}")]
    InvalidEnv { var: &'static str, reason: String },
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnv {
            var,
            reason: format!("expected a boolean, got {:?}", other),
        }),
    }
}

fn parse_env_duration(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime_serde::parse_duration(value).map_err(|reason| ConfigError::InvalidEnv {
        var,
        reason: reason.to_string(),
    })
}

fn parse_size(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|e| ConfigError::InvalidEnv {
            var,
            reason: e.to_string(),
        })
}

/// Duration serialization as `"30s"`, `"500ms"`, `"250us"`, `"10ns"` or `"2m"`
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // coarsest unit that keeps the value exact
        let nanos = duration.subsec_nanos();
        let text = if nanos == 0 {
            format!("{}s", duration.as_secs())
        } else if nanos % 1_000_000 == 0 {
            format!("{}ms", duration.as_millis())
        } else if nanos % 1_000 == 0 {
            format!("{}us", duration.as_micros())
        } else {
            format!("{}ns", duration.as_nanos())
        };
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub(super) fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        // two-letter suffixes must be checked before 's' and 'm'
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| "invalid milliseconds")
        } else if let Some(us) = s.strip_suffix("us") {
            us.trim()
                .parse::<u64>()
                .map(Duration::from_micros)
                .map_err(|_| "invalid microseconds")
        } else if let Some(ns) = s.strip_suffix("ns") {
            let ns = ns.trim().parse::<u128>().map_err(|_| "invalid nanoseconds")?;
            let secs = u64::try_from(ns / 1_000_000_000).map_err(|_| "nanoseconds out of range")?;
            Ok(Duration::new(secs, (ns % 1_000_000_000) as u32))
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid seconds")
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.trim()
                .parse::<u64>()
                .map_err(|_| "invalid minutes")?
                .checked_mul(60)
                .map(Duration::from_secs)
                .ok_or("minutes out of range")
        } else {
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid duration format")
        }
    }
}
