//! Chain RPC Client - typed asynchronous access to a chain node's command API.
//!
//! Every operation follows one shape: build a [`Command`], dispatch it without
//! waiting, and get back a handle that later resolves into a typed result or a
//! [`ClientError`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              CLIENT                                     │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────────────────────────────────┐                       │
//! │  │       Operation Facade (chain.rs)            │                       │
//! │  │   get_block_async() → ResponseFuture<Block>  │                       │
//! │  └───────────────────┬──────────────────────────┘                       │
//! │                      │ Command                                          │
//! │  ┌───────────────────┴──────────┐     ┌──────────────────────────────┐  │
//! │  │         Dispatcher           │     │      Completion Router       │  │
//! │  │  id → register → send        │     │  frame → id → fill handle    │  │
//! │  └───────┬───────────┬──────────┘     └──────┬───────────────┬───────┘  │
//! │          │           │                       │               │          │
//! │          │     ┌─────┴───────────────────────┴─────┐         │          │
//! │          │     │          Pending Table            │         │          │
//! │          │     │  CorrelationId → ResponseCell     │         │          │
//! │          │     └───────────────────────────────────┘         │          │
//! └──────────┼───────────────────────────────────────────────────┼──────────┘
//!            ▼                                                   │
//!        Transport ──────────────► node ──────────────► FrameSource
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use chain_rpc_client::{adapters::channel_pair, Client, ClientConfig};
//! use std::sync::Arc;
//!
//! let (transport, source, node) = channel_pair(64);
//! let client = Client::connect(ClientConfig::default(), Arc::new(transport), Box::new(source))?;
//!
//! let tip = client.get_best_block_hash_async();
//! let height = client.get_block_count_async();
//! println!("{} at {}", tip.await?, height.await?);
//! ```
//!
//! # Guarantees
//!
//! - Each handle resolves exactly once: with the reply, a node error, a
//!   transport failure, an expiry, or teardown.
//! - Replies are matched by id only; arrival order does not matter.
//! - On shutdown every outstanding handle resolves with a connection error.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod chain;
pub mod client;
pub mod domain;
pub mod ipc;
pub mod ports;

// Re-exports for public API
pub use chain_types;
pub use client::Client;
pub use domain::config::{ClientConfig, ConfigError, LimitsConfig, TimeoutConfig};
pub use domain::correlation::CorrelationId;
pub use domain::decode;
pub use domain::error::{
    codes, ClientError, ClientResult, ErrorKind, FrameError, RpcError, TransportError,
};
pub use domain::future::{ResponseFuture, ResponseHandle};
pub use domain::pending::StatsSnapshot;
pub use ipc::{Command, CompletionRouter};
pub use ports::{FrameSource, Transport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
