//! # Chain Types Crate
//!
//! Domain values the RPC client decodes node replies into.
//!
//! ## Contents
//!
//! - **Hash** (`chainhash`): 32-byte identifier with byte-reversed hex display.
//! - **Wire** (`wire`): decoder for the node's binary block encoding.
//! - **Results** (`results`): JSON records of the verbose chain commands.
//!
//! Nothing in this crate performs I/O; every function is a pure transform
//! from bytes or JSON into a typed value.

pub mod chainhash;
pub mod errors;
pub mod results;
pub mod wire;

pub use chainhash::{Hash, HASH_SIZE, MAX_HASH_STRING_SIZE};
pub use errors::{HashError, WireError};
pub use results::*;
pub use wire::{Block, BlockHeader, OutPoint, Transaction, TxIn, TxOut, MAX_BLOCK_PAYLOAD};
