//! End-to-end scenarios against the mock node.

pub mod concurrency;
pub mod expiry;
pub mod facade;
pub mod teardown;
