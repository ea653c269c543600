//! Outbound ports: what the client needs from the connection underneath it.

use crate::domain::error::TransportError;
use async_trait::async_trait;

/// Outbound half of a connection.
///
/// `send` enqueues one complete request frame and must not block on the
/// network. A synchronous error means the frame was not queued.
pub trait Transport: Send + Sync {
    fn send(&self, frame: Vec<u8>) -> Result<(), TransportError>;
}

/// Inbound half of a connection, polled by the response listener.
#[async_trait]
pub trait FrameSource: Send {
    /// Next complete reply frame.
    ///
    /// `Ok(None)` and `Err(_)` both mean the connection is permanently closed.
    async fn next_frame(&mut self) -> Result<Option<Vec<u8>>, TransportError>;
}
