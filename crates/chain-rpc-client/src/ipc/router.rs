//! Completion Router: delivers replies to the handles waiting for them.

use crate::domain::correlation::CorrelationId;
use crate::domain::error::{ClientError, RpcError};
use crate::domain::pending::PendingTable;
use crate::ipc::responses::Response;
use serde_json::value::RawValue;
use std::sync::Arc;
use tracing::{info, warn};

/// Entry point for inbound traffic.
///
/// Cheap to clone; transports that push frames themselves can keep a copy.
#[derive(Clone)]
pub struct CompletionRouter {
    pending: Arc<PendingTable>,
    max_frame_size: usize,
}

impl CompletionRouter {
    pub fn new(pending: Arc<PendingTable>, max_frame_size: usize) -> Self {
        Self {
            pending,
            max_frame_size,
        }
    }

    /// Parse one reply frame and deliver it.
    ///
    /// Frames that cannot be attributed to a request are logged and dropped.
    /// A frame with a usable id but an undecodable `error` member resolves
    /// that request with [`ClientError::Decode`]. Returns whether a pending
    /// handle was filled.
    pub fn on_frame(&self, frame: &[u8]) -> bool {
        let response = match Response::parse(frame, self.max_frame_size) {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, size = frame.len(), "Discarding reply frame");
                return false;
            }
        };

        let id = match response.correlation_id() {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "Discarding reply frame");
                return false;
            }
        };

        match response.into_result() {
            Ok(reply) => self.on_reply(id, reply),
            Err(e) => self.pending.reject(id, ClientError::Decode(e)),
        }
    }

    /// Deliver an already-parsed reply.
    pub fn on_reply(&self, id: CorrelationId, reply: Result<Box<RawValue>, RpcError>) -> bool {
        self.pending.complete(id, reply)
    }

    /// Connection is gone: resolve everything still pending.
    ///
    /// Returns the number of handles resolved.
    pub fn on_shutdown(&self, reason: &str) -> usize {
        let resolved = self.pending.close(reason);
        info!(reason = reason, resolved = resolved, "Connection closed");
        resolved
    }
}
