//! Dispatcher: turns a command into a frame on the transport and a handle
//! for the caller, without waiting for the reply.

use crate::domain::correlation::IdGenerator;
use crate::domain::error::TransportError;
use crate::domain::future::ResponseHandle;
use crate::domain::pending::PendingTable;
use crate::ipc::requests::{Command, Request};
use crate::ports::outbound::Transport;
use std::sync::Arc;
use tracing::{debug, error, warn};

pub struct Dispatcher {
    /// Pending table shared with the completion router
    pending: Arc<PendingTable>,
    /// Outbound half of the connection
    transport: Arc<dyn Transport>,
    ids: IdGenerator,
    max_request_size: usize,
}

impl Dispatcher {
    pub fn new(
        pending: Arc<PendingTable>,
        transport: Arc<dyn Transport>,
        max_request_size: usize,
    ) -> Self {
        Self {
            pending,
            transport,
            ids: IdGenerator::new(),
            max_request_size,
        }
    }

    /// Send `command` and return its handle immediately.
    ///
    /// Failures before the frame reaches the transport resolve the returned
    /// handle with the error instead of being returned here.
    pub fn dispatch(&self, command: &Command) -> ResponseHandle {
        let id = self.ids.next_id();
        let method = command.method();

        let frame = match Request::new(id, command).to_bytes() {
            Ok(frame) => frame,
            Err(e) => {
                error!(correlation_id = %id, method = method, error = %e, "Failed to encode request");
                return ResponseHandle::resolved(id, method, Err(e));
            }
        };

        if frame.len() > self.max_request_size {
            warn!(
                correlation_id = %id,
                method = method,
                size = frame.len(),
                max = self.max_request_size,
                "Request exceeds size limit"
            );
            let err = TransportError::PayloadTooLarge {
                size: frame.len(),
                max: self.max_request_size,
            };
            return ResponseHandle::resolved(id, method, Err(err.into()));
        }

        // Registered before sending so a fast reply finds its entry
        let cell = match self.pending.register(id, method) {
            Ok(cell) => cell,
            Err(e) => {
                debug!(correlation_id = %id, method = method, error = %e, "Registration refused");
                return ResponseHandle::resolved(id, method, Err(e));
            }
        };

        let size = frame.len();
        match self.transport.send(frame) {
            Ok(()) => {
                debug!(correlation_id = %id, method = method, size = size, "Sent request");
            }
            Err(e) => {
                error!(correlation_id = %id, method = method, error = %e, "Transport send failed");
                self.pending.abort(id, e);
            }
        }

        ResponseHandle::new(id, method, cell)
    }

    pub fn pending(&self) -> &Arc<PendingTable> {
        &self.pending
    }
}
