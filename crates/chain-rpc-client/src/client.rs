//! The client: owns the pending table and wires the dispatcher, the router,
//! and the background tasks around it.

use crate::domain::config::{ClientConfig, ConfigError};
use crate::domain::decode::DecodeFn;
use crate::domain::future::{ResponseFuture, ResponseHandle};
use crate::domain::pending::{sweep_task, PendingTable, StatsSnapshot};
use crate::ipc::dispatcher::Dispatcher;
use crate::ipc::listener::ResponseListener;
use crate::ipc::requests::Command;
use crate::ipc::router::CompletionRouter;
use crate::ports::outbound::{FrameSource, Transport};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Asynchronous chain node client.
///
/// Every operation dispatches without waiting and hands back a handle; the
/// typed operations live in [`crate::chain`].
pub struct Client {
    config: ClientConfig,
    pending: Arc<PendingTable>,
    dispatcher: Dispatcher,
    router: CompletionRouter,
    /// Listener and sweeper tasks, aborted on shutdown
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Client {
    /// Create a client over `transport` without starting any task.
    ///
    /// Replies must be fed through [`Client::router`] or a listener started
    /// with [`Client::spawn_listener`].
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self, ConfigError> {
        config.validate()?;

        let pending = Arc::new(PendingTable::new());
        let dispatcher = Dispatcher::new(
            Arc::clone(&pending),
            transport,
            config.limits.max_request_size,
        );
        let router = CompletionRouter::new(Arc::clone(&pending), config.limits.max_frame_size);

        info!(
            client = %config.name,
            expire_requests = config.timeouts.expire_requests,
            "Client created"
        );

        Ok(Self {
            config,
            pending,
            dispatcher,
            router,
            tasks: Mutex::new(Vec::new()),
        })
    }

    /// Create a client and start its listener (and sweeper, if configured).
    ///
    /// Must be called inside a Tokio runtime.
    pub fn connect(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        source: Box<dyn FrameSource>,
    ) -> Result<Self, ConfigError> {
        let client = Self::new(config, transport)?;
        client.spawn_listener(source);
        client.spawn_sweeper();
        Ok(client)
    }

    /// Send a command and return its raw handle immediately.
    pub fn dispatch(&self, command: &Command) -> ResponseHandle {
        self.dispatcher.dispatch(command)
    }

    /// Send a command and attach the decoder for its result.
    pub fn send_cmd<T>(&self, command: &Command, decode: DecodeFn<T>) -> ResponseFuture<T> {
        self.dispatch(command).decode_with(decode)
    }

    /// Router for transports that deliver frames themselves.
    pub fn router(&self) -> CompletionRouter {
        self.router.clone()
    }

    /// Start a task reading replies from `source`.
    pub fn spawn_listener(&self, source: Box<dyn FrameSource>) {
        let listener = ResponseListener::new(self.router(), source);
        let task = tokio::spawn(listener.run());
        self.tasks.lock().push(task);
        debug!(client = %self.config.name, "Started response listener");
    }

    /// Start the expiry sweep if `timeouts.expire_requests` is set.
    ///
    /// Returns whether a sweeper was started.
    pub fn spawn_sweeper(&self) -> bool {
        let timeouts = &self.config.timeouts;
        if !timeouts.expire_requests {
            return false;
        }
        let task = tokio::spawn(sweep_task(
            Arc::clone(&self.pending),
            timeouts.request,
            timeouts.sweep_interval,
        ));
        self.tasks.lock().push(task);
        debug!(
            client = %self.config.name,
            ttl_ms = timeouts.request.as_millis(),
            "Started expiry sweep"
        );
        true
    }

    /// Tear the client down.
    ///
    /// Every pending handle resolves with a connection-closed error and later
    /// dispatches fail the same way. Returns the number of handles resolved.
    pub fn shutdown(&self) -> usize {
        let resolved = self.router.on_shutdown("client shutdown");
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
        info!(client = %self.config.name, resolved = resolved, "Client shut down");
        resolved
    }

    pub fn is_shutdown(&self) -> bool {
        self.pending.is_closed()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.pending_count()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.pending.stats().snapshot()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        if !self.pending.is_closed() {
            self.pending.close("client dropped");
        }
        for task in self.tasks.get_mut().drain(..) {
            task.abort();
        }
    }
}
