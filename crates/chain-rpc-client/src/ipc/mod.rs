//! Request/reply plumbing between the client and its transport.
//!
//! Outbound: [`Dispatcher`] serializes a [`Command`], registers it, and hands
//! the frame to the transport. Inbound: [`ResponseListener`] reads frames and
//! [`CompletionRouter`] matches them to pending handles by correlation id.

pub mod dispatcher;
pub mod listener;
pub mod requests;
pub mod responses;
pub mod router;

pub use dispatcher::Dispatcher;
pub use listener::ResponseListener;
pub use requests::{Command, Request, JSONRPC_VERSION};
pub use responses::Response;
pub use router::CompletionRouter;
