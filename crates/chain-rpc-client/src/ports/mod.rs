//! Ports to the transport collaborator.

pub mod outbound;

pub use outbound::{FrameSource, Transport};
