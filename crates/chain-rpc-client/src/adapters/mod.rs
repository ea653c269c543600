//! Transport adapters implementing the outbound ports.

pub mod channel;

pub use channel::{channel_pair, ChannelFrameSource, ChannelTransport, NodeEndpoint};
