//! In-process channel transport.
//!
//! Connects a client to a node living in the same process, typically a test
//! double. Frames the client sends show up on [`NodeEndpoint::recv_request`];
//! frames the endpoint sends come back through [`ChannelFrameSource`].

use crate::domain::error::TransportError;
use crate::ports::outbound::{FrameSource, Transport};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Outbound half handed to the client.
pub struct ChannelTransport {
    requests: mpsc::Sender<Vec<u8>>,
}

impl Transport for ChannelTransport {
    fn send(&self, frame: Vec<u8>) -> Result<(), TransportError> {
        self.requests.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => TransportError::QueueFull,
            TrySendError::Closed(_) => TransportError::ConnectionLost("channel closed".into()),
        })
    }
}

/// Inbound half handed to the client's listener.
pub struct ChannelFrameSource {
    replies: mpsc::Receiver<Vec<u8>>,
}

#[async_trait]
impl FrameSource for ChannelFrameSource {
    async fn next_frame(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        Ok(self.replies.recv().await)
    }
}

/// The node's side of the channel pair.
///
/// Dropping the endpoint (or its reply senders) closes the connection from
/// the client's point of view.
pub struct NodeEndpoint {
    requests: mpsc::Receiver<Vec<u8>>,
    replies: mpsc::Sender<Vec<u8>>,
}

impl NodeEndpoint {
    /// Next request frame, or `None` once the client side is gone.
    pub async fn recv_request(&mut self) -> Option<Vec<u8>> {
        self.requests.recv().await
    }

    pub async fn send_reply(&self, frame: Vec<u8>) -> Result<(), TransportError> {
        self.replies
            .send(frame)
            .await
            .map_err(|_| TransportError::ConnectionLost("channel closed".into()))
    }

    /// Another handle for pushing reply frames.
    pub fn reply_sender(&self) -> mpsc::Sender<Vec<u8>> {
        self.replies.clone()
    }

    /// Split into the raw channel ends.
    pub fn into_parts(self) -> (mpsc::Receiver<Vec<u8>>, mpsc::Sender<Vec<u8>>) {
        (self.requests, self.replies)
    }
}

/// Create a connected transport, frame source, and node endpoint.
///
/// `capacity` bounds each direction; a full request queue makes
/// [`Transport::send`] fail with [`TransportError::QueueFull`].
pub fn channel_pair(capacity: usize) -> (ChannelTransport, ChannelFrameSource, NodeEndpoint) {
    let (req_tx, req_rx) = mpsc::channel(capacity);
    let (resp_tx, resp_rx) = mpsc::channel(capacity);
    (
        ChannelTransport { requests: req_tx },
        ChannelFrameSource { replies: resp_rx },
        NodeEndpoint {
            requests: req_rx,
            replies: resp_tx,
        },
    )
}
