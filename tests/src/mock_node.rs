//! Scriptable chain node for tests.
//!
//! Sits on the [`NodeEndpoint`] side of a channel pair. Tests either pull
//! requests one at a time and answer them by hand, or hand the node a
//! handler and let it serve in the background.

use chain_rpc_client::adapters::{channel_pair, NodeEndpoint};
use chain_rpc_client::{Client, ClientConfig, ConfigError};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A request as the node saw it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReceivedRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Vec<Value>,
    pub id: u64,
}

/// How a served request is answered.
#[derive(Debug, Clone)]
pub enum Reply {
    Result(Value),
    Error { code: i32, message: String },
    /// Swallow the request.
    Silent,
}

pub struct MockNode {
    endpoint: NodeEndpoint,
}

impl MockNode {
    pub fn new(endpoint: NodeEndpoint) -> Self {
        Self { endpoint }
    }

    /// Next request, or `None` once the client side is gone.
    pub async fn next_request(&mut self) -> Option<ReceivedRequest> {
        let frame = self.endpoint.recv_request().await?;
        serde_json::from_slice(&frame).ok()
    }

    /// Collect exactly `n` requests.
    pub async fn take_requests(&mut self, n: usize) -> Vec<ReceivedRequest> {
        let mut requests = Vec::with_capacity(n);
        while requests.len() < n {
            match self.next_request().await {
                Some(request) => requests.push(request),
                None => break,
            }
        }
        requests
    }

    pub async fn reply(&self, id: u64, result: Value) {
        self.send_value(json!({"result": result, "error": null, "id": id}))
            .await;
    }

    pub async fn reply_error(&self, id: u64, code: i32, message: &str) {
        self.send_value(json!({
            "result": null,
            "error": {"code": code, "message": message},
            "id": id
        }))
        .await;
    }

    /// Push arbitrary bytes as a reply frame.
    pub async fn send_raw(&self, frame: Vec<u8>) {
        // The client may already be gone; tests assert on its side.
        let _ = self.endpoint.send_reply(frame).await;
    }

    async fn send_value(&self, value: Value) {
        self.send_raw(value.to_string().into_bytes()).await;
    }

    /// Answer every request with `handler` until the client disconnects.
    pub fn serve<F>(mut self, handler: F) -> JoinHandle<()>
    where
        F: Fn(&ReceivedRequest) -> Reply + Send + 'static,
    {
        tokio::spawn(async move {
            while let Some(request) = self.next_request().await {
                match handler(&request) {
                    Reply::Result(result) => self.reply(request.id, result).await,
                    Reply::Error { code, message } => {
                        self.reply_error(request.id, code, &message).await
                    }
                    Reply::Silent => {}
                }
            }
        })
    }
}

/// Client connected to a fresh mock node, listener running.
pub fn connect(config: ClientConfig) -> Result<(Arc<Client>, MockNode), ConfigError> {
    let (transport, source, endpoint) = channel_pair(1024);
    let client = Client::connect(config, Arc::new(transport), Box::new(source))?;
    Ok((Arc::new(client), MockNode::new(endpoint)))
}

/// Hash string for a block height, unique per height.
pub fn hash_for_height(height: i64) -> String {
    format!("{:064x}", height)
}

/// Poll `condition` until it holds or `limit` passes. Returns whether it held.
pub async fn wait_for<F>(limit: std::time::Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + limit;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    condition()
}
