//! # Teardown
//!
//! Shutdown and peer disconnect must resolve every outstanding handle with a
//! connection-closed error, promptly and exactly once. Nothing dispatched
//! afterwards may reach the wire.

#[cfg(test)]
mod tests {
    use crate::mock_node::{connect, wait_for};
    use chain_rpc_client::{ClientConfig, ClientError, TransportError};
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::timeout;

    fn assert_closed(result: Result<i64, ClientError>, expected_reason: &str) {
        match result {
            Err(ClientError::Transport(TransportError::ConnectionClosed(reason))) => {
                assert_eq!(reason, expected_reason)
            }
            other => panic!("expected connection closed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_shutdown_resolves_every_pending_request() {
        let (client, mut node) = connect(ClientConfig::default()).unwrap();

        let futures: Vec<_> = (0..20).map(|_| client.get_block_count_async()).collect();
        assert_eq!(node.take_requests(20).await.len(), 20);
        assert_eq!(client.pending_count(), 20);

        assert_eq!(client.shutdown(), 20);
        assert!(client.is_shutdown());

        for future in futures {
            let result = timeout(Duration::from_secs(1), future)
                .await
                .expect("resolved after shutdown");
            assert_closed(result, "client shutdown");
        }

        assert_eq!(client.pending_count(), 0);
        assert_eq!(client.stats().closed, 20);
    }

    #[tokio::test]
    async fn test_peer_disconnect_resolves_pending() {
        let (client, mut node) = connect(ClientConfig::default()).unwrap();

        let futures: Vec<_> = (0..5).map(|_| client.get_block_count_async()).collect();
        assert_eq!(node.take_requests(5).await.len(), 5);

        drop(node);

        for future in futures {
            let result = timeout(Duration::from_secs(1), future)
                .await
                .expect("resolved after disconnect");
            assert_closed(result, "connection closed by peer");
        }
        assert!(client.is_shutdown());
    }

    #[tokio::test]
    async fn test_dispatch_after_shutdown_fails_immediately() {
        let (client, mut node) = connect(ClientConfig::default()).unwrap();
        client.shutdown();

        let future = client.get_block_count_async();
        assert!(future.is_resolved());
        assert_closed(future.await, "client shutdown");

        // Nothing reached the node.
        assert!(timeout(Duration::from_millis(50), node.next_request())
            .await
            .is_err());
        assert_eq!(client.stats().registered, 0);
    }

    #[tokio::test]
    async fn test_first_close_reason_wins() {
        let (client, node) = connect(ClientConfig::default()).unwrap();
        drop(node);
        assert!(wait_for(Duration::from_secs(1), || client.is_shutdown()).await);

        assert_eq!(client.shutdown(), 0);
        assert_closed(
            client.get_block_count().await,
            "connection closed by peer",
        );
    }

    #[tokio::test]
    async fn test_late_reply_after_shutdown_is_orphaned() {
        let (client, mut node) = connect(ClientConfig::default()).unwrap();

        let future = client.get_block_count_async();
        let request = node.take_requests(1).await.remove(0);
        client.shutdown();

        // The listener is gone; feed the straggler through the router.
        let late = json!({"result": 5, "error": null, "id": request.id}).to_string();
        assert!(!client.router().on_frame(late.as_bytes()));

        assert_closed(future.await, "client shutdown");
        assert_eq!(client.stats().orphaned, 1);
        assert_eq!(client.stats().completed, 0);
    }
}
