//! # Request Expiry
//!
//! Two ways a caller stops waiting: a bounded receive, which leaves the
//! request pending, and the background sweep, which removes it.

#[cfg(test)]
mod tests {
    use crate::mock_node::{connect, Reply};
    use chain_rpc_client::{ClientConfig, ClientError, ErrorKind};
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::timeout;

    fn expiring_config(ttl: Duration) -> ClientConfig {
        let mut config = ClientConfig::default();
        config.timeouts.expire_requests = true;
        config.timeouts.request = ttl;
        config.timeouts.sweep_interval = Duration::from_millis(20);
        config
    }

    #[tokio::test]
    async fn test_sweeper_times_out_silent_request() {
        let (client, node) = connect(expiring_config(Duration::from_millis(100))).unwrap();
        let _server = node.serve(|_| Reply::Silent);

        let result = timeout(Duration::from_secs(2), client.get_block_count())
            .await
            .expect("sweeper resolved the request");
        match result {
            Err(ClientError::Timeout { method, elapsed_ms }) => {
                assert_eq!(method, "getblockcount");
                assert!(elapsed_ms >= 100);
            }
            other => panic!("expected timeout, got {:?}", other),
        }

        assert_eq!(client.pending_count(), 0);
        assert_eq!(client.stats().expired, 1);
        assert!(!client.is_shutdown());
    }

    #[tokio::test]
    async fn test_answered_requests_are_not_expired() {
        let (client, node) = connect(expiring_config(Duration::from_millis(500))).unwrap();
        let _server = node.serve(|_| Reply::Result(json!(42)));

        for _ in 0..5 {
            assert_eq!(client.get_block_count().await.unwrap(), 42);
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(client.stats().expired, 0);
    }

    #[tokio::test]
    async fn test_bounded_receive_leaves_request_pending() {
        let (client, mut node) = connect(ClientConfig::default()).unwrap();

        let future = client.get_block_count_async();
        let request = node.take_requests(1).await.remove(0);

        let err = future
            .receive_timeout(Duration::from_millis(20))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(client.pending_count(), 1);

        node.reply(request.id, json!(3)).await;
        assert_eq!(future.receive().await.unwrap(), 3);
        assert_eq!(client.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_receive_twice_reports_consumed() {
        let (client, mut node) = connect(ClientConfig::default()).unwrap();

        let future = client.get_block_count_async();
        let request = node.take_requests(1).await.remove(0);
        node.reply(request.id, json!(8)).await;

        assert_eq!(future.receive().await.unwrap(), 8);
        assert!(matches!(
            future.receive().await,
            Err(ClientError::AlreadyConsumed)
        ));
    }
}
