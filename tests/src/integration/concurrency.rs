//! # Concurrent Requests
//!
//! Many requests in flight on one connection, answered in an order the
//! client does not control. Every caller must get the reply carrying its
//! own correlation id and nothing else.

#[cfg(test)]
mod tests {
    use crate::mock_node::{connect, hash_for_height};
    use chain_rpc_client::chain_types::Hash;
    use chain_rpc_client::ClientConfig;
    use futures::future::join_all;
    use rand::seq::SliceRandom;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    const IN_FLIGHT: usize = 50;

    #[tokio::test]
    async fn test_shuffled_replies_reach_their_callers() {
        let (client, mut node) = connect(ClientConfig::default()).unwrap();

        let mut callers = Vec::with_capacity(IN_FLIGHT);
        for height in 0..IN_FLIGHT as i64 {
            let client = Arc::clone(&client);
            callers.push(tokio::spawn(async move {
                (height, client.get_block_hash(height).await)
            }));
        }

        let mut requests = node.take_requests(IN_FLIGHT).await;
        assert_eq!(requests.len(), IN_FLIGHT);

        let ids: HashSet<u64> = requests.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), IN_FLIGHT, "correlation ids must be unique");
        assert!(requests.iter().all(|r| r.method == "getblockhash"));

        requests.shuffle(&mut rand::thread_rng());
        for request in &requests {
            let height = request.params[0].as_i64().unwrap();
            node.reply(request.id, json!(hash_for_height(height))).await;
        }

        let joined = timeout(Duration::from_secs(5), join_all(callers))
            .await
            .expect("every caller finished");
        for caller in joined {
            let (height, result) = caller.unwrap();
            let expected: Hash = hash_for_height(height).parse().unwrap();
            assert_eq!(result.unwrap(), expected);
        }

        assert_eq!(client.pending_count(), 0);
        let stats = client.stats();
        assert_eq!(stats.registered, IN_FLIGHT as u64);
        assert_eq!(stats.completed, IN_FLIGHT as u64);
        assert_eq!(stats.orphaned, 0);
    }

    #[tokio::test]
    async fn test_reverse_order_replies() {
        let (client, mut node) = connect(ClientConfig::default()).unwrap();

        let futures: Vec<_> = (0..10).map(|_| client.get_block_count_async()).collect();
        let requests = node.take_requests(futures.len()).await;

        for request in requests.iter().rev() {
            node.reply(request.id, json!(request.id * 100)).await;
        }

        for future in futures {
            let expected = future.id().as_u64() as i64 * 100;
            assert_eq!(future.await.unwrap(), expected);
        }
    }

    #[tokio::test]
    async fn test_mixed_operations_in_flight() {
        let (client, mut node) = connect(ClientConfig::default()).unwrap();

        let count = client.get_block_count_async();
        let difficulty = client.get_difficulty_async();
        let verified = client.verify_chain_async();
        let best = client.get_best_block_hash_async();

        let requests = node.take_requests(4).await;
        for request in requests.iter().rev() {
            let result = match request.method.as_str() {
                "getblockcount" => json!(812_345),
                "getdifficulty" => json!(57_321_508_229_258.04),
                "verifychain" => json!(true),
                "getbestblockhash" => json!(hash_for_height(812_345)),
                other => panic!("unexpected method {other}"),
            };
            node.reply(request.id, result).await;
        }

        assert_eq!(count.await.unwrap(), 812_345);
        assert!((difficulty.await.unwrap() - 57_321_508_229_258.04).abs() < 1e-3);
        assert!(verified.await.unwrap());
        assert_eq!(
            best.await.unwrap().to_string(),
            hash_for_height(812_345)
        );
    }
}
