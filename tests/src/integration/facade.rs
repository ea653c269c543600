//! # Typed Operations
//!
//! Each chain operation against a node that answers the way a real one
//! does, including the edge cases of the decode rules: short hashes,
//! malformed hashes, serialized blocks, and the `null` unspent output.

#[cfg(test)]
mod tests {
    use crate::mock_node::{connect, hash_for_height, Reply};
    use chain_rpc_client::chain_types::Hash;
    use chain_rpc_client::{ClientConfig, ClientError, ErrorKind};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    const GENESIS_BLOCK_HEX: &str = "0100000000000000000000000000000000000000000000000000000000000000000000003ba3edfd7a7b12b27ac72c3e67768f617fc81bc3888a51323a9fb8aa4b1e5e4a29ab5f49ffff001d1dac2b7c0101000000010000000000000000000000000000000000000000000000000000000000000000ffffffff4d04ffff001d0104455468652054696d65732030332f4a616e2f32303039204368616e63656c6c6f72206f6e206272696e6b206f66207365636f6e64206261696c6f757420666f722062616e6b73ffffffff0100f2052a01000000434104678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5fac00000000";
    const GENESIS_HASH: &str = "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f";
    const GENESIS_MERKLE_ROOT: &str =
        "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";

    fn genesis_hash() -> Hash {
        GENESIS_HASH.parse().unwrap()
    }

    /// Node answering every method with a fixed value, recording params.
    fn node_with(
        result: Value,
    ) -> (Arc<chain_rpc_client::Client>, Arc<Mutex<Vec<(String, Vec<Value>)>>>) {
        let (client, node) = connect(ClientConfig::default()).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        node.serve(move |request| {
            log.lock()
                .unwrap()
                .push((request.method.clone(), request.params.clone()));
            Reply::Result(result.clone())
        });
        (client, seen)
    }

    #[tokio::test]
    async fn test_get_best_block_hash_left_pads_short_hash() {
        let (client, seen) = node_with(json!("00000000000000000aab"));

        let hash = client.get_best_block_hash().await.unwrap();
        assert_eq!(hash.to_string(), format!("{:0>64}", "aab"));
        assert_eq!(seen.lock().unwrap()[0], ("getbestblockhash".to_string(), vec![]));
    }

    #[tokio::test]
    async fn test_malformed_hash_is_format_error() {
        let (client, _) = node_with(json!("zz"));

        let err = client.get_block_hash(1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(matches!(err, ClientError::Format(_)));
    }

    #[tokio::test]
    async fn test_hash_result_must_be_a_string() {
        let (client, _) = node_with(json!(12));

        let err = client.get_best_block_hash().await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_get_block_hash_sends_height() {
        let (client, seen) = node_with(json!(hash_for_height(170)));

        let hash = client.get_block_hash(170).await.unwrap();
        assert_eq!(hash.to_string(), hash_for_height(170));
        assert_eq!(seen.lock().unwrap()[0].1, vec![json!(170)]);
    }

    #[tokio::test]
    async fn test_get_block_decodes_genesis() {
        let (client, seen) = node_with(json!(GENESIS_BLOCK_HEX));

        let block = client.get_block(genesis_hash()).await.unwrap();
        assert_eq!(block.hash(), genesis_hash());
        assert_eq!(block.header.merkle_root.to_string(), GENESIS_MERKLE_ROOT);
        assert_eq!(block.transactions.len(), 1);
        assert_eq!(block.tx_hashes()[0].to_string(), GENESIS_MERKLE_ROOT);

        let (method, params) = seen.lock().unwrap()[0].clone();
        assert_eq!(method, "getblock");
        assert_eq!(params, vec![json!(GENESIS_HASH), json!(false)]);
    }

    #[tokio::test]
    async fn test_get_block_rejects_bad_hex_and_truncation() {
        let (client, _) = node_with(json!("0100zz"));
        let err = client.get_block(genesis_hash()).await.unwrap_err();
        assert!(matches!(err, ClientError::BlockHex(_)));

        let truncated = &GENESIS_BLOCK_HEX[..GENESIS_BLOCK_HEX.len() - 8];
        let (client, _) = node_with(json!(truncated));
        let err = client.get_block(genesis_hash()).await.unwrap_err();
        assert!(matches!(err, ClientError::Wire(_)));
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_get_block_verbose() {
        let (client, seen) = node_with(json!({
            "hash": GENESIS_HASH,
            "confirmations": 812_000,
            "strippedsize": 285,
            "size": 285,
            "weight": 1140,
            "height": 0,
            "version": 1,
            "versionHex": "00000001",
            "merkleroot": GENESIS_MERKLE_ROOT,
            "tx": [GENESIS_MERKLE_ROOT],
            "time": 1_231_006_505,
            "nonce": 2_083_236_893u32,
            "bits": "1d00ffff",
            "difficulty": 1.0,
            "nextblockhash": "00000000839a8e6886ab5951d76f411475428afc90947ee320161bbf18eb6048"
        }));

        let block = client.get_block_verbose(genesis_hash(), false).await.unwrap();
        assert_eq!(block.block_hash().unwrap(), genesis_hash());
        assert_eq!(block.height, 0);
        assert!(block.previous_hash.is_none());
        assert!(block.next_hash.is_some());
        assert_eq!(block.tx.as_deref().map(|t| t.len()), Some(1));
        assert!(block.raw_tx.is_none());

        let (_, params) = seen.lock().unwrap()[0].clone();
        assert_eq!(params, vec![json!(GENESIS_HASH), json!(true), json!(false)]);
    }

    #[tokio::test]
    async fn test_scalar_operations() {
        let (client, _) = node_with(json!(812_345));
        assert_eq!(client.get_block_count().await.unwrap(), 812_345);

        let (client, _) = node_with(json!(1.5));
        assert_eq!(client.get_difficulty().await.unwrap(), 1.5);

        let (client, _) = node_with(json!("twelve"));
        assert!(matches!(
            client.get_block_count().await,
            Err(ClientError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_chain_variants() {
        let (client, seen) = node_with(json!(true));

        assert!(client.verify_chain().await.unwrap());
        assert!(client.verify_chain_level(3).await.unwrap());
        assert!(client.verify_chain_blocks(4, 288).await.unwrap());

        let seen = seen.lock().unwrap();
        let params: Vec<_> = seen.iter().map(|(_, p)| p.clone()).collect();
        assert_eq!(
            params,
            vec![vec![], vec![json!(3)], vec![json!(4), json!(288)]]
        );
        assert!(seen.iter().all(|(m, _)| m == "verifychain"));
    }

    #[tokio::test]
    async fn test_get_raw_mempool() {
        let (client, seen) = node_with(json!([hash_for_height(1), hash_for_height(2)]));

        let txids = client.get_raw_mempool().await.unwrap();
        assert_eq!(txids.len(), 2);
        assert_eq!(txids[1].to_string(), hash_for_height(2));
        assert_eq!(seen.lock().unwrap()[0].1, vec![json!(false)]);
    }

    #[tokio::test]
    async fn test_get_raw_mempool_one_bad_entry_fails_all() {
        let (client, _) = node_with(json!([hash_for_height(1), "zz"]));

        let err = client.get_raw_mempool().await.unwrap_err();
        assert!(matches!(err, ClientError::Format(_)));
    }

    #[tokio::test]
    async fn test_get_raw_mempool_verbose() {
        let txid = hash_for_height(5);
        let (client, seen) = node_with(json!({
            txid.clone(): {
                "size": 226,
                "fee": 0.0001,
                "time": 1_700_000_000,
                "height": 812_345,
                "startingpriority": 0.0,
                "currentpriority": 0.0,
                "depends": []
            }
        }));

        let entries = client.get_raw_mempool_verbose().await.unwrap();
        let entry = &entries[&txid];
        assert_eq!(entry.size, 226);
        assert!(entry.depends.is_empty());
        assert_eq!(seen.lock().unwrap()[0].1, vec![json!(true)]);
    }

    #[tokio::test]
    async fn test_get_tx_out_spent_is_none() {
        let (client, seen) = node_with(Value::Null);

        let txid = hash_for_height(9);
        let out = client
            .get_tx_out(txid.parse().unwrap(), 1, true)
            .await
            .unwrap();
        assert!(out.is_none());
        assert_eq!(
            seen.lock().unwrap()[0],
            (
                "gettxout".to_string(),
                vec![json!(txid), json!(1), json!(true)]
            )
        );
    }

    #[tokio::test]
    async fn test_get_tx_out_unspent() {
        let (client, _) = node_with(json!({
            "bestblock": hash_for_height(812_345),
            "confirmations": 6,
            "value": 0.5,
            "scriptPubKey": {
                "asm": "OP_DUP OP_HASH160 0011 OP_EQUALVERIFY OP_CHECKSIG",
                "hex": "76a9140011",
                "reqSigs": 1,
                "type": "pubkeyhash",
                "addresses": ["1BoatSLRHtKNngkdXEeobR76b53LETtpyT"]
            },
            "coinbase": false
        }));

        let out = client
            .get_tx_out(genesis_hash(), 0, false)
            .await
            .unwrap()
            .expect("unspent output");
        assert_eq!(out.confirmations, 6);
        assert_eq!(out.script_pub_key.script_type, "pubkeyhash");
        assert_eq!(out.best_block_hash().unwrap().to_string(), hash_for_height(812_345));
    }

    #[tokio::test]
    async fn test_get_tx_out_empty_object_is_decode_error() {
        let (client, _) = node_with(json!({}));

        let err = client.get_tx_out(genesis_hash(), 0, true).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
