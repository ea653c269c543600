//! Chain commands (blocks, mempool, verification, UTXO lookup).
//!
//! Each operation comes as a pair: `<op>_async` dispatches and returns a
//! typed [`ResponseFuture`] right away, `<op>` awaits it.

use crate::client::Client;
use crate::domain::decode;
use crate::domain::error::ClientResult;
use crate::domain::future::ResponseFuture;
use crate::ipc::requests::Command;
use chain_types::{Block, GetBlockVerboseResult, GetRawMempoolVerboseResult, GetTxOutResult, Hash};
use std::collections::HashMap;
use tracing::instrument;

impl Client {
    // ═══════════════════════════════════════════════════════════════════════
    // BLOCKS
    // ═══════════════════════════════════════════════════════════════════════

    /// getbestblockhash - Hash of the tip of the longest chain
    pub fn get_best_block_hash_async(&self) -> ResponseFuture<Hash> {
        self.send_cmd(&Command::GetBestBlockHash, decode::hash)
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn get_best_block_hash(&self) -> ClientResult<Hash> {
        self.get_best_block_hash_async().await
    }

    /// getblock - Raw block decoded from its serialized form
    pub fn get_block_async(&self, hash: Hash) -> ResponseFuture<Block> {
        let command = Command::GetBlock {
            hash,
            verbose: Some(false),
            verbose_tx: None,
        };
        self.send_cmd(&command, decode::block)
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn get_block(&self, hash: Hash) -> ClientResult<Block> {
        self.get_block_async(hash).await
    }

    /// getblock - Block as a JSON record, optionally with expanded transactions
    pub fn get_block_verbose_async(
        &self,
        hash: Hash,
        verbose_tx: bool,
    ) -> ResponseFuture<GetBlockVerboseResult> {
        let command = Command::GetBlock {
            hash,
            verbose: Some(true),
            verbose_tx: Some(verbose_tx),
        };
        self.send_cmd(&command, decode::json)
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn get_block_verbose(
        &self,
        hash: Hash,
        verbose_tx: bool,
    ) -> ClientResult<GetBlockVerboseResult> {
        self.get_block_verbose_async(hash, verbose_tx).await
    }

    /// getblockcount - Height of the longest chain
    pub fn get_block_count_async(&self) -> ResponseFuture<i64> {
        self.send_cmd(&Command::GetBlockCount, decode::json)
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn get_block_count(&self) -> ClientResult<i64> {
        self.get_block_count_async().await
    }

    /// getdifficulty - Proof-of-work difficulty as a multiple of the minimum
    pub fn get_difficulty_async(&self) -> ResponseFuture<f64> {
        self.send_cmd(&Command::GetDifficulty, decode::json)
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn get_difficulty(&self) -> ClientResult<f64> {
        self.get_difficulty_async().await
    }

    /// getblockhash - Hash of the block at `height` in the best chain
    pub fn get_block_hash_async(&self, height: i64) -> ResponseFuture<Hash> {
        self.send_cmd(&Command::GetBlockHash { height }, decode::hash)
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn get_block_hash(&self, height: i64) -> ClientResult<Hash> {
        self.get_block_hash_async(height).await
    }

    // ═══════════════════════════════════════════════════════════════════════
    // MEMPOOL
    // ═══════════════════════════════════════════════════════════════════════

    /// getrawmempool - Ids of all transactions in the memory pool
    pub fn get_raw_mempool_async(&self) -> ResponseFuture<Vec<Hash>> {
        let command = Command::GetRawMempool {
            verbose: Some(false),
        };
        self.send_cmd(&command, decode::hash_list)
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn get_raw_mempool(&self) -> ClientResult<Vec<Hash>> {
        self.get_raw_mempool_async().await
    }

    /// getrawmempool - Memory pool entries keyed by transaction id
    pub fn get_raw_mempool_verbose_async(
        &self,
    ) -> ResponseFuture<HashMap<String, GetRawMempoolVerboseResult>> {
        let command = Command::GetRawMempool {
            verbose: Some(true),
        };
        self.send_cmd(&command, decode::json)
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn get_raw_mempool_verbose(
        &self,
    ) -> ClientResult<HashMap<String, GetRawMempoolVerboseResult>> {
        self.get_raw_mempool_verbose_async().await
    }

    // ═══════════════════════════════════════════════════════════════════════
    // VERIFICATION
    // ═══════════════════════════════════════════════════════════════════════

    /// verifychain - Verify the chain at the node's default level and depth
    pub fn verify_chain_async(&self) -> ResponseFuture<bool> {
        let command = Command::VerifyChain {
            check_level: None,
            check_depth: None,
        };
        self.send_cmd(&command, decode::json)
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn verify_chain(&self) -> ClientResult<bool> {
        self.verify_chain_async().await
    }

    /// verifychain - Verify the whole chain at `check_level`
    pub fn verify_chain_level_async(&self, check_level: i32) -> ResponseFuture<bool> {
        let command = Command::VerifyChain {
            check_level: Some(check_level),
            check_depth: None,
        };
        self.send_cmd(&command, decode::json)
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn verify_chain_level(&self, check_level: i32) -> ClientResult<bool> {
        self.verify_chain_level_async(check_level).await
    }

    /// verifychain - Verify the newest `check_depth` blocks at `check_level`
    pub fn verify_chain_blocks_async(
        &self,
        check_level: i32,
        check_depth: i32,
    ) -> ResponseFuture<bool> {
        let command = Command::VerifyChain {
            check_level: Some(check_level),
            check_depth: Some(check_depth),
        };
        self.send_cmd(&command, decode::json)
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn verify_chain_blocks(&self, check_level: i32, check_depth: i32) -> ClientResult<bool> {
        self.verify_chain_blocks_async(check_level, check_depth).await
    }

    // ═══════════════════════════════════════════════════════════════════════
    // UTXO
    // ═══════════════════════════════════════════════════════════════════════

    /// gettxout - Details of an unspent output, `None` if spent or unknown
    pub fn get_tx_out_async(
        &self,
        txid: Hash,
        index: u32,
        include_mempool: bool,
    ) -> ResponseFuture<Option<GetTxOutResult>> {
        let command = Command::GetTxOut {
            txid,
            index,
            include_mempool: Some(include_mempool),
        };
        self.send_cmd(&command, decode::tx_out)
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn get_tx_out(
        &self,
        txid: Hash,
        index: u32,
        include_mempool: bool,
    ) -> ClientResult<Option<GetTxOutResult>> {
        self.get_tx_out_async(txid, index, include_mempool).await
    }
}
