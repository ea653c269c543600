//! Pending Table - correlation IDs of requests still waiting for a reply.
//!
//! Every entry is removed exactly once, by whichever of reply, send failure,
//! expiry sweep, or teardown reaches it first. Removal is the only path that
//! fills the entry's cell, so a cell is never filled twice through the table.

use crate::domain::correlation::CorrelationId;
use crate::domain::error::{ClientError, RpcError, TransportError};
use crate::domain::future::{RawResult, ResponseCell};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::value::RawValue;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// A request waiting for its reply
struct PendingEntry {
    /// Cell the reply is delivered into
    cell: Arc<ResponseCell>,
    /// Method name (for logging)
    method: &'static str,
    /// When the request was registered
    created_at: Instant,
}

/// Counters for the pending table
#[derive(Debug, Default)]
pub struct PendingStats {
    /// Requests registered
    pub total_registered: AtomicU64,
    /// Replies delivered with a result
    pub total_completed: AtomicU64,
    /// Replies delivered with a node error
    pub total_server_errors: AtomicU64,
    /// Replies with no matching entry
    pub total_orphaned: AtomicU64,
    /// Entries resolved by the expiry sweep
    pub total_expired: AtomicU64,
    /// Entries resolved by teardown
    pub total_closed: AtomicU64,
    /// Entries resolved because the transport refused the frame
    pub total_send_failures: AtomicU64,
    /// Replies for a pending id whose error object could not be decoded
    pub total_malformed: AtomicU64,
}

impl PendingStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            registered: self.total_registered.load(Ordering::Relaxed),
            completed: self.total_completed.load(Ordering::Relaxed),
            server_errors: self.total_server_errors.load(Ordering::Relaxed),
            orphaned: self.total_orphaned.load(Ordering::Relaxed),
            expired: self.total_expired.load(Ordering::Relaxed),
            closed: self.total_closed.load(Ordering::Relaxed),
            send_failures: self.total_send_failures.load(Ordering::Relaxed),
            malformed: self.total_malformed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`PendingStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub registered: u64,
    pub completed: u64,
    pub server_errors: u64,
    pub orphaned: u64,
    pub expired: u64,
    pub closed: u64,
    pub send_failures: u64,
    pub malformed: u64,
}

/// Correlation table shared by the dispatcher and the completion router.
///
/// Flow:
/// 1. Dispatcher allocates a CorrelationId and calls `register()`
/// 2. Dispatcher hands the request frame to the transport
/// 3. Router receives the reply and calls `complete()`
/// 4. Caller's handle wakes with the payload
pub struct PendingTable {
    /// Map of correlation ID to pending request
    entries: DashMap<CorrelationId, PendingEntry>,
    /// Close reason once torn down; registration holds the read side
    closed: RwLock<Option<String>>,
    /// Statistics
    stats: PendingStats,
}

impl PendingTable {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            closed: RwLock::new(None),
            stats: PendingStats::default(),
        }
    }

    /// Register an empty cell under `id`.
    ///
    /// Fails with [`TransportError::ConnectionClosed`] once the table is closed,
    /// and with [`ClientError::DuplicateId`] if `id` is already pending. The
    /// existing entry is left in place.
    pub fn register(
        &self,
        id: CorrelationId,
        method: &'static str,
    ) -> Result<Arc<ResponseCell>, ClientError> {
        let closed = self.closed.read();
        if let Some(reason) = closed.as_ref() {
            return Err(TransportError::ConnectionClosed(reason.clone()).into());
        }

        let cell = Arc::new(ResponseCell::new());
        match self.entries.entry(id) {
            Entry::Occupied(existing) => {
                error!(
                    correlation_id = %id,
                    method = method,
                    pending_method = existing.get().method,
                    "Correlation ID already pending"
                );
                return Err(ClientError::DuplicateId(id));
            }
            Entry::Vacant(slot) => {
                slot.insert(PendingEntry {
                    cell: Arc::clone(&cell),
                    method,
                    created_at: Instant::now(),
                });
            }
        }
        self.stats.total_registered.fetch_add(1, Ordering::Relaxed);

        debug!(correlation_id = %id, method = method, "Registered pending request");

        Ok(cell)
    }

    /// Deliver a reply to the entry registered under `id`.
    ///
    /// Returns false if no such entry exists (unknown, duplicate, or late reply).
    pub fn complete(&self, id: CorrelationId, reply: Result<Box<RawValue>, RpcError>) -> bool {
        let Some((_, entry)) = self.entries.remove(&id) else {
            self.stats.total_orphaned.fetch_add(1, Ordering::Relaxed);
            warn!(correlation_id = %id, "Reply for unknown or expired correlation ID");
            return false;
        };

        let elapsed = entry.created_at.elapsed();
        match &reply {
            Ok(_) => {
                self.stats.total_completed.fetch_add(1, Ordering::Relaxed);
                debug!(
                    correlation_id = %id,
                    method = entry.method,
                    response_time_ms = elapsed.as_millis(),
                    "Completed pending request"
                );
            }
            Err(e) => {
                self.stats.total_server_errors.fetch_add(1, Ordering::Relaxed);
                debug!(
                    correlation_id = %id,
                    method = entry.method,
                    code = e.code,
                    response_time_ms = elapsed.as_millis(),
                    "Node returned error"
                );
            }
        }

        fill(id, &entry, reply.map_err(ClientError::Server));
        true
    }

    /// Resolve the entry under `id` with an error found while reading its reply.
    ///
    /// An unknown id counts as orphaned, like [`PendingTable::complete`].
    pub fn reject(&self, id: CorrelationId, err: ClientError) -> bool {
        let Some((_, entry)) = self.entries.remove(&id) else {
            self.stats.total_orphaned.fetch_add(1, Ordering::Relaxed);
            warn!(correlation_id = %id, "Malformed reply for unknown or expired correlation ID");
            return false;
        };
        self.stats.total_malformed.fetch_add(1, Ordering::Relaxed);
        warn!(
            correlation_id = %id,
            method = entry.method,
            error = %err,
            "Malformed reply"
        );
        fill(id, &entry, Err(err));
        true
    }

    /// Resolve the entry under `id` with a transport failure from dispatch.
    pub fn abort(&self, id: CorrelationId, err: TransportError) -> bool {
        let Some((_, entry)) = self.entries.remove(&id) else {
            return false;
        };
        self.stats.total_send_failures.fetch_add(1, Ordering::Relaxed);
        fill(id, &entry, Err(err.into()));
        true
    }

    /// Resolve entries older than `ttl` with [`ClientError::Timeout`].
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut expired = Vec::new();

        self.entries.retain(|id, entry| {
            let elapsed = now.saturating_duration_since(entry.created_at);
            if elapsed > ttl {
                expired.push((*id, Arc::clone(&entry.cell), entry.method, elapsed));
                false
            } else {
                true
            }
        });

        for (id, cell, method, elapsed) in &expired {
            warn!(
                correlation_id = %id,
                method = method,
                elapsed_ms = elapsed.as_millis(),
                timeout_ms = ttl.as_millis(),
                "Expiring pending request"
            );
            if cell.fill(Err(ClientError::timeout(method, *elapsed))).is_err() {
                error!(correlation_id = %id, method = method, "Expired request was already resolved");
            }
        }

        self.stats
            .total_expired
            .fetch_add(expired.len() as u64, Ordering::Relaxed);
        expired.len()
    }

    /// Close the table and resolve every entry with `ConnectionClosed`.
    ///
    /// Registration is excluded for the duration, so no entry can appear after
    /// the drain. Returns the number of entries resolved; closing twice keeps
    /// the first reason and resolves nothing the second time.
    pub fn close(&self, reason: &str) -> usize {
        let mut closed = self.closed.write();
        if closed.is_none() {
            *closed = Some(reason.to_string());
        }
        let reason = closed.clone().unwrap_or_default();

        let ids: Vec<CorrelationId> = self.entries.iter().map(|e| *e.key()).collect();
        let mut resolved = 0;
        for id in ids {
            if let Some((_, entry)) = self.entries.remove(&id) {
                fill(id, &entry, Err(TransportError::ConnectionClosed(reason.clone()).into()));
                resolved += 1;
            }
        }

        self.stats
            .total_closed
            .fetch_add(resolved as u64, Ordering::Relaxed);
        resolved
    }

    pub fn is_closed(&self) -> bool {
        self.closed.read().is_some()
    }

    /// Get number of currently pending requests
    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }

    /// Check if a correlation ID is pending
    pub fn is_pending(&self, id: &CorrelationId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn stats(&self) -> &PendingStats {
        &self.stats
    }
}

impl Default for PendingTable {
    fn default() -> Self {
        Self::new()
    }
}

fn fill(id: CorrelationId, entry: &PendingEntry, result: RawResult) {
    if entry.cell.fill(result).is_err() {
        error!(
            correlation_id = %id,
            method = entry.method,
            "Pending request resolved twice"
        );
    }
}

/// Background task expiring requests older than `ttl`.
///
/// Stops once the table is closed.
pub async fn sweep_task(table: Arc<PendingTable>, ttl: Duration, interval: Duration) {
    let mut sweep_interval = tokio::time::interval(interval);
    sweep_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        sweep_interval.tick().await;
        if table.is_closed() {
            debug!("Pending table closed, stopping expiry sweep");
            break;
        }
        let removed = table.sweep_expired(ttl);
        if removed > 0 {
            debug!(removed = removed, "Expired pending requests");
        }
    }
}
