//! One-shot response handles.
//!
//! A [`ResponseCell`] is a single-assignment slot: the router fills it once,
//! one receiver takes the value out. [`ResponseHandle`] is what callers hold
//! for an untyped reply; [`ResponseFuture`] pairs a handle with the decode
//! function of one operation.

use crate::domain::correlation::CorrelationId;
use crate::domain::decode::DecodeFn;
use crate::domain::error::ClientError;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use serde_json::value::RawValue;
use std::fmt;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Notify;

/// Raw reply payload, or the first error on the way to it.
pub type RawResult = Result<Box<RawValue>, ClientError>;

/// Returned when a cell that already holds a value is filled again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FillError {
    #[error("response already resolved")]
    AlreadyResolved,
}

enum Slot {
    Pending,
    Ready(RawResult),
    Consumed,
}

/// Single-assignment completion cell.
pub struct ResponseCell {
    slot: Mutex<Slot>,
    notify: Notify,
}

impl ResponseCell {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot::Pending),
            notify: Notify::new(),
        }
    }

    /// A cell that is already filled.
    pub fn resolved(result: RawResult) -> Self {
        Self {
            slot: Mutex::new(Slot::Ready(result)),
            notify: Notify::new(),
        }
    }

    /// Store the result and wake every waiting receiver.
    ///
    /// Only the first call succeeds; the value is never overwritten.
    pub fn fill(&self, result: RawResult) -> Result<(), FillError> {
        {
            let mut slot = self.slot.lock();
            if !matches!(*slot, Slot::Pending) {
                return Err(FillError::AlreadyResolved);
            }
            *slot = Slot::Ready(result);
        }
        self.notify.notify_waiters();
        Ok(())
    }

    /// Whether the cell has been filled (consumed counts as filled).
    pub fn is_resolved(&self) -> bool {
        !matches!(*self.slot.lock(), Slot::Pending)
    }

    /// Wait for the result and take it out of the cell.
    ///
    /// A second receive after the value was taken returns
    /// [`ClientError::AlreadyConsumed`]. Dropping the returned future before
    /// completion leaves the cell untouched.
    pub async fn receive(&self) -> RawResult {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register as a waiter before looking at the slot so a fill
            // between the check and the await is not missed.
            notified.as_mut().enable();

            if let Some(result) = self.try_take() {
                return result;
            }
            notified.await;
        }
    }

    fn try_take(&self) -> Option<RawResult> {
        let mut slot = self.slot.lock();
        match std::mem::replace(&mut *slot, Slot::Consumed) {
            Slot::Pending => {
                *slot = Slot::Pending;
                None
            }
            Slot::Ready(result) => Some(result),
            Slot::Consumed => Some(Err(ClientError::AlreadyConsumed)),
        }
    }
}

impl Default for ResponseCell {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResponseCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match *self.slot.lock() {
            Slot::Pending => "pending",
            Slot::Ready(Ok(_)) => "ready",
            Slot::Ready(Err(_)) => "failed",
            Slot::Consumed => "consumed",
        };
        f.debug_struct("ResponseCell").field("state", &state).finish()
    }
}

/// Handle to the untyped reply of one dispatched request.
#[derive(Debug, Clone)]
pub struct ResponseHandle {
    id: CorrelationId,
    method: &'static str,
    cell: Arc<ResponseCell>,
    created_at: Instant,
}

impl ResponseHandle {
    pub(crate) fn new(id: CorrelationId, method: &'static str, cell: Arc<ResponseCell>) -> Self {
        Self {
            id,
            method,
            cell,
            created_at: Instant::now(),
        }
    }

    /// A handle whose outcome is known at dispatch time.
    pub(crate) fn resolved(id: CorrelationId, method: &'static str, result: RawResult) -> Self {
        Self::new(id, method, Arc::new(ResponseCell::resolved(result)))
    }

    pub fn id(&self) -> CorrelationId {
        self.id
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    pub fn is_resolved(&self) -> bool {
        self.cell.is_resolved()
    }

    /// Wait for the raw reply payload.
    pub async fn receive(&self) -> RawResult {
        self.cell.receive().await
    }

    /// Wait at most `timeout` for the raw reply.
    ///
    /// On timeout the request stays pending; a later receive can still
    /// observe the reply.
    pub async fn receive_timeout(&self, timeout: Duration) -> RawResult {
        match tokio::time::timeout(timeout, self.cell.receive()).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::timeout(self.method, self.created_at.elapsed())),
        }
    }

    /// Attach the decode step of a typed operation.
    pub fn decode_with<T>(self, decode: DecodeFn<T>) -> ResponseFuture<T> {
        ResponseFuture {
            handle: self,
            decode,
        }
    }
}

/// Typed handle: a raw handle plus the decoder for its operation.
///
/// Awaiting it directly receives and decodes in one step.
pub struct ResponseFuture<T> {
    handle: ResponseHandle,
    decode: DecodeFn<T>,
}

impl<T> ResponseFuture<T> {
    pub fn id(&self) -> CorrelationId {
        self.handle.id()
    }

    pub fn method(&self) -> &'static str {
        self.handle.method()
    }

    pub fn is_resolved(&self) -> bool {
        self.handle.is_resolved()
    }

    /// The untyped handle underneath.
    pub fn handle(&self) -> &ResponseHandle {
        &self.handle
    }

    /// Wait for the reply and decode it.
    pub async fn receive(&self) -> Result<T, ClientError> {
        let raw = self.handle.receive().await?;
        (self.decode)(&raw)
    }

    pub async fn receive_timeout(&self, timeout: Duration) -> Result<T, ClientError> {
        let raw = self.handle.receive_timeout(timeout).await?;
        (self.decode)(&raw)
    }
}

impl<T> fmt::Debug for ResponseFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseFuture")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> IntoFuture for ResponseFuture<T> {
    type Output = Result<T, ClientError>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.receive().await })
    }
}
