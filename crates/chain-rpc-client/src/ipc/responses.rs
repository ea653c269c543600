//! Reply frames as received from the node.

use crate::domain::correlation::CorrelationId;
use crate::domain::error::{FrameError, RpcError};
use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::Value;

/// Reply envelope.
///
/// `result` is kept as raw JSON text; decoding into a typed value happens when
/// the caller receives it. A missing `result` is read as `null`. `error` is
/// also kept raw so a malformed error object still leaves the id readable.
#[derive(Debug, Deserialize)]
pub struct Response {
    #[serde(default = "null_payload")]
    pub result: Box<RawValue>,
    #[serde(default)]
    pub error: Option<Box<RawValue>>,
    #[serde(default)]
    pub id: Option<Value>,
}

fn null_payload() -> Box<RawValue> {
    RawValue::NULL.to_owned()
}

impl Response {
    /// Parse one frame, refusing frames larger than `max_size`.
    pub fn parse(frame: &[u8], max_size: usize) -> Result<Self, FrameError> {
        if frame.len() > max_size {
            return Err(FrameError::Oversized {
                size: frame.len(),
                max: max_size,
            });
        }
        serde_json::from_slice(frame).map_err(FrameError::Malformed)
    }

    /// The id the node echoed back.
    pub fn correlation_id(&self) -> Result<CorrelationId, FrameError> {
        match &self.id {
            None | Some(Value::Null) => Err(FrameError::MissingId),
            Some(value) => value
                .as_u64()
                .map(CorrelationId::new)
                .ok_or_else(|| FrameError::InvalidId(value.to_string())),
        }
    }

    /// The payload, or the node's error if one was reported.
    ///
    /// The outer error means the `error` member is present but is not a
    /// `{code, message}` object.
    pub fn into_result(self) -> Result<Result<Box<RawValue>, RpcError>, serde_json::Error> {
        match self.error {
            Some(error) => serde_json::from_str::<RpcError>(error.get()).map(Err),
            None => Ok(Ok(self.result)),
        }
    }
}
