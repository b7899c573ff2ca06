//! Gateway message format
//!
//! Every outbound frame is wrapped in the `{op, s, t?, d}` envelope.

use super::{HelloPayload, OpCode, ReadyPayload};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outbound gateway envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayMessage {
    /// Operation code
    pub op: OpCode,

    /// Sequence number, 0 for Hello and increasing afterwards
    pub s: u64,

    /// Event name (dispatch only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Event data payload
    pub d: Value,
}

impl GatewayMessage {
    /// Create a Hello message (op=1, s=0)
    pub fn hello(payload: &HelloPayload) -> Result<Self, serde_json::Error> {
        Ok(Self {
            op: OpCode::Hello,
            s: 0,
            t: None,
            d: serde_json::to_value(payload)?,
        })
    }

    /// Create the Ready reply (op=2)
    pub fn ready(sequence: u64, payload: &ReadyPayload) -> Result<Self, serde_json::Error> {
        Ok(Self {
            op: OpCode::Ready,
            s: sequence,
            t: None,
            d: serde_json::to_value(payload)?,
        })
    }

    /// Create a Dispatch message (op=0)
    #[must_use]
    pub fn dispatch(event_type: impl Into<String>, sequence: u64, data: Value) -> Self {
        Self {
            op: OpCode::Dispatch,
            s: sequence,
            t: Some(event_type.into()),
            d: data,
        }
    }
}
