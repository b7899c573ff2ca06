//! Op-code routing and the ready handler

mod error;
mod ready;

pub use error::{HandlerError, HandlerResult};
pub use ready::{parse_ready, ReadyArgs, ReadyAssembler, Repositories, Snapshot};

use crate::protocol::OpCode;
use serde_json::Value;

/// Resolve the op code of a decoded inbound frame
///
/// Checks run in order and stop at the first failure: the frame must be an
/// object, `op` must be an integer, and the code must have an inbound handler.
pub fn route(frame: &Value) -> HandlerResult<OpCode> {
    let object = frame.as_object().ok_or(HandlerError::NotAnObject)?;

    let raw = object
        .get("op")
        .and_then(Value::as_i64)
        .ok_or(HandlerError::InvalidOpcode)?;

    match OpCode::from_i64(raw) {
        Some(op) if op.is_handled_inbound() => Ok(op),
        Some(op) => {
            tracing::debug!(op = %op, "Reserved op code received");
            Err(HandlerError::InvalidOpcode)
        }
        None => Err(HandlerError::InvalidOpcode),
    }
}
