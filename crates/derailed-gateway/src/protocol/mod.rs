//! Gateway protocol definitions
//!
//! Op codes, close codes, the outbound envelope and payload shapes.

mod close_codes;
mod messages;
mod opcodes;
mod payloads;

pub use close_codes::{truncate_reason, CloseCode, MAX_CLOSE_REASON};
pub use messages::GatewayMessage;
pub use opcodes::OpCode;
pub use payloads::{HelloPayload, ReadyData, ReadyPayload, ReadyRequest, UserPayload};
