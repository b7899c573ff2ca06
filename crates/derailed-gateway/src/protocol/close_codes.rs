//! WebSocket close codes
//!
//! Gateway-specific codes sent when the server ends a connection.

use serde::{Deserialize, Serialize};

/// Longest close reason a WebSocket close frame can carry
pub const MAX_CLOSE_REASON: usize = 123;

/// Gateway WebSocket close codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum CloseCode {
    /// Frame could not be decoded as JSON
    InvalidEncoding = 5000,
    /// Decoded frame is not a JSON object
    NotAnObject = 5001,
    /// `op` is missing, not an integer, or has no handler
    InvalidOpcode = 5002,
    /// Payload failed schema validation
    ValidationFailed = 5003,
    /// Token or backing-store lookup failed
    AuthenticationFailed = 5004,
    /// The authenticated identity was deleted
    IdentityDeleted = 5005,
}

impl CloseCode {
    /// Create a `CloseCode` from a raw u16 value
    #[must_use]
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            5000 => Some(Self::InvalidEncoding),
            5001 => Some(Self::NotAnObject),
            5002 => Some(Self::InvalidOpcode),
            5003 => Some(Self::ValidationFailed),
            5004 => Some(Self::AuthenticationFailed),
            5005 => Some(Self::IdentityDeleted),
            _ => None,
        }
    }

    /// Get the raw u16 value
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Default close reason for this code
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidEncoding => "invalid_encoding",
            Self::NotAnObject => "not_an_object",
            Self::InvalidOpcode => "invalid_op",
            Self::ValidationFailed => "invalid_payload",
            Self::AuthenticationFailed => "invalid_token",
            Self::IdentityDeleted => "identity_deleted",
        }
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_u16())
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        code.as_u16()
    }
}

/// Cut `reason` down to what fits in a close frame without splitting a character
#[must_use]
pub fn truncate_reason(mut reason: String) -> String {
    if reason.len() > MAX_CLOSE_REASON {
        let mut end = MAX_CLOSE_REASON;
        while !reason.is_char_boundary(end) {
            end -= 1;
        }
        reason.truncate(end);
    }
    reason
}
