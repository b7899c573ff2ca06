//! Gateway operation codes

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Gateway operation codes
///
/// Only [`OpCode::Ready`] is accepted from clients. The remaining
/// client-side slots are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    /// Server relays a session event (server only)
    Dispatch = 0,
    /// Sent once on connect with the heartbeat interval (server only)
    Hello = 1,
    /// Client authenticates; server answers with the snapshot
    Ready = 2,
    /// Reserved
    Heartbeat = 3,
    /// Reserved
    HeartbeatAck = 4,
}

impl OpCode {
    /// Look a raw code up in the op-code table
    #[must_use]
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Dispatch),
            1 => Some(Self::Hello),
            2 => Some(Self::Ready),
            3 => Some(Self::Heartbeat),
            4 => Some(Self::HeartbeatAck),
            _ => None,
        }
    }

    /// Get the raw integer value
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether an inbound frame with this code has a handler
    #[must_use]
    pub const fn is_handled_inbound(self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Get the name of this op code
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dispatch => "Dispatch",
            Self::Hello => "Hello",
            Self::Ready => "Ready",
            Self::Heartbeat => "Heartbeat",
            Self::HeartbeatAck => "HeartbeatAck",
        }
    }
}

impl Serialize for OpCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for OpCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;
        Self::from_i64(value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid op code: {value}")))
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_u8())
    }
}
