//! Relationship entity - a user's link to another user

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value_objects::Snowflake;

/// Kind of relationship between two users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RelationshipType {
    Friend = 1,
    Blocked = 2,
    IncomingRequest = 3,
    OutgoingRequest = 4,
}

impl RelationshipType {
    /// Create from the stored integer value
    #[must_use]
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Friend),
            2 => Some(Self::Blocked),
            3 => Some(Self::IncomingRequest),
            4 => Some(Self::OutgoingRequest),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl Serialize for RelationshipType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for RelationshipType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = i32::deserialize(deserializer)?;
        Self::from_i32(value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid relationship type: {value}")))
    }
}

/// A relationship record as seen from the owning user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// The other user
    pub user_id: Snowflake,
    #[serde(rename = "type")]
    pub relation: RelationshipType,
}

impl Relationship {
    pub fn new(user_id: Snowflake, relation: RelationshipType) -> Self {
        Self { user_id, relation }
    }
}
