//! Read state - how far a user has read in a channel

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Per-channel read marker for a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadState {
    pub channel_id: Snowflake,
    /// Last message the user has seen (None if the channel was never opened)
    pub last_message_id: Option<Snowflake>,
    /// Unacknowledged mentions in the channel
    pub mentions: i32,
}

impl ReadState {
    pub fn new(channel_id: Snowflake) -> Self {
        Self {
            channel_id,
            last_message_id: None,
            mentions: 0,
        }
    }
}
