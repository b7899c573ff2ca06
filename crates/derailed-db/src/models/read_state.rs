//! Read state database model

use derailed_core::{ReadState, Snowflake};
use sqlx::FromRow;

/// Database model for read_states table
#[derive(Debug, Clone, FromRow)]
pub struct ReadStateModel {
    pub channel_id: i64,
    pub last_message_id: Option<i64>,
    pub mentions: i32,
}

impl From<ReadStateModel> for ReadState {
    fn from(model: ReadStateModel) -> Self {
        ReadState {
            channel_id: Snowflake::new(model.channel_id),
            last_message_id: model.last_message_id.map(Snowflake::new),
            mentions: model.mentions,
        }
    }
}
