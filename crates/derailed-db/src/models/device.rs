//! Device database model

use derailed_core::{Device, Snowflake};
use sqlx::FromRow;

/// Database model for devices table
#[derive(Debug, Clone, FromRow)]
pub struct DeviceModel {
    pub id: i64,
    pub user_id: i64,
}

impl From<DeviceModel> for Device {
    fn from(model: DeviceModel) -> Self {
        Device::new(Snowflake::new(model.id), Snowflake::new(model.user_id))
    }
}
