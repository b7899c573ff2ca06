//! Device entity - one authenticated client installation of a user

use crate::value_objects::Snowflake;

/// A device is the identity a gateway token resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: Snowflake,
    pub user_id: Snowflake,
}

impl Device {
    pub fn new(id: Snowflake, user_id: Snowflake) -> Self {
        Self { id, user_id }
    }
}
