//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Device not found: {0}")]
    DeviceNotFound(Snowflake),

    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    /// Query failed or a stored row could not be decoded
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl DomainError {
    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DeviceNotFound(_) | Self::UserNotFound(_))
    }
}
