//! Repository traits (ports) - define the interface for data access
//!
//! The gateway only ever performs point reads keyed by primary key. No
//! multi-query transaction is assumed; each call is consistent on its own.

use async_trait::async_trait;

use crate::entities::{Device, ReadState, Relationship, User};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Device Repository
// ============================================================================

#[async_trait]
pub trait DeviceRepository: Send + Sync {
    /// Find device by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Device>>;
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID (including the stored password hash)
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;
}

// ============================================================================
// Member Repository
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// IDs of every guild the user is a member of, ascending
    async fn guild_ids_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Snowflake>>;
}

// ============================================================================
// Read State Repository
// ============================================================================

#[async_trait]
pub trait ReadStateRepository: Send + Sync {
    /// Read states of the user, limited to channels of `guild_ids` plus direct channels
    async fn find_for_user(
        &self,
        user_id: Snowflake,
        guild_ids: &[Snowflake],
    ) -> RepoResult<Vec<ReadState>>;
}

// ============================================================================
// Relationship Repository
// ============================================================================

#[async_trait]
pub trait RelationshipRepository: Send + Sync {
    /// Relationships originating from the user
    async fn find_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Relationship>>;
}
