//! # derailed-core
//!
//! Domain layer containing entities, value objects, and repository traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Device, ReadState, Relationship, RelationshipType, User};
pub use error::DomainError;
pub use traits::{
    DeviceRepository, MemberRepository, ReadStateRepository, RelationshipRepository, RepoResult,
    UserRepository,
};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
