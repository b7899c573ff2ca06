//! # derailed-db
//!
//! PostgreSQL implementations of the read-side repository traits defined in
//! `derailed-core`, via SQLx.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use derailed_db::{create_pool, PgUserRepository, PoolSettings};
//! use derailed_core::UserRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolSettings::new("postgres://localhost/derailed")).await?;
//!     let users = PgUserRepository::new(pool);
//!     let user = users.find_by_id(1.into()).await?;
//!     Ok(())
//! }
//! ```

pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, PgPool, PoolSettings};
pub use repositories::{
    PgDeviceRepository, PgMemberRepository, PgReadStateRepository, PgRelationshipRepository,
    PgUserRepository,
};
