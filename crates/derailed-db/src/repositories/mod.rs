//! PostgreSQL repository implementations

mod device;
mod error;
mod member;
mod read_state;
mod relationship;
mod user;

pub use device::PgDeviceRepository;
pub use member::PgMemberRepository;
pub use read_state::PgReadStateRepository;
pub use relationship::PgRelationshipRepository;
pub use user::PgUserRepository;
