//! Domain entities - core business objects

mod device;
mod read_state;
mod relationship;
mod user;

pub use device::Device;
pub use read_state::ReadState;
pub use relationship::{Relationship, RelationshipType};
pub use user::User;
