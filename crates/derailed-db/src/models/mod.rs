//! Database row models and their entity mappings

mod device;
mod read_state;
mod relationship;
mod user;

pub use device::DeviceModel;
pub use read_state::ReadStateModel;
pub use relationship::RelationshipModel;
pub use user::UserModel;
