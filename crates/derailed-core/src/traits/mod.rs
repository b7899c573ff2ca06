//! Repository traits (ports)

mod repositories;

pub use repositories::{
    DeviceRepository, MemberRepository, ReadStateRepository, RelationshipRepository, RepoResult,
    UserRepository,
};
