//! Session actors and the registry that tracks them

mod actor;
mod registry;

pub use actor::{SessionCommand, SessionEvent, SessionHandle, SessionInit};
pub use registry::{SessionKey, SessionKind, SessionRegistry};
