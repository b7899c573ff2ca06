//! Per-connection state and the event loop that owns it

mod connection;
mod state;

pub use connection::{Connection, Exit};
pub use state::{ConnectionState, EstablishedSession};
