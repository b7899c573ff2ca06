//! Integration test utilities for the gateway
//!
//! This crate runs the gateway on an ephemeral port against an in-memory
//! store and drives it with a real WebSocket client.

pub mod helpers;
pub mod wire;

pub use fixtures::*;
pub use helpers::*;
