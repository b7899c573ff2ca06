//! # derailed-gateway
//!
//! WebSocket gateway: Hello and heartbeat, the ready handshake, optional
//! zlib stream compression, and relay of session events to clients.

pub mod codec;
pub mod connection;
pub mod handlers;
pub mod heartbeat;
pub mod protocol;
pub mod server;
pub mod session;

pub use server::{create_app, create_gateway_state, run, serve, GatewayState};
