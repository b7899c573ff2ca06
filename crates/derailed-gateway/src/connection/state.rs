//! Connection state
//!
//! Owned by exactly one [`Connection`](super::Connection); never shared.

use derailed_core::Snowflake;

use crate::codec::Compressor;

/// Identity bound to a connection by a successful ready
///
/// The session actor itself lives in the registry under `session_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstablishedSession {
    pub session_id: String,
    pub user_id: Snowflake,
}

/// Mutable state of one gateway connection
#[derive(Debug)]
pub struct ConnectionState {
    /// Set once, together, by ready
    session: Option<EstablishedSession>,
    /// Last sequence number written to the socket
    sequence: u64,
    /// Present iff the client asked for compression
    compressor: Option<Compressor>,
    /// Interval announced in Hello (ms)
    heartbeat_interval: u64,
}

impl ConnectionState {
    pub fn new(heartbeat_interval: u64) -> Self {
        Self {
            session: None,
            sequence: 0,
            compressor: None,
            heartbeat_interval,
        }
    }

    pub fn is_established(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&EstablishedSession> {
        self.session.as_ref()
    }

    /// Bind the session and negotiated compressor
    ///
    /// Returns false, changing nothing, if a session is already bound.
    pub fn establish(&mut self, session: EstablishedSession, compressor: Option<Compressor>) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.session = Some(session);
        self.compressor = compressor;
        true
    }

    /// Detach the session during teardown
    pub fn take_session(&mut self) -> Option<EstablishedSession> {
        self.session.take()
    }

    /// Advance and return the sequence for the next outbound frame
    pub fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn compressor_mut(&mut self) -> Option<&mut Compressor> {
        self.compressor.as_mut()
    }

    pub fn is_compressed(&self) -> bool {
        self.compressor.is_some()
    }

    pub fn heartbeat_interval(&self) -> u64 {
        self.heartbeat_interval
    }
}
