//! Gateway state
//!
//! Shared dependencies handed to every connection.

use crate::handlers::ReadyAssembler;
use crate::session::SessionRegistry;
use derailed_common::HeartbeatConfig;
use derailed_core::SnowflakeGenerator;
use std::sync::Arc;

/// Gateway application state
#[derive(Clone)]
pub struct GatewayState {
    /// Token and backing-store access for ready
    assembler: Arc<ReadyAssembler>,
    /// Running session actors
    registry: Arc<SessionRegistry>,
    /// Session id source
    snowflake: Arc<SnowflakeGenerator>,
    heartbeat: HeartbeatConfig,
}

impl GatewayState {
    pub fn new(
        assembler: ReadyAssembler,
        registry: Arc<SessionRegistry>,
        snowflake: SnowflakeGenerator,
        heartbeat: HeartbeatConfig,
    ) -> Self {
        Self {
            assembler: Arc::new(assembler),
            registry,
            snowflake: Arc::new(snowflake),
            heartbeat,
        }
    }

    pub fn assembler(&self) -> &ReadyAssembler {
        &self.assembler
    }

    /// Get the session registry
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn snowflake(&self) -> &SnowflakeGenerator {
        &self.snowflake
    }

    pub fn heartbeat_config(&self) -> &HeartbeatConfig {
        &self.heartbeat
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("registry", &self.registry)
            .field("heartbeat", &self.heartbeat)
            .finish_non_exhaustive()
    }
}
