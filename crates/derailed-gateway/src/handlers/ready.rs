//! Ready handler (op 2)
//!
//! Validates the request and turns a token into the initial snapshot.

use std::sync::Arc;

use derailed_common::TokenService;
use derailed_core::{
    DeviceRepository, DomainError, MemberRepository, ReadState, ReadStateRepository, Relationship,
    RelationshipRepository, Snowflake, User, UserRepository,
};
use serde_json::Value;
use validator::Validate;

use super::{HandlerError, HandlerResult};
use crate::protocol::{ReadyData, ReadyRequest};

/// Validated body of a ready request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyArgs {
    pub token: String,
    pub compress: bool,
}

/// Check a decoded ready frame against its schema
pub fn parse_ready(frame: Value) -> HandlerResult<ReadyArgs> {
    let request: ReadyRequest =
        serde_json::from_value(frame).map_err(|e| HandlerError::schema(&e))?;
    request.validate()?;

    match request.d {
        Some(ReadyData {
            token: Some(token),
            compress,
        }) => Ok(ReadyArgs { token, compress }),
        _ => Err(HandlerError::Validation("{\"d\":[\"required\"]}".to_string())),
    }
}

/// Backing-store access used while assembling a snapshot
#[derive(Clone)]
pub struct Repositories {
    pub devices: Arc<dyn DeviceRepository>,
    pub users: Arc<dyn UserRepository>,
    pub members: Arc<dyn MemberRepository>,
    pub read_states: Arc<dyn ReadStateRepository>,
    pub relationships: Arc<dyn RelationshipRepository>,
}

/// Everything the ready reply is built from
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub user: User,
    pub guild_ids: Vec<Snowflake>,
    pub read_states: Vec<ReadState>,
    pub relationships: Vec<Relationship>,
}

/// Resolves a token to an identity and fetches its snapshot
pub struct ReadyAssembler {
    tokens: TokenService,
    repos: Repositories,
}

impl ReadyAssembler {
    pub fn new(tokens: TokenService, repos: Repositories) -> Self {
        Self { tokens, repos }
    }

    /// Run the lookups in order; any failure is an authentication failure
    #[tracing::instrument(skip_all)]
    pub async fn assemble(&self, token: &str) -> HandlerResult<Snapshot> {
        let device_id = self.tokens.device_id(token)?;

        let device = self
            .repos
            .devices
            .find_by_id(device_id)
            .await?
            .ok_or(DomainError::DeviceNotFound(device_id))?;

        let user = self
            .repos
            .users
            .find_by_id(device.user_id)
            .await?
            .ok_or(DomainError::UserNotFound(device.user_id))?;

        let guild_ids = self.repos.members.guild_ids_for_user(user.id).await?;
        let read_states = self
            .repos
            .read_states
            .find_for_user(user.id, &guild_ids)
            .await?;
        let relationships = self.repos.relationships.find_for_user(user.id).await?;

        tracing::debug!(
            user_id = %user.id,
            guilds = guild_ids.len(),
            read_states = read_states.len(),
            relationships = relationships.len(),
            "Snapshot assembled"
        );

        Ok(Snapshot {
            user,
            guild_ids,
            read_states,
            relationships,
        })
    }
}

impl std::fmt::Debug for ReadyAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadyAssembler").finish_non_exhaustive()
    }
}
