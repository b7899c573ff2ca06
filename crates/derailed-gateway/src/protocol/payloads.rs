//! Payload structures for gateway messages

use derailed_core::{ReadState, Relationship, Snowflake, User};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Hello payload (op=1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

impl HelloPayload {
    #[must_use]
    pub const fn new(heartbeat_interval: u64) -> Self {
        Self { heartbeat_interval }
    }
}

/// Inbound ready request (op=2)
///
/// `op` has already been checked by the router; only `d` is validated here.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReadyRequest {
    #[serde(default)]
    #[validate(required, nested)]
    pub d: Option<ReadyData>,
}

/// Body of a ready request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReadyData {
    #[serde(default)]
    #[validate(required, length(min = 1, message = "token must not be empty"))]
    pub token: Option<String>,

    /// Compress every frame after this one
    #[serde(default)]
    pub compress: bool,
}

/// Ready reply payload (op=2)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyPayload {
    pub session_id: String,
    pub user: UserPayload,
    pub guild_ids: Vec<Snowflake>,
    pub read_states: Vec<ReadState>,
    pub relationships: Vec<Relationship>,
}

/// The authenticated user as sent to its own client
///
/// Built field by field from [`User`]; the stored password has no slot here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPayload {
    pub id: Snowflake,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub banner: Option<String>,
    pub flags: i64,
    pub bot: bool,
    pub system: bool,
    pub email: String,
}

impl From<&User> for UserPayload {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            avatar: user.avatar.clone(),
            banner: user.banner.clone(),
            flags: user.flags,
            bot: user.bot,
            system: user.system,
            email: user.email.clone(),
        }
    }
}
