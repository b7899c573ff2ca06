//! Session actor
//!
//! One tokio task per session. It receives commands from in-process
//! publishers and relays them to the connection that owns the session.

use derailed_core::Snowflake;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Capacity of a session actor's command inbox
const INBOX_SIZE: usize = 256;

/// Event delivered from a session actor to its connection
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Relay to the client as an op 0 frame named `t`
    Dispatch { t: String, d: Value },
    /// The account behind the session no longer exists
    IdentityDeleted,
}

/// Command accepted by a session actor
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Dispatch { t: String, d: Value },
    IdentityDeleted,
    Stop,
}

/// Everything a session actor is seeded with
#[derive(Debug, Clone)]
pub struct SessionInit {
    pub session_id: String,
    pub user_id: Snowflake,
    pub guild_ids: Vec<Snowflake>,
    /// Back-reference to the owning connection
    pub connection: mpsc::Sender<SessionEvent>,
}

/// Handle to a running session actor
#[derive(Debug, Clone)]
pub struct SessionHandle {
    session_id: String,
    user_id: Snowflake,
    guild_ids: Vec<Snowflake>,
    commands: mpsc::Sender<SessionCommand>,
    abort: AbortHandle,
}

impl SessionHandle {
    /// Spawn the actor task for `init`
    pub(crate) fn spawn(init: SessionInit) -> Self {
        let (commands, inbox) = mpsc::channel(INBOX_SIZE);
        let session_id = init.session_id.clone();
        let user_id = init.user_id;
        let guild_ids = init.guild_ids.clone();

        let task = tokio::spawn(run(init, inbox));

        Self {
            session_id,
            user_id,
            guild_ids,
            commands,
            abort: task.abort_handle(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn user_id(&self) -> Snowflake {
        self.user_id
    }

    pub fn guild_ids(&self) -> &[Snowflake] {
        &self.guild_ids
    }

    pub fn in_guild(&self, guild_id: Snowflake) -> bool {
        self.guild_ids.contains(&guild_id)
    }

    /// Queue a dispatch; false if the actor is gone or its inbox is full
    pub fn dispatch(&self, t: impl Into<String>, d: Value) -> bool {
        self.commands
            .try_send(SessionCommand::Dispatch { t: t.into(), d })
            .is_ok()
    }

    /// Tell the connection its identity was deleted
    pub async fn identity_deleted(&self) -> bool {
        self.commands
            .send(SessionCommand::IdentityDeleted)
            .await
            .is_ok()
    }

    /// Stop the actor, aborting it if the inbox cannot take the request
    pub fn stop(&self) {
        if self.commands.try_send(SessionCommand::Stop).is_err() {
            self.abort.abort();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

async fn run(init: SessionInit, mut inbox: mpsc::Receiver<SessionCommand>) {
    tracing::debug!(session_id = %init.session_id, user_id = %init.user_id, "Session actor started");

    while let Some(command) = inbox.recv().await {
        let event = match command {
            SessionCommand::Dispatch { t, d } => SessionEvent::Dispatch { t, d },
            SessionCommand::IdentityDeleted => SessionEvent::IdentityDeleted,
            SessionCommand::Stop => break,
        };

        if init.connection.send(event).await.is_err() {
            tracing::debug!(session_id = %init.session_id, "Connection gone, session actor exiting");
            break;
        }
    }

    tracing::debug!(session_id = %init.session_id, "Session actor stopped");
}
