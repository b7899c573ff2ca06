//! Connection event loop
//!
//! One task per socket. Inbound frames, session events and the heartbeat
//! deadline are merged with `select!`, so state changes and socket writes
//! happen in the order their events are applied.

use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::SinkExt;
use serde_json::Value;
use tokio::sync::{mpsc, watch};

use super::{ConnectionState, EstablishedSession};
use crate::codec::{self, Compressor};
use crate::handlers::{self, HandlerError};
use crate::heartbeat::HeartbeatMonitor;
use crate::protocol::{truncate_reason, GatewayMessage, HelloPayload, OpCode, ReadyPayload, UserPayload};
use crate::server::GatewayState;
use crate::session::{SessionEvent, SessionInit, SessionKind};

/// Why the event loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    /// Server closes the socket with this code and reason
    Close { code: u16, reason: String },
    /// Client went away; nothing left to send
    Disconnected,
}

impl Exit {
    fn heartbeat_timeout() -> Self {
        Self::Close {
            code: close_code::NORMAL,
            reason: "heartbeat_timeout".to_string(),
        }
    }
}

impl From<HandlerError> for Exit {
    fn from(err: HandlerError) -> Self {
        let code = err
            .to_close_code()
            .map_or(close_code::ERROR, u16::from);

        Self::Close {
            code,
            reason: err.close_reason(),
        }
    }
}

/// A single gateway connection
pub struct Connection {
    gateway: GatewayState,
    sink: SplitSink<WebSocket, Message>,
    state: ConnectionState,
    heartbeat: HeartbeatMonitor,
    /// Handed to session actors as their back-reference
    events: mpsc::Sender<SessionEvent>,
}

impl Connection {
    pub fn new(
        gateway: GatewayState,
        sink: SplitSink<WebSocket, Message>,
        events: mpsc::Sender<SessionEvent>,
    ) -> Self {
        let heartbeat = HeartbeatMonitor::new(gateway.heartbeat_config());
        let state = ConnectionState::new(heartbeat.interval_ms());

        Self {
            gateway,
            sink,
            state,
            heartbeat,
            events,
        }
    }

    /// Drive the connection until it closes
    pub async fn run(
        mut self,
        mut frames: mpsc::Receiver<Message>,
        mut closed: watch::Receiver<bool>,
        mut events: mpsc::Receiver<SessionEvent>,
    ) {
        let exit = match self.open().await {
            Ok(()) => self.event_loop(&mut frames, &mut closed, &mut events).await,
            Err(exit) => exit,
        };

        self.shutdown(exit).await;
    }

    /// Send Hello and arm the heartbeat
    async fn open(&mut self) -> Result<(), Exit> {
        let hello = HelloPayload::new(self.state.heartbeat_interval());
        let message = GatewayMessage::hello(&hello).map_err(|e| internal(&e))?;
        self.send(&message).await?;
        self.heartbeat.arm();

        tracing::debug!(heartbeat_interval = hello.heartbeat_interval, "Hello sent");
        Ok(())
    }

    async fn event_loop(
        &mut self,
        frames: &mut mpsc::Receiver<Message>,
        closed: &mut watch::Receiver<bool>,
        events: &mut mpsc::Receiver<SessionEvent>,
    ) -> Exit {
        loop {
            let step = tokio::select! {
                frame = frames.recv() => match frame {
                    Some(frame) => self.on_frame(frame, closed).await,
                    None => Err(Exit::Disconnected),
                },
                Some(event) = events.recv() => self.on_session_event(event).await,
                () = self.heartbeat.expired() => {
                    tracing::info!(session_id = ?self.session_id(), "Heartbeat deadline missed");
                    Err(Exit::heartbeat_timeout())
                }
            };

            if let Err(exit) = step {
                return exit;
            }
        }
    }

    async fn on_frame(&mut self, frame: Message, closed: &mut watch::Receiver<bool>) -> Result<(), Exit> {
        let decoded = match frame {
            Message::Text(text) => codec::decode_text(&text),
            Message::Binary(bytes) => codec::decode_binary(&bytes),
            _ => return Ok(()),
        };

        let value = decoded.map_err(|e| self.fail(e.into()))?;
        let op = handlers::route(&value).map_err(|e| self.fail(e))?;

        match op {
            OpCode::Ready => self.on_ready(value, closed).await,
            _ => Err(self.fail(HandlerError::InvalidOpcode)),
        }
    }

    async fn on_ready(&mut self, frame: Value, closed: &mut watch::Receiver<bool>) -> Result<(), Exit> {
        if let Some(session) = self.state.session() {
            tracing::debug!(session_id = %session.session_id, "Ready on established session ignored");
            return Ok(());
        }

        let args = handlers::parse_ready(frame).map_err(|e| self.fail(e))?;
        // Dropped with the assembly if the connection goes away first
        let compressor = args.compress.then(Compressor::new);

        let snapshot = tokio::select! {
            result = self.gateway.assembler().assemble(&args.token) => {
                result.map_err(|e| self.fail(e))?
            }
            () = self.heartbeat.expired() => {
                tracing::info!("Heartbeat deadline missed during ready");
                return Err(Exit::heartbeat_timeout());
            }
            () = socket_closed(closed) => {
                tracing::debug!("Socket closed during ready");
                return Err(Exit::Disconnected);
            }
        };

        let session_id = self.gateway.snowflake().generate().to_string();
        let user_id = snapshot.user.id;

        let compress = compressor.is_some();
        let bound = self.state.establish(
            EstablishedSession {
                session_id: session_id.clone(),
                user_id,
            },
            compressor,
        );
        if !bound {
            return Err(internal(&"session already bound"));
        }

        // Register only after the state owns the session
        self.gateway.registry().start(
            SessionKind::Session,
            session_id.clone(),
            SessionInit {
                session_id: session_id.clone(),
                user_id,
                guild_ids: snapshot.guild_ids.clone(),
                connection: self.events.clone(),
            },
        );

        let payload = ReadyPayload {
            session_id: session_id.clone(),
            user: UserPayload::from(&snapshot.user),
            guild_ids: snapshot.guild_ids,
            read_states: snapshot.read_states,
            relationships: snapshot.relationships,
        };
        let sequence = self.state.next_sequence();
        let message = GatewayMessage::ready(sequence, &payload).map_err(|e| internal(&e))?;
        self.send(&message).await?;

        tracing::info!(
            session_id = %session_id,
            user_id = %user_id,
            compress,
            "Session established"
        );
        Ok(())
    }

    async fn on_session_event(&mut self, event: SessionEvent) -> Result<(), Exit> {
        match event {
            SessionEvent::Dispatch { t, d } => {
                if !self.state.is_established() {
                    return Ok(());
                }
                let sequence = self.state.next_sequence();
                self.send(&GatewayMessage::dispatch(t, sequence, d)).await
            }
            SessionEvent::IdentityDeleted => {
                if let Some(session) = self.state.take_session() {
                    let registry = self.gateway.registry();
                    registry.stop(SessionKind::Session, &session.session_id);
                    registry.stop(SessionKind::User, &session.user_id.to_string());

                    tracing::info!(
                        session_id = %session.session_id,
                        user_id = %session.user_id,
                        "Identity deleted"
                    );
                }
                Err(HandlerError::IdentityDeleted.into())
            }
        }
    }

    /// Encode with the connection's compressor and write one frame
    async fn send(&mut self, message: &GatewayMessage) -> Result<(), Exit> {
        let frame = codec::encode_frame(message, self.state.compressor_mut()).map_err(|e| internal(&e))?;

        self.sink.send(frame).await.map_err(|e| {
            tracing::debug!(error = %e, "Socket write failed");
            Exit::Disconnected
        })
    }

    /// Cancel the heartbeat, deregister, then close the socket
    async fn shutdown(mut self, exit: Exit) {
        self.heartbeat.cancel();

        if let Some(session) = self.state.take_session() {
            self.gateway
                .registry()
                .stop(SessionKind::Session, &session.session_id);
        }

        match exit {
            Exit::Close { code, reason } => {
                tracing::info!(close_code = code, reason = %reason, "Closing connection");
                let frame = CloseFrame {
                    code,
                    reason: truncate_reason(reason).into(),
                };
                if let Err(e) = self.sink.send(Message::Close(Some(frame))).await {
                    tracing::debug!(error = %e, "Close frame not delivered");
                }
            }
            Exit::Disconnected => {
                tracing::info!("Client disconnected");
            }
        }

        let _ = self.sink.close().await;
    }

    fn session_id(&self) -> Option<&str> {
        self.state.session().map(|s| s.session_id.as_str())
    }

    fn fail(&self, err: HandlerError) -> Exit {
        tracing::debug!(
            session_id = ?self.session_id(),
            error = %err,
            "Request rejected"
        );
        err.into()
    }
}

/// Resolves once the reader has seen the socket close
async fn socket_closed(closed: &mut watch::Receiver<bool>) {
    // An error means the reader is gone, which is the same thing
    let _ = closed.wait_for(|closed| *closed).await;
}

fn internal(err: &impl std::fmt::Display) -> Exit {
    tracing::error!(error = %err, "Internal gateway error");
    HandlerError::Internal(err.to_string()).into()
}
