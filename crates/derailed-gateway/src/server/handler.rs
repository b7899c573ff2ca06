//! WebSocket handler
//!
//! Upgrades the request and wires a reader task to the connection loop.

use crate::connection::Connection;
use crate::server::GatewayState;
use crate::session::SessionEvent;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::stream::SplitStream;
use futures_util::StreamExt;
use tokio::sync::{mpsc, watch};

/// Inbound frames buffered while the connection is busy
const FRAME_BUFFER_SIZE: usize = 64;

/// Session events buffered per connection
const EVENT_BUFFER_SIZE: usize = 256;

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let (sink, stream) = socket.split();

    let (frames_tx, frames_rx) = mpsc::channel(FRAME_BUFFER_SIZE);
    let (closed_tx, closed_rx) = watch::channel(false);
    let (events_tx, events_rx) = mpsc::channel::<SessionEvent>(EVENT_BUFFER_SIZE);

    tracing::info!("WebSocket connection established");

    let reader = tokio::spawn(read_frames(stream, frames_tx, closed_tx));

    Connection::new(state, sink, events_tx)
        .run(frames_rx, closed_rx, events_rx)
        .await;

    reader.abort();
}

/// Forward data frames to the connection until the client goes away
async fn read_frames(
    mut stream: SplitStream<WebSocket>,
    frames: mpsc::Sender<Message>,
    closed: watch::Sender<bool>,
) {
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(frame)) => {
                tracing::debug!(?frame, "Client sent close");
                break;
            }
            // Pong is handled automatically by axum
            Ok(Message::Ping(_) | Message::Pong(_)) => {}
            Ok(message) => {
                if frames.send(message).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "WebSocket read error");
                break;
            }
        }
    }

    closed.send_replace(true);
}
