//! Test helpers for integration tests
//!
//! Spawns the gateway on an ephemeral port and provides a WebSocket client
//! that understands the gateway's framing, including the compressed stream.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use derailed_common::{HeartbeatConfig, TokenService};
use derailed_core::{Snowflake, SnowflakeGenerator};
use derailed_gateway::handlers::ReadyAssembler;
use derailed_gateway::session::SessionRegistry;
use derailed_gateway::{create_app, serve, GatewayState};
use flate2::{Decompress, FlushDecompress};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::MemoryStore;
use crate::wire::{WireMessage, WireSocket};

/// Secret used to sign test tokens
pub const TEST_SECRET: &str = "integration-test-secret";

/// How long to wait for any single frame
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Gateway instance that manages its own lifecycle
pub struct TestGateway {
    pub addr: SocketAddr,
    pub store: Arc<MemoryStore>,
    pub tokens: TokenService,
    pub registry: Arc<SessionRegistry>,
    _handle: JoinHandle<()>,
}

impl TestGateway {
    /// Start a gateway with production heartbeat timing
    pub async fn start() -> Result<Self> {
        Self::start_with_heartbeat(HeartbeatConfig::default()).await
    }

    /// Start a gateway with custom heartbeat timing
    pub async fn start_with_heartbeat(heartbeat: HeartbeatConfig) -> Result<Self> {
        let store = MemoryStore::new();
        let tokens = TokenService::new(TEST_SECRET, 3600);
        let registry = Arc::new(SessionRegistry::new());

        let state = GatewayState::new(
            ReadyAssembler::new(tokens.clone(), store.repositories()),
            registry.clone(),
            SnowflakeGenerator::new(1),
            heartbeat,
        );

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            serve(listener, create_app(state)).await.ok();
        });

        Ok(Self {
            addr,
            store,
            tokens,
            registry,
            _handle: handle,
        })
    }

    /// Base URL for HTTP requests
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Sign a token for `device_id`
    pub fn token_for(&self, device_id: Snowflake) -> String {
        self.tokens.issue(device_id).expect("Failed to issue token")
    }

    /// Open a WebSocket connection to `/gateway`
    pub async fn connect(&self) -> Result<GatewayClient> {
        let ws = WireSocket::connect(self.addr, "/gateway").await?;
        Ok(GatewayClient { ws, inflater: None })
    }

    /// Connect and consume the Hello frame
    pub async fn connect_and_hello(&self) -> Result<(GatewayClient, Value)> {
        let mut client = self.connect().await?;
        let hello = client.recv().await?.into_value();
        if hello["op"] != 1 {
            bail!("expected Hello, got {hello}");
        }
        Ok((client, hello))
    }

    /// Wait until `check` holds, polling the registry
    pub async fn wait_until(&self, check: impl Fn(&SessionRegistry) -> bool) -> Result<()> {
        tokio::time::timeout(RECV_TIMEOUT, async {
            while !check(&self.registry) {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .map_err(|_| anyhow!("condition not reached in time"))
    }
}

/// A decoded server frame
#[derive(Debug, Clone)]
pub enum Frame {
    Text(Value),
    Compressed(Value),
}

impl Frame {
    pub fn is_compressed(&self) -> bool {
        matches!(self, Self::Compressed(_))
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::Text(v) | Self::Compressed(v) => v,
        }
    }
}

/// WebSocket client speaking the gateway protocol
pub struct GatewayClient {
    ws: WireSocket,
    /// One inflater for the whole connection, created on the first binary frame
    inflater: Option<Decompress>,
}

impl GatewayClient {
    pub async fn send_json(&mut self, value: &Value) -> Result<()> {
        self.send_text(&value.to_string()).await
    }

    pub async fn send_text(&mut self, raw: &str) -> Result<()> {
        self.ws.send_text(raw).await
    }

    pub async fn send_binary(&mut self, raw: Vec<u8>) -> Result<()> {
        self.ws.send_binary(&raw).await
    }

    /// Send a ready request
    pub async fn send_ready(&mut self, token: &str, compress: bool) -> Result<()> {
        self.send_json(&json!({"op": 2, "d": {"token": token, "compress": compress}}))
            .await
    }

    /// Send a ready request and return the reply
    pub async fn ready(&mut self, token: &str, compress: bool) -> Result<Frame> {
        self.send_ready(token, compress).await?;
        self.recv().await
    }

    /// Next data frame, inflating binary frames through the connection's stream
    pub async fn recv(&mut self) -> Result<Frame> {
        loop {
            match self.next_message().await? {
                WireMessage::Text(text) => return Ok(Frame::Text(serde_json::from_str(&text)?)),
                WireMessage::Binary(bytes) => {
                    let inflater = self.inflater.get_or_insert_with(|| Decompress::new(true));
                    let text = inflate(inflater, &bytes)?;
                    return Ok(Frame::Compressed(serde_json::from_str(&text)?));
                }
                WireMessage::Close(frame) => bail!("connection closed: {frame:?}"),
                WireMessage::Ping(_) | WireMessage::Pong(_) => {}
            }
        }
    }

    /// Wait for the server's close frame and return its code and reason
    pub async fn expect_close(&mut self) -> Result<(u16, String)> {
        loop {
            match self.next_message().await? {
                WireMessage::Close(Some(close)) => return Ok(close),
                WireMessage::Close(None) => bail!("close frame without code"),
                WireMessage::Text(text) => bail!("expected close, got text {text}"),
                WireMessage::Binary(_) => bail!("expected close, got binary frame"),
                WireMessage::Ping(_) | WireMessage::Pong(_) => {}
            }
        }
    }

    /// Assert nothing but pings arrive within `window`
    pub async fn expect_silence(&mut self, window: Duration) -> Result<()> {
        match tokio::time::timeout(window, self.ws.read()).await {
            Err(_) => Ok(()),
            Ok(Ok(WireMessage::Ping(_) | WireMessage::Pong(_))) => Ok(()),
            Ok(other) => bail!("expected silence, got {other:?}"),
        }
    }

    /// Send a normal close and drop the socket
    pub async fn close(mut self) -> Result<()> {
        self.ws.send_close(1000).await
    }

    async fn next_message(&mut self) -> Result<WireMessage> {
        tokio::time::timeout(RECV_TIMEOUT, self.ws.read())
            .await
            .map_err(|_| anyhow!("timed out waiting for a frame"))?
    }
}

/// Inflate one full-flushed chunk of a continuing zlib stream
pub fn inflate(stream: &mut Decompress, chunk: &[u8]) -> Result<String> {
    let mut out = Vec::with_capacity(chunk.len() * 4 + 1024);
    let start = stream.total_in();

    loop {
        let offset = (stream.total_in() - start) as usize;
        let before_out = out.len();
        stream.decompress_vec(&chunk[offset..], &mut out, FlushDecompress::Sync)?;

        let consumed = (stream.total_in() - start) as usize;
        let progressed = consumed > offset || out.len() > before_out;
        if consumed == chunk.len() && (out.len() < out.capacity() || !progressed) {
            break;
        }
        if !progressed {
            bail!("inflate stalled");
        }
        out.reserve(out.capacity());
    }

    Ok(String::from_utf8(out)?)
}
