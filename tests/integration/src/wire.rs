//! Minimal WebSocket client framing
//!
//! The gateway closes with application codes 5000-5005, which sit outside the
//! ranges RFC 6455 lets a client library accept, so `tungstenite` rewrites them
//! to 1002. This client reads frames straight off the socket instead and hands
//! back exactly what the server sent.

use std::net::SocketAddr;

use anyhow::{bail, ensure, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::handshake::client::generate_key;

const OP_CONTINUATION: u8 = 0x0;
const OP_TEXT: u8 = 0x1;
const OP_BINARY: u8 = 0x2;
const OP_CLOSE: u8 = 0x8;
const OP_PING: u8 = 0x9;
const OP_PONG: u8 = 0xA;

/// A complete message as sent by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireMessage {
    Text(String),
    Binary(Vec<u8>),
    /// Close code and reason; `None` for an empty close payload
    Close(Option<(u16, String)>),
    Ping(Vec<u8>),
    Pong(Vec<u8>),
}

/// Client side of an upgraded connection
pub struct WireSocket {
    stream: TcpStream,
    buf: Vec<u8>,
}

impl WireSocket {
    /// Connect to `addr` and upgrade `path`
    pub async fn connect(addr: SocketAddr, path: &str) -> Result<Self> {
        let mut stream = TcpStream::connect(addr).await?;
        let request = format!(
            "GET {path} HTTP/1.1\r\n\
             Host: {addr}\r\n\
             Upgrade: websocket\r\n\
             Connection: Upgrade\r\n\
             Sec-WebSocket-Key: {}\r\n\
             Sec-WebSocket-Version: 13\r\n\r\n",
            generate_key()
        );
        stream.write_all(request.as_bytes()).await?;

        let mut socket = Self {
            stream,
            buf: Vec::new(),
        };

        let head_end = loop {
            if let Some(pos) = socket.buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
            socket.fill().await?;
        };
        let head = String::from_utf8_lossy(&socket.buf[..head_end]).into_owned();
        ensure!(
            head.starts_with("HTTP/1.1 101"),
            "upgrade refused: {}",
            head.lines().next().unwrap_or_default()
        );
        socket.buf.drain(..head_end);

        Ok(socket)
    }

    /// Read the next complete message, joining fragments
    pub async fn read(&mut self) -> Result<WireMessage> {
        let (mut fin, opcode, mut payload) = self.read_frame().await?;

        while !fin {
            let (next_fin, next_op, more) = self.read_frame().await?;
            ensure!(next_op == OP_CONTINUATION, "interleaved frame {next_op:#x}");
            payload.extend_from_slice(&more);
            fin = next_fin;
        }

        Ok(match opcode {
            OP_TEXT => WireMessage::Text(String::from_utf8(payload)?),
            OP_BINARY => WireMessage::Binary(payload),
            OP_CLOSE if payload.len() >= 2 => {
                let code = u16::from_be_bytes([payload[0], payload[1]]);
                let reason = String::from_utf8(payload[2..].to_vec())?;
                WireMessage::Close(Some((code, reason)))
            }
            OP_CLOSE => WireMessage::Close(None),
            OP_PING => WireMessage::Ping(payload),
            OP_PONG => WireMessage::Pong(payload),
            other => bail!("unexpected opcode {other:#x}"),
        })
    }

    pub async fn send_text(&mut self, text: &str) -> Result<()> {
        self.write_frame(OP_TEXT, text.as_bytes()).await
    }

    pub async fn send_binary(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_frame(OP_BINARY, bytes).await
    }

    /// Send a close frame with `code`
    pub async fn send_close(&mut self, code: u16) -> Result<()> {
        self.write_frame(OP_CLOSE, &code.to_be_bytes()).await
    }

    async fn read_frame(&mut self) -> Result<(bool, u8, Vec<u8>)> {
        self.fill_to(2).await?;
        let fin = self.buf[0] & 0x80 != 0;
        let opcode = self.buf[0] & 0x0F;
        let masked = self.buf[1] & 0x80 != 0;

        let (len, mut offset) = match self.buf[1] & 0x7F {
            126 => {
                self.fill_to(4).await?;
                (u64::from(u16::from_be_bytes([self.buf[2], self.buf[3]])), 4)
            }
            127 => {
                self.fill_to(10).await?;
                let mut raw = [0u8; 8];
                raw.copy_from_slice(&self.buf[2..10]);
                (u64::from_be_bytes(raw), 10)
            }
            short => (u64::from(short), 2),
        };

        let mask = if masked {
            self.fill_to(offset + 4).await?;
            let mut key = [0u8; 4];
            key.copy_from_slice(&self.buf[offset..offset + 4]);
            offset += 4;
            Some(key)
        } else {
            None
        };

        let len = usize::try_from(len)?;
        self.fill_to(offset + len).await?;
        let mut payload: Vec<u8> = self.buf.drain(..offset + len).skip(offset).collect();
        if let Some(key) = mask {
            apply_mask(&mut payload, key);
        }

        Ok((fin, opcode, payload))
    }

    /// Client frames are always masked
    async fn write_frame(&mut self, opcode: u8, payload: &[u8]) -> Result<()> {
        let mut frame = Vec::with_capacity(payload.len() + 14);
        frame.push(0x80 | opcode);

        match payload.len() {
            len @ 0..=125 => frame.push(0x80 | len as u8),
            len @ 126..=0xFFFF => {
                frame.push(0x80 | 126);
                frame.extend_from_slice(&(len as u16).to_be_bytes());
            }
            len => {
                frame.push(0x80 | 127);
                frame.extend_from_slice(&(len as u64).to_be_bytes());
            }
        }

        let key: [u8; 4] = rand::random();
        frame.extend_from_slice(&key);

        let start = frame.len();
        frame.extend_from_slice(payload);
        apply_mask(&mut frame[start..], key);

        self.stream.write_all(&frame).await?;
        Ok(())
    }

    async fn fill_to(&mut self, len: usize) -> Result<()> {
        while self.buf.len() < len {
            self.fill().await?;
        }
        Ok(())
    }

    async fn fill(&mut self) -> Result<()> {
        let mut chunk = [0u8; 8192];
        let n = self.stream.read(&mut chunk).await?;
        ensure!(n > 0, "stream ended");
        self.buf.extend_from_slice(&chunk[..n]);
        Ok(())
    }
}

fn apply_mask(bytes: &mut [u8], key: [u8; 4]) {
    for (i, byte) in bytes.iter_mut().enumerate() {
        *byte ^= key[i % 4];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_is_an_involution() {
        let key = [1, 2, 3, 4];
        let mut bytes = b"gateway".to_vec();
        apply_mask(&mut bytes, key);
        assert_ne!(bytes, b"gateway");
        apply_mask(&mut bytes, key);
        assert_eq!(bytes, b"gateway");
    }
}
