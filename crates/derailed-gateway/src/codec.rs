//! Payload codec
//!
//! Encodes outbound messages as JSON text frames, or as binary frames fed
//! through one zlib stream that lives as long as the connection.

use axum::extract::ws::Message;
use flate2::{Compress, Compression, FlushCompress};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Codec errors
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Frame is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Compression error: {0}")]
    Compress(#[from] flate2::CompressError),

    #[error("Compressor stalled")]
    Stalled,
}

/// Connection-scoped zlib compressor
///
/// Each frame is flushed with a full flush so the client can inflate it on
/// arrival. The dictionary state carries over between frames.
pub struct Compressor {
    inner: Compress,
}

impl Compressor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Compress::new(Compression::default(), true),
        }
    }

    /// Push `input` through the stream and return the bytes it produced
    pub fn compress(&mut self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(input.len() / 2 + 64);
        let start = self.inner.total_in();

        loop {
            let offset = (self.inner.total_in() - start) as usize;
            let before_out = out.len();
            self.inner
                .compress_vec(&input[offset..], &mut out, FlushCompress::Full)?;

            let consumed = (self.inner.total_in() - start) as usize;
            let progressed = consumed > offset || out.len() > before_out;
            if consumed == input.len() && (out.len() < out.capacity() || !progressed) {
                return Ok(out);
            }
            if !progressed {
                return Err(CodecError::Stalled);
            }
            out.reserve(out.capacity().max(64));
        }
    }

    /// Bytes fed into the stream so far
    #[must_use]
    pub fn total_in(&self) -> u64 {
        self.inner.total_in()
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Compressor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compressor")
            .field("total_in", &self.inner.total_in())
            .field("total_out", &self.inner.total_out())
            .finish()
    }
}

/// Serialize a value to JSON text
pub fn encode_text<T: Serialize>(value: &T) -> Result<String, CodecError> {
    Ok(serde_json::to_string(value)?)
}

/// Parse raw frame text into an untyped JSON value
pub fn decode_text(raw: &str) -> Result<Value, CodecError> {
    Ok(serde_json::from_str(raw)?)
}

/// Parse a binary frame as UTF-8 JSON
pub fn decode_binary(raw: &[u8]) -> Result<Value, CodecError> {
    decode_text(std::str::from_utf8(raw)?)
}

/// Encode a value as a socket frame
///
/// Without a compressor this is a text frame. With one it is a binary frame
/// holding the next chunk of the compressed stream.
pub fn encode_frame<T: Serialize>(
    value: &T,
    compressor: Option<&mut Compressor>,
) -> Result<Message, CodecError> {
    let json = encode_text(value)?;

    match compressor {
        Some(compressor) => Ok(Message::Binary(compressor.compress(json.as_bytes())?.into())),
        None => Ok(Message::Text(json.into())),
    }
}
