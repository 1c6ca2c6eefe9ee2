//! Line-oriented framing for the chat protocol.
//!
//! [`LineCodec`] splits the inbound byte stream on `\n` (stripping one
//! trailing `\r`) and frames outbound lines with `\r\n`, truncating them to
//! the protocol's 512-byte frame ceiling.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::ProtocolError;

/// Maximum outbound frame length, terminator included.
pub const MAX_FRAME_LEN: usize = 512;

/// Maximum outbound payload length, i.e. [`MAX_FRAME_LEN`] minus `\r\n`.
pub const MAX_LINE_LEN: usize = MAX_FRAME_LEN - 2;

/// Default limit for a single inbound frame: the IRCv3 tag budget plus
/// a classic 512-byte body.
pub const MAX_INBOUND_LEN: usize = 8191 + MAX_FRAME_LEN;

/// Cut `line` to at most [`MAX_LINE_LEN`] bytes.
///
/// The cut is byte-exact and may split a multi-byte character; the frame
/// limit is a byte limit on the wire.
pub fn truncate_line(line: &[u8]) -> &[u8] {
    &line[..line.len().min(MAX_LINE_LEN)]
}

/// Codec for `\r\n`-terminated protocol frames.
#[derive(Clone, Debug)]
pub struct LineCodec {
    next_index: usize,
    max_len: usize,
}

impl LineCodec {
    /// Create a codec with the default inbound limit.
    pub fn new() -> Self {
        Self::with_max_len(MAX_INBOUND_LEN)
    }

    /// Create a codec rejecting inbound frames longer than `max_len` bytes.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
        }
    }

    fn frame_to_string(frame: &[u8]) -> String {
        let frame = frame.strip_suffix(b"\n").unwrap_or(frame);
        let frame = frame.strip_suffix(b"\r").unwrap_or(frame);
        String::from_utf8_lossy(frame).into_owned()
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, ProtocolError> {
        let search_from = self.next_index.min(src.len());
        match src[search_from..].iter().position(|&b| b == b'\n') {
            Some(offset) => {
                let end = search_from + offset + 1;
                self.next_index = 0;
                if end - 1 > self.max_len {
                    return Err(ProtocolError::MessageTooLong {
                        actual: end - 1,
                        limit: self.max_len,
                    });
                }
                let frame = src.split_to(end);
                Ok(Some(Self::frame_to_string(&frame)))
            }
            None if src.len() > self.max_len => Err(ProtocolError::MessageTooLong {
                actual: src.len(),
                limit: self.max_len,
            }),
            None => {
                self.next_index = src.len();
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>, ProtocolError> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }
        if src.is_empty() {
            return Ok(None);
        }
        // Unterminated final line
        self.next_index = 0;
        let frame = src.split();
        Ok(Some(Self::frame_to_string(&frame)))
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        let payload = truncate_line(line.as_bytes());
        dst.reserve(payload.len() + 2);
        dst.put_slice(payload);
        dst.put_slice(b"\r\n");
        Ok(())
    }
}
