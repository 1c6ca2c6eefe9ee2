//! Rate-limited write path.

use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::SinkExt;
use tokio::io::AsyncWrite;
use tokio::sync::Mutex;
use tokio_util::codec::FramedWrite;
use tracing::debug;

use crate::error::Result;
use crate::line::LineCodec;
use crate::ratelimit::{RateLimit, RateLimiter};

pub(crate) type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

struct WriteState {
    framed: FramedWrite<BoxedWriter, LineCodec>,
    limiter: Option<RateLimiter>,
}

/// Serializes outbound frames onto the write half of the connection.
///
/// The quota check and the write run under one lock, so concurrent callers
/// are ordered and never both spend the last slot of a window.
pub(crate) struct Sender {
    state: Mutex<WriteState>,
    sent: AtomicU64,
}

impl Sender {
    pub(crate) fn new(writer: BoxedWriter, rate_limit: Option<RateLimit>) -> Self {
        Self {
            state: Mutex::new(WriteState {
                framed: FramedWrite::new(writer, LineCodec::new()),
                limiter: rate_limit.map(RateLimiter::new),
            }),
            sent: AtomicU64::new(0),
        }
    }

    /// Write one line, truncated to the frame limit and terminated by CRLF.
    ///
    /// Waits first if the send quota for the current window is used up.
    pub(crate) async fn send(&self, line: String) -> Result<()> {
        let mut state = self.state.lock().await;
        if let Some(limiter) = state.limiter.as_mut() {
            limiter.acquire().await;
        }

        debug!("→ {}", redact(&line));
        state.framed.send(line).await?;

        if let Some(limiter) = state.limiter.as_mut() {
            limiter.record();
        }
        self.sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Number of frames written successfully.
    pub(crate) fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }
}

/// Hide the secret of a `PASS` line from logs.
fn redact(line: &str) -> &str {
    if line.starts_with("PASS ") {
        "PASS ***"
    } else {
        line
    }
}
