//! Fixed-window send quota.
//!
//! A window opens with the first send after the previous one has expired
//! and lasts [`RateLimit::window`]. At most [`RateLimit::max_messages`]
//! frames go out per window; the next caller waits for the remainder of
//! the window, after which a fresh window starts with an empty count.
//! There is no continuous refill.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::debug;

/// Send quota configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RateLimit {
    /// Length of one window.
    pub window: Duration,
    /// Frames allowed per window.
    pub max_messages: u32,
}

impl RateLimit {
    /// Create a quota of `max_messages` per `window`.
    pub fn new(window: Duration, max_messages: u32) -> Self {
        Self {
            window,
            max_messages,
        }
    }
}

/// Window accounting for a single connection.
///
/// Not synchronized; the sender keeps it behind the same lock as the
/// stream so that the check and the write happen as one step.
#[derive(Debug)]
pub(crate) struct RateLimiter {
    limit: RateLimit,
    window_start: Option<Instant>,
    sent_in_window: u32,
}

impl RateLimiter {
    pub(crate) fn new(limit: RateLimit) -> Self {
        Self {
            limit,
            window_start: None,
            sent_in_window: 0,
        }
    }

    /// Wait until one more frame may be sent in the current window.
    pub(crate) async fn acquire(&mut self) {
        let time_left = self
            .window_start
            .map(|start| self.limit.window.saturating_sub(start.elapsed()))
            .unwrap_or(Duration::ZERO);

        if time_left.is_zero() {
            self.start_window();
        } else if self.sent_in_window >= self.limit.max_messages {
            debug!(
                "send quota of {} reached, waiting {:?}",
                self.limit.max_messages, time_left
            );
            sleep(time_left).await;
            self.start_window();
        }
    }

    /// Count a frame that was written successfully.
    pub(crate) fn record(&mut self) {
        self.sent_in_window += 1;
    }

    #[cfg(test)]
    pub(crate) fn sent_in_window(&self) -> u32 {
        self.sent_in_window
    }

    fn start_window(&mut self) {
        self.window_start = Some(Instant::now());
        self.sent_in_window = 0;
    }
}
