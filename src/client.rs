//! The protocol client.
//!
//! A [`Client`] owns one connection. Attaching a stream with
//! [`Client::connect`] spawns a background reader that answers keepalive
//! probes and forwards chat messages; every other operation goes through
//! the rate-limited sender.
//!
//! ```no_run
//! use std::time::Duration;
//! use slirc_tmi::{Client, ClientConfig, RateLimit};
//!
//! # async fn run(stream: tokio::net::TcpStream) -> slirc_tmi::error::Result<()> {
//! let config = ClientConfig {
//!     rate_limit: Some(RateLimit::new(Duration::from_secs(30), 20)),
//!     ..ClientConfig::default()
//! };
//! let mut client = Client::new(config);
//! client.connect(stream)?;
//! client.authenticate("mybot", "oauth:token").await?;
//! client.request_capabilities(&["twitch.tv/tags"]).await?;
//! client.join("#mychannel").await?;
//!
//! while let Some(msg) = client.next_message().await {
//!     if msg.content == "!ping" {
//!         client.say("pong").await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{ProtocolError, Result};
use crate::message::Message;
use crate::ratelimit::RateLimit;
use crate::reader::{Overflow, Reader};
use crate::sender::Sender;

/// Client configuration, fixed before connecting.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClientConfig {
    /// Send quota; `None` disables rate limiting.
    pub rate_limit: Option<RateLimit>,
    /// Messages the reader may queue ahead of the consumer. Values below
    /// one are treated as one.
    pub queue_capacity: usize,
    /// Behavior when the queue is full.
    pub overflow: Overflow,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rate_limit: None,
            queue_capacity: 1,
            overflow: Overflow::Block,
        }
    }
}

/// The consumer side of a client's message queue.
///
/// Yields messages in wire order and ends once the connection is gone.
/// Also usable as a [`Stream`].
#[derive(Debug)]
pub struct Messages {
    rx: mpsc::Receiver<Message>,
}

impl Messages {
    /// Receive the next message; `None` once the connection has ended.
    pub async fn recv(&mut self) -> Option<Message> {
        self.rx.recv().await
    }
}

impl Stream for Messages {
    type Item = Message;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Message>> {
        self.rx.poll_recv(cx)
    }
}

/// A chat protocol client bound to at most one connection.
pub struct Client {
    config: ClientConfig,
    sender: Option<Arc<Sender>>,
    messages: Option<Messages>,
    reader: Option<JoinHandle<()>>,
    channel: Option<String>,
    terminated: bool,
}

impl Client {
    /// Create an unconnected client.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            sender: None,
            messages: None,
            reader: None,
            channel: None,
            terminated: false,
        }
    }

    /// Attach `stream` and start the background reader.
    ///
    /// Must be called from within a Tokio runtime. A client connects once;
    /// a second call fails with [`ProtocolError::AlreadyConnected`].
    pub fn connect<S>(&mut self, stream: S) -> Result<()>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        if self.sender.is_some() || self.terminated {
            return Err(ProtocolError::AlreadyConnected);
        }

        let (read_half, write_half) = tokio::io::split(stream);
        let sender = Arc::new(Sender::new(Box::new(write_half), self.config.rate_limit));
        let (tx, rx) = mpsc::channel(self.config.queue_capacity.max(1));

        let reader = Reader::new(Box::new(read_half), Arc::clone(&sender), tx, self.config.overflow);
        self.reader = Some(tokio::spawn(reader.run()));
        self.sender = Some(sender);
        self.messages = Some(Messages { rx });
        debug!("connected");
        Ok(())
    }

    /// Send `QUIT`. The client cannot be used afterwards, whether or not
    /// the write succeeded.
    pub async fn disconnect(&mut self) -> Result<()> {
        let result = self.send_line("QUIT").await;
        self.terminated = true;
        result
    }

    /// Request protocol capabilities with one `CAP REQ`.
    pub async fn request_capabilities<S: AsRef<str>>(&self, capabilities: &[S]) -> Result<()> {
        let list: Vec<&str> = capabilities.iter().map(AsRef::as_ref).collect();
        self.send_line(format!("CAP REQ :{}", list.join(" "))).await
    }

    /// Log in with `PASS` followed by `NICK`.
    pub async fn authenticate(&self, nick: &str, pass: &str) -> Result<()> {
        self.send_line(format!("PASS {}", pass)).await?;
        self.send_line(format!("NICK {}", nick)).await
    }

    /// Join `channel` and remember it as the target for [`Client::say`].
    pub async fn join(&mut self, channel: &str) -> Result<()> {
        self.send_line(format!("JOIN {}", channel)).await?;
        self.channel = Some(channel.to_string());
        Ok(())
    }

    /// Send a chat message to the joined channel.
    pub async fn say(&self, text: &str) -> Result<()> {
        let channel = self.channel.as_deref().ok_or(ProtocolError::NotJoined)?;
        self.send_line(format!("PRIVMSG {} :{}", channel, text)).await
    }

    /// Send a raw protocol line. CRLF is appended and lines over 510 bytes
    /// are truncated.
    pub async fn send_line(&self, line: impl Into<String>) -> Result<()> {
        self.sender()?.send(line.into()).await
    }

    /// Take the message sequence. Only the first call returns `Some`.
    pub fn messages(&mut self) -> Option<Messages> {
        self.messages.take()
    }

    /// Receive the next message, unless the sequence was taken with
    /// [`Client::messages`].
    pub async fn next_message(&mut self) -> Option<Message> {
        self.messages.as_mut()?.recv().await
    }

    /// Frames sent successfully so far.
    pub fn message_count(&self) -> u64 {
        self.sender.as_ref().map_or(0, |s| s.sent())
    }

    /// The channel joined last, if any.
    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    /// Settings the client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn sender(&self) -> Result<&Sender> {
        if self.terminated {
            return Err(ProtocolError::Disconnected);
        }
        self.sender.as_deref().ok_or(ProtocolError::NotConnected)
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_operations_require_connection() {
        let mut client = Client::new(ClientConfig::default());
        assert!(matches!(
            client.say("hi").await,
            Err(ProtocolError::NotJoined)
        ));
        assert!(matches!(
            client.send_line("PING").await,
            Err(ProtocolError::NotConnected)
        ));
        assert!(matches!(
            client.join("#bar").await,
            Err(ProtocolError::NotConnected)
        ));
        assert_eq!(client.channel(), None);
        assert_eq!(client.message_count(), 0);
        assert!(client.next_message().await.is_none());
    }

    #[tokio::test]
    async fn test_connect_twice() {
        let (a, _a_peer) = tokio::io::duplex(64);
        let (b, _b_peer) = tokio::io::duplex(64);
        let mut client = Client::new(ClientConfig::default());
        client.connect(a).unwrap();
        assert!(matches!(
            client.connect(b),
            Err(ProtocolError::AlreadyConnected)
        ));
    }

    #[tokio::test]
    async fn test_messages_taken_once() {
        let (stream, _peer) = tokio::io::duplex(64);
        let mut client = Client::new(ClientConfig::default());
        client.connect(stream).unwrap();
        assert!(client.messages().is_some());
        assert!(client.messages().is_none());
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.rate_limit, None);
        assert_eq!(config.queue_capacity, 1);
        assert_eq!(config.overflow, Overflow::Block);
    }
}
