use std::fmt;

use chrono::{DateTime, Utc};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{info, warn};

use crate::client::{Client, ClientConfig, Messages};
use crate::error::Result;
use crate::message::Message;
use crate::ratelimit::RateLimit;

use super::{normalize_channel, Capability, DEFAULT_MESSAGES_PER_WINDOW, IRC_HOST, RATE_LIMIT_WINDOW};

/// Login and channel settings for a [`Bot`].
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BotConfig {
    /// Account name used as the nickname.
    pub name: String,
    /// Channel to join, with or without the leading `#`.
    pub channel: String,
    /// OAuth token, including its `oauth:` prefix.
    pub oauth: String,
    /// Send quota per [`RATE_LIMIT_WINDOW`].
    #[cfg_attr(feature = "serde", serde(default = "default_messages_per_window"))]
    pub messages_per_window: u32,
}

#[cfg(feature = "serde")]
fn default_messages_per_window() -> u32 {
    DEFAULT_MESSAGES_PER_WINDOW
}

impl BotConfig {
    /// Settings with the default send quota.
    pub fn new(name: impl Into<String>, channel: impl Into<String>, oauth: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channel: channel.into(),
            oauth: oauth.into(),
            messages_per_window: DEFAULT_MESSAGES_PER_WINDOW,
        }
    }

    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            rate_limit: Some(RateLimit::new(RATE_LIMIT_WINDOW, self.messages_per_window)),
            ..ClientConfig::default()
        }
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("name", &self.name)
            .field("channel", &self.channel)
            .field("oauth", &"***")
            .field("messages_per_window", &self.messages_per_window)
            .finish()
    }
}

/// A logged-in client sitting in one channel.
pub struct Bot {
    client: Client,
    started_at: DateTime<Utc>,
}

impl Bot {
    /// Log in over `stream`, request all [`Capability`] values and join
    /// the configured channel.
    pub async fn connect<S>(config: &BotConfig, stream: S) -> Result<Self>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let channel = normalize_channel(&config.channel);
        let mut client = Client::new(config.client_config());

        client.connect(stream)?;
        client.authenticate(&config.name, &config.oauth).await?;
        client.request_capabilities(&Capability::all()).await?;
        client.join(&channel).await?;
        info!("{} joined {}", config.name, channel);

        Ok(Self {
            client,
            started_at: Utc::now(),
        })
    }

    /// Dial [`IRC_HOST`] over plain TCP and [`connect`](Bot::connect).
    pub async fn connect_plain(config: &BotConfig) -> Result<Self> {
        let stream = TcpStream::connect(IRC_HOST).await?;
        if let Err(e) = enable_keepalive(&stream) {
            warn!("failed to enable TCP keepalive: {}", e);
        }
        Self::connect(config, stream).await
    }

    /// Send a chat message to the bot's channel.
    pub async fn say(&self, text: &str) -> Result<()> {
        self.client.say(text).await
    }

    /// Take the message sequence.
    pub fn messages(&mut self) -> Option<Messages> {
        self.client.messages()
    }

    /// Wait for the next chat message; `None` once the connection is gone.
    pub async fn next_message(&mut self) -> Option<Message> {
        self.client.next_message().await
    }

    /// Send `QUIT`.
    pub async fn disconnect(&mut self) -> Result<()> {
        self.client.disconnect().await
    }

    /// The joined channel, including its `#`.
    pub fn channel(&self) -> &str {
        self.client.channel().unwrap_or_default()
    }

    /// When the bot finished joining.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

fn enable_keepalive(stream: &TcpStream) -> std::io::Result<()> {
    use socket2::{SockRef, TcpKeepalive};
    use std::time::Duration;

    let sock = SockRef::from(stream);
    let keepalive = TcpKeepalive::new()
        .with_time(Duration::from_secs(120))
        .with_interval(Duration::from_secs(30));

    sock.set_tcp_keepalive(&keepalive)
}
