//! # slirc-tmi
//!
//! A small IRC client for the Twitch chat gateway (TMI).
//!
//! ## Features
//!
//! - Line framing with the protocol's 512-byte frame ceiling
//! - Fixed-window send quota matching the gateway's rate limits
//! - Background reader that answers `PING` and forwards chat messages
//! - Tag decoding for chat messages, with typed accessors
//! - Platform helpers: endpoints, capabilities, a ready-made [`twitch::Bot`]
//!
//! The client works over any `AsyncRead + AsyncWrite` stream. TLS, if
//! wanted, is set up by the caller before handing the stream over.

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ## Quick Start
//!
//! ### Parsing chat messages
//!
//! ```rust
//! use slirc_tmi::Message;
//!
//! let raw = "@badge-info=;color=#FF0000;display-name=Foo :foo!foo@foo.tmi.twitch.tv PRIVMSG #bar :hello world";
//! let message = Message::parse(raw).expect("chat message");
//!
//! assert_eq!(message.sender, "foo");
//! assert_eq!(message.content, "hello world");
//! assert_eq!(message.display_name(), "Foo");
//! ```
//!
//! ### Running a bot
//!
//! ```no_run
//! use slirc_tmi::twitch::{Bot, BotConfig};
//!
//! # async fn run() -> slirc_tmi::error::Result<()> {
//! let config = BotConfig::new("mybot", "mychannel", "oauth:token");
//! let mut bot = Bot::connect_plain(&config).await?;
//!
//! while let Some(msg) = bot.next_message().await {
//!     if msg.content == "!hello" {
//!         bot.say(&format!("hello, {}", msg.display_name())).await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod message;
pub mod twitch;

#[cfg(feature = "tokio")]
pub mod client;
#[cfg(feature = "tokio")]
pub mod line;
#[cfg(feature = "tokio")]
pub mod ratelimit;
#[cfg(feature = "tokio")]
mod reader;
#[cfg(feature = "tokio")]
mod sender;

pub use self::error::ProtocolError;
pub use self::message::{Badge, Message};
pub use self::twitch::Capability;

#[cfg(feature = "tokio")]
pub use self::client::{Client, ClientConfig, Messages};
#[cfg(feature = "tokio")]
pub use self::line::{LineCodec, MAX_FRAME_LEN, MAX_LINE_LEN};
#[cfg(feature = "tokio")]
pub use self::ratelimit::RateLimit;
#[cfg(feature = "tokio")]
pub use self::reader::Overflow;
