//! Twitch chat gateway specifics.
//!
//! Constants for the TMI endpoint and its send quota, the capability names
//! the gateway understands, and [`Bot`], which runs the usual
//! login/capabilities/join sequence on top of a [`Client`](crate::Client).
//!
//! # Reference
//! - Twitch IRC guide: <https://dev.twitch.tv/docs/irc/>

use std::time::Duration;

#[cfg(feature = "tokio")]
mod bot;
#[cfg(feature = "tokio")]
pub use self::bot::{Bot, BotConfig};

/// Plaintext IRC endpoint.
pub const IRC_HOST: &str = "irc.chat.twitch.tv:6667";

/// TLS IRC endpoint. The TLS handshake is left to the caller.
pub const IRC_HOST_TLS: &str = "irc.chat.twitch.tv:6697";

/// Length of the gateway's send quota window.
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(30);

/// Frames a regular (non-moderator) account may send per window.
pub const DEFAULT_MESSAGES_PER_WINDOW: u32 = 20;

/// Capabilities offered by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Capability {
    /// Metadata tags on command and membership messages. Requires
    /// [`Capability::Commands`] as well.
    Tags,
    /// Twitch-specific commands and messages (USERNOTICE, CLEARCHAT, ...).
    Commands,
    /// JOIN and PART events for other users.
    Membership,
    /// Any other capability name.
    Custom(String),
}

impl Capability {
    /// The capabilities a chat bot normally wants.
    pub fn all() -> [Capability; 3] {
        [Self::Tags, Self::Commands, Self::Membership]
    }
}

impl AsRef<str> for Capability {
    fn as_ref(&self) -> &str {
        match self {
            Self::Tags => "twitch.tv/tags",
            Self::Commands => "twitch.tv/commands",
            Self::Membership => "twitch.tv/membership",
            Self::Custom(s) => s,
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl From<&str> for Capability {
    fn from(s: &str) -> Self {
        match s {
            "twitch.tv/tags" => Self::Tags,
            "twitch.tv/commands" => Self::Commands,
            "twitch.tv/membership" => Self::Membership,
            other => Self::Custom(other.to_string()),
        }
    }
}

/// Prefix `channel` with `#` unless it already has one.
pub fn normalize_channel(channel: &str) -> String {
    if channel.starts_with('#') {
        channel.to_string()
    } else {
        format!("#{}", channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_names() {
        assert_eq!(Capability::Tags.as_ref(), "twitch.tv/tags");
        assert_eq!(Capability::Commands.to_string(), "twitch.tv/commands");
        assert_eq!(Capability::from("twitch.tv/membership"), Capability::Membership);
        assert_eq!(
            Capability::from("draft/foo"),
            Capability::Custom("draft/foo".into())
        );
    }

    #[test]
    fn test_all_capabilities() {
        let names: Vec<String> = Capability::all().iter().map(|c| c.to_string()).collect();
        assert_eq!(
            names,
            ["twitch.tv/tags", "twitch.tv/commands", "twitch.tv/membership"]
        );
    }

    #[test]
    fn test_normalize_channel() {
        assert_eq!(normalize_channel("bar"), "#bar");
        assert_eq!(normalize_channel("#bar"), "#bar");
    }
}
