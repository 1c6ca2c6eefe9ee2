use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};

use super::nom_parser::ParsedPrivmsg;
use super::tags::{decode_tags, parse_badges, Badge};

/// A chat message received on a joined channel.
///
/// Built from one raw frame by [`Message::parse`]; never modified afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// Decoded message tags. Values are not unescaped.
    pub tags: HashMap<String, String>,
    /// Nickname of the user who sent the message.
    pub sender: String,
    /// Channel the message was sent to, including the leading `#`.
    pub channel: String,
    /// Chat text.
    pub content: String,
}

impl Message {
    /// Parse a raw protocol frame into a chat message.
    ///
    /// Returns `None` for anything that is not a tagged channel PRIVMSG
    /// from a platform user. That is the normal outcome for most traffic
    /// and not an error. Malformed tag entries are skipped with a warning.
    ///
    /// ```
    /// use slirc_tmi::Message;
    ///
    /// let raw = "@color=#FF0000;display-name=Foo :foo!foo@foo.tmi.twitch.tv PRIVMSG #bar :hello";
    /// let msg = Message::parse(raw).unwrap();
    /// assert_eq!(msg.sender, "foo");
    /// assert_eq!(msg.content, "hello");
    /// assert_eq!(msg.tag("color"), Some("#FF0000"));
    ///
    /// assert!(Message::parse(":foo!foo@foo.tmi.twitch.tv JOIN #bar").is_none());
    /// ```
    pub fn parse(line: &str) -> Option<Message> {
        ParsedPrivmsg::parse(line).map(Message::from)
    }

    /// Look up a tag value by name.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }

    /// The sender's display name, falling back to the nickname when the
    /// tag is absent or empty.
    pub fn display_name(&self) -> &str {
        match self.tag("display-name") {
            Some(name) if !name.is_empty() => name,
            _ => &self.sender,
        }
    }

    /// The sender's chat color (`#RRGGBB`), if set.
    pub fn color(&self) -> Option<&str> {
        self.tag("color").filter(|c| !c.is_empty())
    }

    /// Unique message id.
    pub fn id(&self) -> Option<&str> {
        self.tag("id")
    }

    /// The sender's numeric user id.
    pub fn user_id(&self) -> Option<&str> {
        self.tag("user-id")
    }

    /// Whether the sender is a channel moderator.
    pub fn is_moderator(&self) -> bool {
        self.tag("mod") == Some("1")
    }

    /// Badges shown next to the sender's name.
    pub fn badges(&self) -> Vec<Badge> {
        self.tag("badges").map(parse_badges).unwrap_or_default()
    }

    /// Server-side send time, from the `tmi-sent-ts` tag.
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        let millis = self.tag("tmi-sent-ts")?.parse::<i64>().ok()?;
        Utc.timestamp_millis_opt(millis).single()
    }
}

impl<'a> From<ParsedPrivmsg<'a>> for Message {
    fn from(parsed: ParsedPrivmsg<'a>) -> Self {
        Message {
            tags: decode_tags(parsed.tags),
            sender: parsed.nick.to_string(),
            channel: parsed.channel.to_string(),
            content: parsed.content.to_string(),
        }
    }
}
