//! Nom-based recognizer for TMI chat messages.
//!
//! Only one shape of frame is recognized, a tagged channel message:
//!
//! ```text
//! @<tags> :<nick>!<user>@<host>.tmi.twitch.tv PRIVMSG #<channel> :<content>
//! ```
//!
//! Everything else (JOIN, PART, capability acks, numerics, untagged
//! PRIVMSG) fails to parse, which callers treat as "not a chat message".

use nom::{
    bytes::complete::{tag, take_till1},
    character::complete::char,
    combinator::{map_opt, rest},
    error::{context, VerboseError},
    sequence::preceded,
    IResult,
};

type ParseResult<I, O> = IResult<I, O, VerboseError<I>>;

/// Hostname suffix every chat user prefix ends with.
pub const PLATFORM_HOST_SUFFIX: &str = ".tmi.twitch.tv";

/// Field separators. Only ASCII whitespace ends a field; other space
/// characters may appear raw inside tag values.
fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c')
}

/// Parse the tag section (after `@`, up to the first whitespace).
fn parse_tags(input: &str) -> ParseResult<&str, &str> {
    context(
        "parsing message tags",
        preceded(char('@'), take_till1(is_separator)),
    )(input)
}

/// Split a `nick!user@host` prefix, requiring the platform host suffix.
fn split_prefix(prefix: &str) -> Option<(&str, &str, &str)> {
    let (nick, rest) = prefix.split_once('!')?;
    let (user, host) = rest.rsplit_once('@')?;
    let label = host.strip_suffix(PLATFORM_HOST_SUFFIX)?;
    if nick.is_empty() || user.is_empty() || label.is_empty() {
        return None;
    }
    Some((nick, user, host))
}

/// Parse the user prefix (after ` :`, up to the next whitespace).
fn parse_prefix(input: &str) -> ParseResult<&str, (&str, &str, &str)> {
    context(
        "parsing user prefix",
        preceded(
            tag(" :"),
            map_opt(take_till1(is_separator), split_prefix),
        ),
    )(input)
}

/// Parse ` PRIVMSG #channel`, returning the channel including its `#`.
fn parse_target(input: &str) -> ParseResult<&str, &str> {
    let (after_cmd, _) = context("parsing PRIVMSG command", tag(" PRIVMSG "))(input)?;
    let (remaining, _) = context(
        "parsing channel name",
        preceded(char('#'), take_till1(is_separator)),
    )(after_cmd)?;
    let channel = &after_cmd[..after_cmd.len() - remaining.len()];
    Ok((remaining, channel))
}

/// Parse a complete chat message frame.
pub fn parse_privmsg(input: &str) -> ParseResult<&str, ParsedPrivmsg<'_>> {
    let (input, tags) = parse_tags(input)?;
    let (input, (nick, user, host)) = parse_prefix(input)?;
    let (input, channel) = parse_target(input)?;
    let (input, content) = context("parsing message content", preceded(tag(" :"), rest))(input)?;

    Ok((
        input,
        ParsedPrivmsg {
            tags,
            nick,
            user,
            host,
            channel,
            content,
        },
    ))
}

/// A recognized chat message with borrowed string slices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPrivmsg<'a> {
    /// Raw tags string (without the leading `@`).
    pub tags: &'a str,
    /// Sender nickname.
    pub nick: &'a str,
    /// Sender username.
    pub user: &'a str,
    /// Sender host, ending in [`PLATFORM_HOST_SUFFIX`].
    pub host: &'a str,
    /// Target channel, including the leading `#`.
    pub channel: &'a str,
    /// Chat text; may be empty.
    pub content: &'a str,
}

impl<'a> ParsedPrivmsg<'a> {
    /// Recognize `input` as a chat message.
    ///
    /// One trailing line terminator (`\n` or `\r\n`) is ignored. Returns
    /// `None` for any other frame.
    pub fn parse(input: &'a str) -> Option<Self> {
        let line = match input.strip_suffix('\n') {
            Some(line) => line.strip_suffix('\r').unwrap_or(line),
            None => input,
        };
        parse_privmsg(line).ok().map(|(_, msg)| msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_privmsg() {
        let msg = ParsedPrivmsg::parse(
            "@badge-info=;color=#FF0000;display-name=Foo :foo!foo@foo.tmi.twitch.tv PRIVMSG #bar :hello world",
        )
        .unwrap();
        assert_eq!(msg.tags, "badge-info=;color=#FF0000;display-name=Foo");
        assert_eq!(msg.nick, "foo");
        assert_eq!(msg.user, "foo");
        assert_eq!(msg.host, "foo.tmi.twitch.tv");
        assert_eq!(msg.channel, "#bar");
        assert_eq!(msg.content, "hello world");
    }

    #[test]
    fn test_parse_with_crlf() {
        let msg =
            ParsedPrivmsg::parse("@a=1 :n!u@n.tmi.twitch.tv PRIVMSG #c :hi\r\n").unwrap();
        assert_eq!(msg.content, "hi");
    }

    #[test]
    fn test_parse_strips_one_terminator_only() {
        let msg =
            ParsedPrivmsg::parse("@a=1 :n!u@n.tmi.twitch.tv PRIVMSG #c :hi\r\r\n").unwrap();
        assert_eq!(msg.content, "hi\r");
        // a frame already stripped by the line codec keeps its content
        let msg = ParsedPrivmsg::parse("@a=1 :n!u@n.tmi.twitch.tv PRIVMSG #c :hi\r").unwrap();
        assert_eq!(msg.content, "hi\r");
    }

    #[test]
    fn test_parse_unicode_space_inside_tag_value() {
        let msg = ParsedPrivmsg::parse(
            "@reply-parent-msg-body=hi\u{3000}there;id=1 :foo!foo@foo.tmi.twitch.tv PRIVMSG #bar :reply",
        )
        .unwrap();
        assert_eq!(msg.tags, "reply-parent-msg-body=hi\u{3000}there;id=1");
        assert_eq!(msg.content, "reply");

        let msg = ParsedPrivmsg::parse(
            "@a=no\u{a0}break :foo!foo@foo.tmi.twitch.tv PRIVMSG #bar :x",
        )
        .unwrap();
        assert_eq!(msg.tags, "a=no\u{a0}break");
    }

    #[test]
    fn test_ascii_whitespace_ends_tags() {
        assert!(ParsedPrivmsg::parse("@a=1\t:n!u@n.tmi.twitch.tv PRIVMSG #c :hi").is_none());
        assert!(ParsedPrivmsg::parse("@a=1\x0cb :n!u@n.tmi.twitch.tv PRIVMSG #c :hi").is_none());
    }

    #[test]
    fn test_parse_content_keeps_colons_and_spaces() {
        let msg =
            ParsedPrivmsg::parse("@a=1 :n!u@n.tmi.twitch.tv PRIVMSG #c :a :b  c ").unwrap();
        assert_eq!(msg.content, "a :b  c ");
    }

    #[test]
    fn test_parse_empty_content() {
        let msg = ParsedPrivmsg::parse("@a=1 :n!u@n.tmi.twitch.tv PRIVMSG #c :").unwrap();
        assert_eq!(msg.content, "");
    }

    #[test]
    fn test_untagged_privmsg_is_not_a_message() {
        assert!(ParsedPrivmsg::parse(":n!u@n.tmi.twitch.tv PRIVMSG #c :hi").is_none());
    }

    #[test]
    fn test_join_is_not_a_message() {
        assert!(ParsedPrivmsg::parse(":n!u@n.tmi.twitch.tv JOIN #c").is_none());
    }

    #[test]
    fn test_foreign_host_is_not_a_message() {
        assert!(ParsedPrivmsg::parse("@a=1 :n!u@n.example.com PRIVMSG #c :hi").is_none());
        // the suffix alone, without a host label, does not count
        assert!(ParsedPrivmsg::parse("@a=1 :n!u@.tmi.twitch.tv PRIVMSG #c :hi").is_none());
    }

    #[test]
    fn test_server_notice_is_not_a_message() {
        assert!(ParsedPrivmsg::parse(
            "@msg-id=host_on :tmi.twitch.tv NOTICE #c :Now hosting someone."
        )
        .is_none());
    }

    #[test]
    fn test_missing_channel_hash() {
        assert!(ParsedPrivmsg::parse("@a=1 :n!u@n.tmi.twitch.tv PRIVMSG c :hi").is_none());
    }

    #[test]
    fn test_missing_trailing_colon() {
        assert!(ParsedPrivmsg::parse("@a=1 :n!u@n.tmi.twitch.tv PRIVMSG #c hi").is_none());
    }

    #[test]
    fn test_empty_input() {
        assert!(ParsedPrivmsg::parse("").is_none());
        assert!(ParsedPrivmsg::parse("@").is_none());
    }
}
