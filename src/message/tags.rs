//! Message tag decoding.
//!
//! TMI attaches IRCv3-style tags to chat messages:
//! `badge-info=;color=#FF0000;display-name=Foo`. Values are kept exactly as
//! they appear on the wire; escape sequences such as `\s` are not expanded.

use std::collections::HashMap;

use tracing::warn;

/// Decode a raw tag string (without the leading `@`) into a map.
///
/// Every entry must split on `=` into exactly two parts. Entries that do
/// not are skipped with a warning; the remaining entries are still decoded.
/// When a tag name repeats, the last value wins.
pub fn decode_tags(raw: &str) -> HashMap<String, String> {
    let mut tags = HashMap::new();

    for entry in raw.split(';') {
        let mut parts = entry.split('=');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => {
                tags.insert(key.to_string(), value.to_string());
            }
            _ => warn!("malformed tag: `{}`", entry),
        }
    }

    tags
}

/// A single chat badge, e.g. `subscriber/12`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Badge {
    /// Badge name (`broadcaster`, `moderator`, `subscriber`, ...).
    pub name: String,
    /// Badge version; for subscriber badges this is the tier/month marker.
    pub version: String,
}

/// Parse the value of a `badges` or `badge-info` tag.
///
/// The value is a comma separated list of `name/version` pairs. Items
/// without a `/` are ignored.
pub fn parse_badges(value: &str) -> Vec<Badge> {
    value
        .split(',')
        .filter_map(|item| item.split_once('/'))
        .map(|(name, version)| Badge {
            name: name.to_string(),
            version: version.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_simple() {
        let tags = decode_tags("badge-info=;color=#FF0000;display-name=Foo");
        assert_eq!(tags.len(), 3);
        assert_eq!(tags["badge-info"], "");
        assert_eq!(tags["color"], "#FF0000");
        assert_eq!(tags["display-name"], "Foo");
    }

    #[test]
    fn test_decode_skips_malformed() {
        let tags = decode_tags("a=1;bad;c=3");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags["a"], "1");
        assert_eq!(tags["c"], "3");
    }

    #[test]
    fn test_decode_rejects_extra_equals() {
        // `k=v=w` splits into three parts and is dropped entirely
        let tags = decode_tags("k=v=w;ok=1");
        assert!(!tags.contains_key("k"));
        assert_eq!(tags["ok"], "1");
    }

    #[test]
    fn test_decode_last_write_wins() {
        let tags = decode_tags("a=1;a=2");
        assert_eq!(tags["a"], "2");
    }

    #[test]
    fn test_decode_keeps_escapes() {
        let tags = decode_tags("system-msg=hello\\sworld");
        assert_eq!(tags["system-msg"], "hello\\sworld");
    }

    #[test]
    fn test_parse_badges() {
        let badges = parse_badges("broadcaster/1,subscriber/12");
        assert_eq!(
            badges,
            vec![
                Badge {
                    name: "broadcaster".into(),
                    version: "1".into()
                },
                Badge {
                    name: "subscriber".into(),
                    version: "12".into()
                },
            ]
        );
    }

    #[test]
    fn test_parse_badges_empty() {
        assert!(parse_badges("").is_empty());
    }
}
