//! Quote bot example
//!
//! Joins a channel and answers `<prefix>quote` with a random line from a
//! JSON list of quotes. Unknown commands get a short reply.
//!
//! ```text
//! cargo run --example quote_bot -- config.json data/quotes.json
//! ```
//!
//! `config.json`:
//!
//! ```json
//! {
//!   "command_prefix": "!",
//!   "twitch_bot_name": "mybot",
//!   "twitch_channel_name": "mychannel",
//!   "twitch_oauth": "oauth:..."
//! }
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use slirc_tmi::twitch::{Bot, BotConfig};

#[derive(Deserialize)]
struct Config {
    command_prefix: String,
    twitch_bot_name: String,
    twitch_channel_name: String,
    twitch_oauth: String,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// Command name of a chat line starting with `prefix`.
fn command_name<'a>(content: &'a str, prefix: &str) -> Option<&'a str> {
    content.strip_prefix(prefix)?.split_whitespace().next()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| "config.json".to_string());
    let quotes_path = args.next().unwrap_or_else(|| "data/quotes.json".to_string());

    let config: Config = read_json(Path::new(&config_path))?;
    let quotes: Vec<String> = read_json(Path::new(&quotes_path))?;
    if quotes.is_empty() {
        bail!("{} contains no quotes", quotes_path);
    }

    let bot_config = BotConfig::new(
        config.twitch_bot_name,
        config.twitch_channel_name,
        config.twitch_oauth,
    );
    let mut bot = Bot::connect_plain(&bot_config).await?;
    println!("✓ Joined {}", bot.channel());

    while let Some(msg) = bot.next_message().await {
        let Some(name) = command_name(&msg.content, &config.command_prefix) else {
            continue;
        };

        let reply = match name {
            "quote" => match quotes.choose(&mut rand::thread_rng()) {
                Some(quote) => quote.clone(),
                None => continue,
            },
            other => format!("Unknown command '{}'", other),
        };
        bot.say(&reply).await?;
    }

    println!("Connection closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_name() {
        assert_eq!(command_name("!quote", "!"), Some("quote"));
        assert_eq!(command_name("?? quote please", "??"), Some("quote"));
        assert_eq!(command_name("!quote", "?"), None);
        assert_eq!(command_name("!  ", "!"), None);
    }

    #[test]
    fn test_config_from_json() {
        let config: Config = serde_json::from_str(
            r#"{"command_prefix":"?","twitch_bot_name":"bot","twitch_channel_name":"bar","twitch_oauth":"oauth:x"}"#,
        )
        .unwrap();
        assert_eq!(config.command_prefix, "?");
        assert_eq!(config.twitch_channel_name, "bar");
    }
}
