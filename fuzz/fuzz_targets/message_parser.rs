//! Fuzz target for chat message recognition
//!
//! Feeds arbitrary frames to the parser; it must never panic, and anything
//! it accepts must carry a non-empty sender and a `#` channel.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::str;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = str::from_utf8(data) {
        // Inbound frames are capped at tag budget plus body
        if input.len() > 8191 + 512 {
            return;
        }

        if let Some(msg) = slirc_tmi::Message::parse(input) {
            assert!(!msg.sender.is_empty());
            assert!(msg.channel.starts_with('#'));
            let _ = msg.sent_at();
            let _ = msg.badges();
        }
    }
});
