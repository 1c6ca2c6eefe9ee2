//! Fuzz target for line framing
//!
//! Decodes arbitrary bytes into frames and re-encodes them; outbound frames
//! must always fit the 512-byte ceiling.

#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use tokio_util::codec::{Decoder, Encoder};

fuzz_target!(|data: &[u8]| {
    let mut codec = slirc_tmi::LineCodec::new();
    let mut src = BytesMut::from(data);

    while let Ok(Some(frame)) = codec.decode_eof(&mut src) {
        let mut out = BytesMut::new();
        codec.encode(frame, &mut out).expect("encoding never fails");
        assert!(out.len() <= slirc_tmi::MAX_FRAME_LEN);
        assert!(out.ends_with(b"\r\n"));
    }
});
