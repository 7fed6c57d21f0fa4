//! Helpers for building wire-encoded frames by hand, for scenario and
//! integration tests that need to feed bytes into `Engine::handle_byte`
//! one at a time without going through a live encoder.

use smartstrap_proto::{Crc8, codec::FLAG, encode_byte};

/// Encode a complete flag-delimited, escaped frame: `version`, the 4-byte
/// `flags`, the 2-byte `profile`, then `payload`, followed by the CRC-8
/// parity byte.
#[must_use]
pub fn encode_frame(version: u8, flags: u32, profile: u16, payload: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(7 + payload.len() + 1);
    body.push(version);
    body.extend_from_slice(&flags.to_le_bytes());
    body.extend_from_slice(&profile.to_le_bytes());
    body.extend_from_slice(payload);

    let mut crc = Crc8::new();
    crc.update_all(&body);
    body.push(crc.value());

    let mut wire = Vec::with_capacity(body.len() * 2 + 2);
    wire.push(FLAG);
    for &b in &body {
        let (encoded, needs_escape) = encode_byte(b);
        if needs_escape {
            wire.push(smartstrap_proto::codec::ESCAPE);
        }
        wire.push(encoded);
    }
    wire.push(FLAG);
    wire
}

/// Feed every byte of `wire` into `handler`, in order.
pub fn replay(wire: &[u8], mut handler: impl FnMut(u8)) {
    for &byte in wire {
        handler(byte);
    }
}
