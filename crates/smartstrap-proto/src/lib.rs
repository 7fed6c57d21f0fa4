//! Wire format for the smartstrap accessory protocol.
//!
//! This crate knows byte layout only: the escape-encoding byte codec, the
//! CRC-8 parity unit, and the little-endian field layout of frame headers,
//! link-control payloads, and generic-service payloads. It has no state
//! machine logic — that lives in `smartstrap-core`, which assembles frames
//! one decoded byte at a time using the primitives here.
//!
//! `no_std`, no allocation: every function either returns a small `Copy`
//! value or writes into a caller-supplied `&mut [u8]`.

#![no_std]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

#[cfg(test)]
extern crate std;

pub mod codec;
pub mod crc;
pub mod error;
pub mod generic_service;
pub mod header;
pub mod link_control;
pub mod profile;

pub use codec::{Decoded, Decoder, ESCAPE, ESCAPE_MASK, FLAG, encode_byte};
pub use crc::Crc8;
pub use error::FrameError;
pub use generic_service::{GenericServiceHeader, RequestType};
pub use header::{FrameFlags, FrameHeader};
pub use link_control::{LinkControlStatus, LinkControlType};
pub use profile::Profile;

/// Current protocol version. Frame headers must carry a version in
/// `1..=PROTOCOL_VERSION`.
pub const PROTOCOL_VERSION: u8 = 1;

/// Fixed size of the frame header, in decoded (unescaped) bytes:
/// version (1) + flags (4) + profile (2).
pub const FRAME_HEADER_SIZE: usize = 7;

/// Minimum total decoded frame length (header + parity, zero-length
/// payload).
pub const FRAME_MIN_LENGTH: usize = FRAME_HEADER_SIZE + 1;
