//! Fuzz target for frame header boundary conditions.
//!
//! Exercises `FrameAssembler` with deliberately malformed version, flags,
//! profile and payload-length combinations, on top of raw arbitrary byte
//! streams.
//!
//! # Invariants
//!
//! - The assembler never panics and never writes past the caller's buffer,
//!   regardless of input.
//! - A frame with reserved flag bits set, an unknown profile, a version
//!   outside `1..=PROTOCOL_VERSION`, or a bad CRC residual is always
//!   `Dropped`, never `Complete`.
//! - `Complete`'s `payload_length` never exceeds the buffer's capacity.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use smartstrap_core::frame_assembler::{FrameAssembler, FrameOutcome};
use smartstrap_proto::{Crc8, PROTOCOL_VERSION, Profile, codec::FLAG, encode_byte};

#[derive(Debug, Arbitrary)]
struct BoundaryFrame {
    version: VersionByte,
    flags: FlagsWord,
    profile: ProfileWord,
    payload: Vec<u8>,
    corrupt_crc: bool,
    trailing_garbage: Vec<u8>,
}

#[derive(Debug, Arbitrary)]
enum VersionByte {
    Valid,
    Zero,
    TooHigh,
    Random(u8),
}

#[derive(Debug, Arbitrary)]
enum FlagsWord {
    MasterOnly,
    MasterAndRead,
    MissingMaster,
    ReservedBitsSet(u32),
    Random(u32),
}

#[derive(Debug, Arbitrary)]
enum ProfileWord {
    LinkControl,
    RawData,
    GenericService,
    Unknown(u16),
}

fuzz_target!(|input: BoundaryFrame| {
    let version = match input.version {
        VersionByte::Valid => PROTOCOL_VERSION,
        VersionByte::Zero => 0,
        VersionByte::TooHigh => PROTOCOL_VERSION + 1,
        VersionByte::Random(v) => v,
    };

    let flags: u32 = match input.flags {
        FlagsWord::MasterOnly => 0b001,
        FlagsWord::MasterAndRead => 0b011,
        FlagsWord::MissingMaster => 0b010,
        FlagsWord::ReservedBitsSet(bits) => bits | (1 << 5),
        FlagsWord::Random(bits) => bits,
    };

    let profile: u16 = match input.profile {
        ProfileWord::LinkControl => Profile::LinkControl.to_u16(),
        ProfileWord::RawData => Profile::RawData.to_u16(),
        ProfileWord::GenericService => Profile::GenericService.to_u16(),
        ProfileWord::Unknown(p) => p,
    };

    let payload: Vec<u8> = input.payload.into_iter().take(4096).collect();

    let mut body = Vec::with_capacity(7 + payload.len() + 1);
    body.push(version);
    body.extend_from_slice(&flags.to_le_bytes());
    body.extend_from_slice(&profile.to_le_bytes());
    body.extend_from_slice(&payload);

    let mut crc = Crc8::new();
    crc.update_all(&body);
    let parity = if input.corrupt_crc { crc.value() ^ 0xFF } else { crc.value() };
    body.push(parity);

    let capacity = (payload.len() / 3).max(1).min(512);
    let mut buffer = vec![0xFFu8; capacity];
    let sentinel_len = buffer.len();
    let mut assembler = FrameAssembler::new(&mut buffer);

    let mut outcome = assembler.handle_byte(FLAG);
    for &byte in &body {
        let (encoded, needs_escape) = encode_byte(byte);
        if needs_escape {
            assembler.handle_byte(0x7D);
        }
        outcome = assembler.handle_byte(encoded);
    }
    outcome = assembler.handle_byte(FLAG);

    match outcome {
        FrameOutcome::Complete { header, payload_length } => {
            assert!(payload_length <= sentinel_len);
            assert!((1..=PROTOCOL_VERSION).contains(&header.version));
            assert!(!input.corrupt_crc);
            assert!(Profile::from_u16(header.profile).is_some());
        },
        FrameOutcome::Dropped | FrameOutcome::Incomplete => {},
    }

    // Feed a second, unrelated frame's worth of raw garbage afterwards —
    // the assembler must still never overrun, whatever state it was left in.
    for &byte in input.trailing_garbage.iter().take(256) {
        let _ = assembler.handle_byte(byte);
    }
    assert_eq!(buffer.len(), sentinel_len);
});
