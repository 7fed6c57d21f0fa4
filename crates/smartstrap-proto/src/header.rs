//! Frame header fields.
//!
//! Unlike the teacher protocol's 128-byte header, this header cannot be
//! parsed with a single zero-copy cast: it is escape-encoded on the wire and
//! arrives one decoded byte at a time, so there is never a contiguous byte
//! slice to borrow from. [`FrameHeader`] is therefore a plain struct that
//! the frame assembler (`smartstrap-core`) fills in field by field; this
//! module only owns the little-endian wire layout and bit-level semantics.

use bitflags::bitflags;

bitflags! {
    /// Header flags bitfield (4 bytes on the wire, little-endian).
    ///
    /// Bits 3..31 are reserved and MUST be zero on the wire; a frame with
    /// any reserved bit set is dropped (spec.md §3 invariants).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FrameFlags: u32 {
        /// Host is requesting data back (bit 0).
        const IS_READ = 1 << 0;
        /// Frame originates from the host (bit 1). Every frame the
        /// accessory receives must have this bit set.
        const IS_MASTER = 1 << 1;
        /// Frame is a notification wakeup, not a request/response (bit 2).
        const IS_NOTIFICATION = 1 << 2;
    }
}

impl FrameFlags {
    /// True if `bits` sets anything outside bits 0..2.
    #[must_use]
    pub fn has_reserved_bits(bits: u32) -> bool {
        Self::from_bits(bits).is_none()
    }
}

/// Frame header: version, flags, profile.
///
/// Wire layout (7 bytes, little-endian multibyte fields):
///
/// | offset | size | field   |
/// |-------:|-----:|---------|
/// | 0      | 1    | version |
/// | 1      | 4    | flags   |
/// | 5      | 2    | profile |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Protocol version. Valid range is `1..=PROTOCOL_VERSION`.
    pub version: u8,
    /// Header flags.
    pub flags: FrameFlags,
    /// Raw profile ID (1 = link-control, 2 = raw-data, 3 = generic-service).
    pub profile: u16,
}

impl FrameHeader {
    /// Decoded, unescaped size of the header on the wire.
    pub const SIZE: usize = crate::FRAME_HEADER_SIZE;

    /// Serialize into the 7-byte wire layout.
    #[must_use]
    pub fn to_wire(self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0] = self.version;
        buf[1..5].copy_from_slice(&self.flags.bits().to_le_bytes());
        buf[5..7].copy_from_slice(&self.profile.to_le_bytes());
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_bits_are_flagged() {
        assert!(!FrameFlags::has_reserved_bits(FrameFlags::IS_READ.bits()));
        assert!(FrameFlags::has_reserved_bits(1 << 3));
        assert!(FrameFlags::has_reserved_bits(1 << 31));
    }

    #[test]
    fn header_round_trips_through_wire_bytes() {
        let header = FrameHeader {
            version: 1,
            flags: FrameFlags::IS_READ | FrameFlags::IS_MASTER,
            profile: 2,
        };
        let wire = header.to_wire();
        assert_eq!(wire[0], 1);
        assert_eq!(u32::from_le_bytes(wire[1..5].try_into().unwrap()), header.flags.bits());
        assert_eq!(u16::from_le_bytes(wire[5..7].try_into().unwrap()), 2);
    }
}
