//! Wire-level error types.

use thiserror::Error;

/// A problem with a frame's wire-level encoding, independent of any
/// particular profile's payload semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    /// A stray or doubled escape byte was seen (see [`crate::codec`]).
    #[error("invalid escape sequence")]
    InvalidEscape,
    /// The decoded frame is shorter than [`crate::FRAME_MIN_LENGTH`].
    #[error("frame shorter than the minimum header + parity length")]
    TooShort,
    /// The decoded frame would not fit the caller-supplied buffer.
    #[error("frame exceeds the receive buffer capacity")]
    CapacityExceeded,
    /// The trailing parity byte does not match the computed CRC-8.
    #[error("CRC-8 residual is non-zero")]
    CrcMismatch,
    /// `version` is zero or greater than [`crate::PROTOCOL_VERSION`].
    #[error("unsupported protocol version")]
    UnsupportedVersion,
    /// A reserved flag bit was set.
    #[error("reserved flag bits are set")]
    ReservedFlagBits,
    /// The frame did not have [`crate::header::FrameFlags::IS_MASTER`] set.
    #[error("frame is not marked as host-originated")]
    NotMaster,
    /// `profile` is not one of the known [`crate::profile::Profile`] values.
    #[error("unknown profile id")]
    UnknownProfile,
}
