//! Errors surfaced by the public façade.
//!
//! Per the engine's error policy, almost nothing crosses the façade as a
//! typed error: frame-level problems are handled internally by dropping the
//! offending frame (see `frame_assembler`), and `handle_byte` and `write`
//! collapse to `bool`. [`WriteError`] exists only for `try_write`, an
//! additive convenience for integrators that want the reason a `write`
//! call was rejected.

use thiserror::Error;

/// Why a `write` (or `try_write`) call was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WriteError {
    /// `write` was called with no prior `handle_byte` surfacing a request.
    #[error("no request is pending a response")]
    NoPendingRequest,
    /// The pending request's addressing cannot be answered (for example,
    /// a generic-service attribute with service ID in `1..0x00FF`).
    #[error("pending request has invalid service/attribute addressing")]
    InvalidAddressing,
}
