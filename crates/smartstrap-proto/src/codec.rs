//! Byte-oriented escape codec.
//!
//! `FLAG` delimits frames and never appears inside a frame body. `ESCAPE`
//! precedes any body byte equal to `FLAG` or `ESCAPE`; the transmitted byte
//! is the original XOR'd with [`ESCAPE_MASK`]. This is the same HDLC-style
//! escaping used by the original Pebble smartstrap firmware (`hdlc.c`) —
//! named here after what it does rather than after HDLC, since the rest of
//! the HDLC frame format is not implemented.

/// Reserved octet delimiting frames. Never appears literally inside a body.
pub const FLAG: u8 = 0x7E;

/// Reserved octet that escapes a following [`FLAG`] or [`ESCAPE`] byte.
pub const ESCAPE: u8 = 0x7D;

/// XOR mask applied to an escaped byte's original value.
pub const ESCAPE_MASK: u8 = 0x20;

/// Result of decoding one wire byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    /// `byte` was [`FLAG`]: the frame ends here (or, if `should_store` is
    /// also false and this is the very first byte, it may be the opening
    /// flag — the caller decides how to treat a zero-length frame).
    pub is_complete: bool,
    /// `byte` holds a decoded body byte that should be placed into the
    /// frame (only meaningful when `is_complete` is false).
    pub should_store: bool,
    /// A stray or doubled [`ESCAPE`] was seen. The caller must drop the
    /// frame currently being assembled.
    pub encoding_error: bool,
    /// The decoded byte value. Only meaningful when `should_store` is true.
    pub byte: u8,
}

/// Streaming escape decoder.
///
/// Holds the one bit of state the decoder needs between bytes: whether the
/// previous byte was an unconsumed [`ESCAPE`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decoder {
    escape: bool,
}

impl Decoder {
    /// A fresh decoder with no pending escape.
    #[must_use]
    pub fn new() -> Self {
        Self { escape: false }
    }

    /// Reset to the initial state. Called at every frame boundary.
    pub fn reset(&mut self) {
        self.escape = false;
    }

    /// Feed one wire byte through the decoder.
    pub fn decode(&mut self, byte: u8) -> Decoded {
        let mut out =
            Decoded { is_complete: false, should_store: false, encoding_error: false, byte };

        if byte == FLAG {
            if self.escape {
                // stray escape immediately before the flag
                self.escape = false;
                out.encoding_error = true;
                log::trace!("smartstrap: escape byte immediately preceding flag");
            }
            out.is_complete = true;
        } else if byte == ESCAPE {
            if self.escape {
                // two escapes in a row: invalid sequence
                self.escape = false;
                out.encoding_error = true;
                log::trace!("smartstrap: doubled escape byte");
            } else {
                self.escape = true;
            }
        } else {
            if self.escape {
                out.byte = byte ^ ESCAPE_MASK;
                self.escape = false;
            }
            out.should_store = true;
        }

        out
    }
}

/// Encode one body byte for transmission.
///
/// Returns `(byte_to_send, needs_escape_prefix)`. If `needs_escape_prefix`
/// is true, the caller must write [`ESCAPE`] before `byte_to_send`.
#[must_use]
pub fn encode_byte(byte: u8) -> (u8, bool) {
    if byte == FLAG || byte == ESCAPE { (byte ^ ESCAPE_MASK, true) } else { (byte, false) }
}
