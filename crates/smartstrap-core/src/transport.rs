//! Transport capability the integrator supplies.
//!
//! The engine never touches a UART register directly; it drives the link
//! through this trait instead. One instance is created at [`crate::Engine::init`]
//! and held for the engine's lifetime, matching the single registered
//! callback of the original firmware's control vocabulary.

/// The four operations the engine needs from the physical (or simulated)
/// link.
///
/// The engine never mixes command order across a frame boundary: a call to
/// [`Transport::write_byte`] is always bracketed by `set_tx_enabled(true)`
/// before the first byte and `set_tx_enabled(false)` after the last.
pub trait Transport {
    /// Reconfigure the UART to `baud` bits per second.
    ///
    /// Hardware with a prescaler quirk at exactly 57600 bps may adjust by
    /// +1; that correction is the integrator's responsibility, not the
    /// engine's.
    fn set_baud_rate(&mut self, baud: u32);

    /// Switch the half-duplex line direction. Disabling must flush any
    /// buffered transmit bytes before returning.
    fn set_tx_enabled(&mut self, enabled: bool);

    /// Emit one already-escaped wire byte.
    fn write_byte(&mut self, byte: u8);

    /// Emit a physical framing violation ("break") used to wake the host.
    ///
    /// The reference signal is three zero bytes with parity temporarily
    /// forced to even, then restored. Hardware without runtime parity
    /// control must synthesize an equivalent violation; this is a
    /// physical-layer concern the engine does not implement.
    fn write_break(&mut self);
}
