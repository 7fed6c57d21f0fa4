//! Baud negotiation and timeout-driven connection tracking.
//!
//! Owns the only two pieces of state that outlive a single frame: the
//! current/target baud pair and the "have we heard from the host recently"
//! clock. Negotiation itself (replying to link-control frames) lives in
//! `dispatcher`; this module is the state and the two actions
//! (`begin_baud_switch`, `check_timeout`) that dispatcher and the façade
//! drive.

use crate::transport::Transport;

/// The twelve baud rates the link-control `Baud` exchange may select.
///
/// Slot 6 is 62500, not 67500 — see `DESIGN.md` for why.
pub const BAUD_TABLE: [u32; 12] =
    [9600, 14400, 19200, 28800, 38400, 57600, 62500, 115200, 125000, 230400, 250000, 460800];

/// Baud the transport is forced to at `init` and falls back to after an
/// inactivity timeout.
pub const DEFAULT_BAUD: u32 = 9600;

/// Inactivity window after which the link is considered disconnected.
pub const INACTIVITY_TIMEOUT_MS: u32 = 10_000;

/// Baud/connection state.
#[derive(Debug)]
pub struct LinkManager {
    current_baud: u32,
    target_baud: u32,
    connected: bool,
    last_message_time: u32,
}

impl LinkManager {
    /// Start at [`DEFAULT_BAUD`], disconnected, negotiating towards
    /// `target_baud`.
    #[must_use]
    pub fn new(target_baud: u32) -> Self {
        Self { current_baud: DEFAULT_BAUD, target_baud, connected: false, last_message_time: 0 }
    }

    /// Baud the transport is currently configured for.
    #[must_use]
    pub fn current_baud(&self) -> u32 {
        self.current_baud
    }

    /// Baud the link is negotiating towards.
    #[must_use]
    pub fn target_baud(&self) -> u32 {
        self.target_baud
    }

    /// Mark the link established at the current baud.
    pub fn mark_connected(&mut self) {
        self.connected = true;
    }

    /// Record that a valid frame was just received at `time_ms`.
    pub fn note_valid_frame(&mut self, time_ms: u32) {
        self.last_message_time = time_ms;
    }

    /// Switch the transport to `target_baud`, unless it is already there.
    ///
    /// Pulses the TX-enable line after the baud change so the hardware can
    /// settle, per spec §4.5.
    pub fn begin_baud_switch<T: Transport>(&mut self, transport: &mut T) {
        if self.current_baud == self.target_baud {
            return;
        }
        transport.set_baud_rate(self.target_baud);
        transport.set_tx_enabled(true);
        transport.set_tx_enabled(false);
        self.current_baud = self.target_baud;
        log::debug!("smartstrap: switched baud to {}", self.current_baud);
    }

    /// Apply the 10-second inactivity rule, falling back to
    /// [`DEFAULT_BAUD`] and clearing `connected` if `time_ms` is far enough
    /// past the last valid frame. Wraparound (`time_ms` less than the last
    /// seen time) resets the clock without tripping the timeout.
    pub fn check_timeout<T: Transport>(&mut self, time_ms: u32, transport: &mut T) {
        if time_ms < self.last_message_time {
            self.last_message_time = time_ms;
            return;
        }
        if time_ms - self.last_message_time > INACTIVITY_TIMEOUT_MS {
            if self.connected || self.current_baud != DEFAULT_BAUD {
                log::debug!("smartstrap: inactivity timeout, falling back to {DEFAULT_BAUD} baud");
            }
            self.connected = false;
            if self.current_baud != DEFAULT_BAUD {
                self.current_baud = DEFAULT_BAUD;
                transport.set_baud_rate(DEFAULT_BAUD);
            }
        }
    }

    /// Current connection state after applying the timeout rule.
    pub fn is_connected<T: Transport>(&mut self, time_ms: u32, transport: &mut T) -> bool {
        self.check_timeout(time_ms, transport);
        self.connected
    }
}
