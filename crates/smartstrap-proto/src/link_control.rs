//! Link-control profile payload layout.
//!
//! Link-control frames carry a single type byte followed by a type-specific
//! body. The accessory only ever needs to parse [`LinkControlType::Status`]
//! and [`LinkControlType::Baud`] bodies; `Profiles` frames are acknowledged
//! but their body is opaque to this crate.

/// The link-control frame's leading type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkControlType {
    /// Connection status: one [`LinkControlStatus`] byte follows.
    Status,
    /// Supported-profile bitmask exchange.
    Profiles,
    /// Baud-rate negotiation: a little-endian `u32` baud value follows.
    Baud,
}

impl LinkControlType {
    /// Map a raw wire value to a known type.
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Status),
            2 => Some(Self::Profiles),
            3 => Some(Self::Baud),
            _ => None,
        }
    }

    /// Map back to the raw wire value.
    #[must_use]
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Status => 1,
            Self::Profiles => 2,
            Self::Baud => 3,
        }
    }
}

/// The single status byte carried by a [`LinkControlType::Status`] frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkControlStatus {
    /// Link established at the current baud rate.
    Ok,
    /// The accessory is requesting (or acknowledging) a baud rate change.
    BaudRate,
}

impl LinkControlStatus {
    /// Map a raw wire value to a known status.
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Ok),
            1 => Some(Self::BaudRate),
            _ => None,
        }
    }

    /// Map back to the raw wire value.
    #[must_use]
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::BaudRate => 1,
        }
    }
}

/// Status byte the accessory sends to acknowledge a completed baud switch.
pub const BAUD_ACK_STATUS: u8 = 0x05;
