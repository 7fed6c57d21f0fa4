//! Generic-service profile header layout.
//!
//! Every generic-service frame carries this 9-byte header, little-endian,
//! followed by `length` bytes of attribute data. Field order and widths are
//! grounded on `SmartstrapRequestType` and the generic-service framing
//! described in the original firmware's `utility/PebbleSerial.h`.

use crate::error::FrameError;

/// Direction/semantics of a generic-service request, carried in the
/// header's `type` byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    /// The host is reading an attribute.
    Read,
    /// The host is writing an attribute, no response expected.
    Write,
    /// The host is writing an attribute and expects a read response.
    WriteRead,
}

impl RequestType {
    /// Map a raw wire value to a known request type.
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Read),
            1 => Some(Self::Write),
            2 => Some(Self::WriteRead),
            _ => None,
        }
    }

    /// Map back to the raw wire value.
    #[must_use]
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Read => 0,
            Self::Write => 1,
            Self::WriteRead => 2,
        }
    }
}

/// Fixed 9-byte generic-service header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenericServiceHeader {
    /// Generic-service sub-protocol version (independent of
    /// [`crate::PROTOCOL_VERSION`]).
    pub version: u8,
    /// Target service ID.
    pub service_id: u16,
    /// Target attribute ID within the service.
    pub attribute_id: u16,
    /// Read/write/write-read direction.
    pub request_type: RequestType,
    /// Non-zero when this header is part of an error response.
    pub error: u8,
    /// Length, in bytes, of the attribute data following this header.
    pub length: u16,
}

impl GenericServiceHeader {
    /// Wire size of the header, not counting attribute data.
    pub const SIZE: usize = 9;

    /// Parse a header from its decoded wire bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::TooShort`] if `bytes` is shorter than
    /// [`Self::SIZE`], or [`FrameError::UnknownProfile`] if the `type` byte
    /// is not a recognized [`RequestType`].
    pub fn parse(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < Self::SIZE {
            log::trace!("smartstrap: generic-service header shorter than {} bytes", Self::SIZE);
            return Err(FrameError::TooShort);
        }
        let request_type = RequestType::from_u8(bytes[5]).ok_or_else(|| {
            log::trace!("smartstrap: unknown generic-service request type {}", bytes[5]);
            FrameError::UnknownProfile
        })?;
        Ok(Self {
            version: bytes[0],
            service_id: u16::from_le_bytes([bytes[1], bytes[2]]),
            attribute_id: u16::from_le_bytes([bytes[3], bytes[4]]),
            request_type,
            error: bytes[6],
            length: u16::from_le_bytes([bytes[7], bytes[8]]),
        })
    }

    /// Serialize into the 9-byte wire layout.
    #[must_use]
    pub fn to_wire(self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0] = self.version;
        buf[1..3].copy_from_slice(&self.service_id.to_le_bytes());
        buf[3..5].copy_from_slice(&self.attribute_id.to_le_bytes());
        buf[5] = self.request_type.to_u8();
        buf[6] = self.error;
        buf[7..9].copy_from_slice(&self.length.to_le_bytes());
        buf
    }
}
