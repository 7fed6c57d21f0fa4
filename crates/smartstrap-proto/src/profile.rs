//! Frame profile IDs.

/// The three profiles a frame's header can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Baud negotiation and connection-level signaling.
    LinkControl,
    /// Opaque application payload, handed straight to the application.
    RawData,
    /// Attribute-addressed request/response sub-protocol.
    GenericService,
}

impl Profile {
    /// Map a raw wire value to a known profile.
    #[must_use]
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(Self::LinkControl),
            2 => Some(Self::RawData),
            3 => Some(Self::GenericService),
            _ => None,
        }
    }

    /// Map back to the raw wire value.
    #[must_use]
    pub fn to_u16(self) -> u16 {
        match self {
            Self::LinkControl => 1,
            Self::RawData => 2,
            Self::GenericService => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_known_values() {
        for raw in [1u16, 2, 3] {
            let profile = Profile::from_u16(raw).unwrap();
            assert_eq!(profile.to_u16(), raw);
        }
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(Profile::from_u16(0).is_none());
        assert!(Profile::from_u16(4).is_none());
    }
}
