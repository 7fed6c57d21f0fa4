//! Outgoing frame serialization.
//!
//! The one place that writes a complete frame to the transport: flag
//! delimiters, escape-encoding every body byte, and accumulating the
//! trailing CRC-8 parity byte. Used by the dispatcher (link-control and
//! generic-service replies) and by the façade (`write`, `notify`).

use smartstrap_proto::{Crc8, FrameHeader, codec::FLAG, encode_byte};

use crate::transport::Transport;

/// Write `header` followed by every byte yielded by `body`, bracketed by
/// `FLAG` delimiters, with a trailing CRC-8 parity byte computed over
/// header + body.
pub(crate) fn emit_frame<T: Transport>(
    transport: &mut T,
    header: FrameHeader,
    body: impl Iterator<Item = u8>,
) {
    let mut crc = Crc8::new();
    transport.set_tx_enabled(true);
    transport.write_byte(FLAG);
    for byte in header.to_wire().into_iter().chain(body) {
        crc.update(byte);
        emit_body_byte(transport, byte);
    }
    emit_body_byte(transport, crc.value());
    transport.write_byte(FLAG);
    transport.set_tx_enabled(false);
}

fn emit_body_byte<T: Transport>(transport: &mut T, byte: u8) {
    let (encoded, needs_escape) = encode_byte(byte);
    if needs_escape {
        transport.write_byte(smartstrap_proto::codec::ESCAPE);
    }
    transport.write_byte(encoded);
}

#[cfg(test)]
mod tests {
    use smartstrap_proto::{FrameFlags, Profile};

    use super::*;

    struct RecordingTransport {
        bytes: std::vec::Vec<u8>,
        tx_enabled: bool,
    }

    impl Transport for RecordingTransport {
        fn set_baud_rate(&mut self, _baud: u32) {}

        fn set_tx_enabled(&mut self, enabled: bool) {
            self.tx_enabled = enabled;
        }

        fn write_byte(&mut self, byte: u8) {
            self.bytes.push(byte);
        }

        fn write_break(&mut self) {}
    }

    #[test]
    fn emits_flag_delimited_frame_with_correct_parity() {
        let mut transport = RecordingTransport { bytes: std::vec::Vec::new(), tx_enabled: false };
        let header = FrameHeader {
            version: 1,
            flags: FrameFlags::empty(),
            profile: Profile::RawData.to_u16(),
        };
        emit_frame(&mut transport, header, [0xAAu8, 0xBB].into_iter());

        assert!(!transport.tx_enabled);
        assert_eq!(transport.bytes.first(), Some(&FLAG));
        assert_eq!(transport.bytes.last(), Some(&FLAG));

        let body = &transport.bytes[1..transport.bytes.len() - 1];
        let mut crc = Crc8::new();
        crc.update_all(body);
        assert_eq!(crc.value(), 0);
    }
}
