//! Profile-based routing of validated frames.
//!
//! Once the assembler has produced a [`FrameOutcome::Complete`] frame, this
//! module decides what happens to it: link-control frames are answered
//! entirely internally, two well-known generic-service attributes are
//! intercepted and answered internally, and everything else is surfaced to
//! the application.

use smartstrap_proto::{
    FrameFlags, FrameHeader, GenericServiceHeader, LinkControlStatus, LinkControlType, Profile,
    RequestType, link_control::BAUD_ACK_STATUS,
};

use crate::{frame_assembler::AssembledHeader, link_manager::LinkManager, transport::Transport, wire};

/// Generic-service service/attribute ID that triggers the built-in service
/// discovery response.
const SERVICE_DISCOVERY: (u16, u16) = (0x0101, 0x0001);
/// Generic-service service/attribute ID that triggers the built-in
/// notification-info response.
const NOTIFICATION_INFO: (u16, u16) = (0x0101, 0x0002);

/// What the dispatcher did with a validated frame.
#[derive(Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The frame was answered (or silently ignored) internally; nothing to
    /// surface to the application.
    Handled,
    /// The frame should be surfaced to the application.
    Surface { service_id: u16, attribute_id: u16, length: usize, request_type: RequestType },
}

/// Route one validated frame.
pub fn dispatch<T: Transport>(
    header: &AssembledHeader,
    payload: &[u8],
    link: &mut LinkManager,
    services: &[u16],
    last_notification: Option<(u16, u16)>,
    transport: &mut T,
) -> DispatchOutcome {
    match Profile::from_u16(header.profile) {
        Some(Profile::LinkControl) => {
            handle_link_control(payload, link, services, transport);
            DispatchOutcome::Handled
        },
        Some(Profile::GenericService) => {
            handle_generic_service(payload, services, last_notification, transport)
        },
        Some(Profile::RawData) => handle_raw_data(header, payload),
        None => DispatchOutcome::Handled,
    }
}

fn reply_header(profile: Profile) -> FrameHeader {
    FrameHeader { version: smartstrap_proto::PROTOCOL_VERSION, flags: FrameFlags::empty(), profile: profile.to_u16() }
}

fn handle_link_control<T: Transport>(
    payload: &[u8],
    link: &mut LinkManager,
    services: &[u16],
    transport: &mut T,
) {
    let Some(&type_byte) = payload.first() else {
        log::trace!("smartstrap: link-control frame with no type byte");
        return;
    };
    let Some(link_type) = LinkControlType::from_u8(type_byte) else {
        log::trace!("smartstrap: unknown link-control type {type_byte}");
        return;
    };

    match link_type {
        LinkControlType::Status => {
            let status = if link.current_baud() == link.target_baud() {
                link.mark_connected();
                LinkControlStatus::Ok
            } else {
                LinkControlStatus::BaudRate
            };
            let body = [LinkControlType::Status.to_u8(), status.to_u8()];
            wire::emit_frame(transport, reply_header(Profile::LinkControl), body.into_iter());
        },
        LinkControlType::Profiles => {
            let mut ids = [0u16; 2];
            let mut n = 0;
            if services.contains(&0x0000) {
                ids[n] = Profile::RawData.to_u16();
                n += 1;
            }
            if services.iter().any(|&id| id > 0x0000) {
                ids[n] = Profile::GenericService.to_u16();
                n += 1;
            }
            let body = core::iter::once(LinkControlType::Profiles.to_u8())
                .chain(ids[..n].iter().flat_map(|id| id.to_le_bytes()));
            wire::emit_frame(transport, reply_header(Profile::LinkControl), body);
        },
        LinkControlType::Baud => {
            let body = [LinkControlType::Baud.to_u8(), BAUD_ACK_STATUS];
            wire::emit_frame(transport, reply_header(Profile::LinkControl), body.into_iter());
            link.begin_baud_switch(transport);
        },
    }
}

fn handle_generic_service<T: Transport>(
    payload: &[u8],
    services: &[u16],
    last_notification: Option<(u16, u16)>,
    transport: &mut T,
) -> DispatchOutcome {
    let Ok(request) = GenericServiceHeader::parse(payload) else {
        log::trace!("smartstrap: malformed generic-service header");
        return DispatchOutcome::Handled;
    };
    let data = &payload[GenericServiceHeader::SIZE..];

    match (request.service_id, request.attribute_id) {
        SERVICE_DISCOVERY => {
            let reply = GenericServiceHeader {
                version: request.version,
                service_id: request.service_id,
                attribute_id: request.attribute_id,
                request_type: RequestType::Read,
                error: 0,
                length: (services.len() * 2) as u16,
            };
            let body = reply
                .to_wire()
                .into_iter()
                .chain(services.iter().flat_map(|id| id.to_le_bytes()));
            wire::emit_frame(transport, reply_header(Profile::GenericService), body);
            DispatchOutcome::Handled
        },
        NOTIFICATION_INFO => {
            let (service_id, attribute_id) = last_notification.unwrap_or((0, 0));
            let reply = GenericServiceHeader {
                version: request.version,
                service_id: request.service_id,
                attribute_id: request.attribute_id,
                request_type: RequestType::Read,
                error: 0,
                length: 4,
            };
            let body = reply
                .to_wire()
                .into_iter()
                .chain(service_id.to_le_bytes())
                .chain(attribute_id.to_le_bytes());
            wire::emit_frame(transport, reply_header(Profile::GenericService), body);
            DispatchOutcome::Handled
        },
        _ => DispatchOutcome::Surface {
            service_id: request.service_id,
            attribute_id: request.attribute_id,
            length: data.len(),
            request_type: request.request_type,
        },
    }
}

fn handle_raw_data(header: &AssembledHeader, payload: &[u8]) -> DispatchOutcome {
    let request_type = if header.flags.contains(FrameFlags::IS_READ) {
        if payload.is_empty() { RequestType::Read } else { RequestType::WriteRead }
    } else {
        RequestType::Write
    };
    DispatchOutcome::Surface { service_id: 0, attribute_id: 0, length: payload.len(), request_type }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingTransport {
        frames: std::vec::Vec<std::vec::Vec<u8>>,
        current: std::vec::Vec<u8>,
        baud_calls: std::vec::Vec<u32>,
    }

    impl RecordingTransport {
        fn new() -> Self {
            Self { frames: std::vec::Vec::new(), current: std::vec::Vec::new(), baud_calls: std::vec::Vec::new() }
        }
    }

    impl Transport for RecordingTransport {
        fn set_baud_rate(&mut self, baud: u32) {
            self.baud_calls.push(baud);
        }

        fn set_tx_enabled(&mut self, enabled: bool) {
            if enabled {
                self.current.clear();
            } else {
                self.frames.push(core::mem::take(&mut self.current));
            }
        }

        fn write_byte(&mut self, byte: u8) {
            self.current.push(byte);
        }

        fn write_break(&mut self) {}
    }

    #[test]
    fn status_reply_reports_ok_when_baud_matches() {
        let mut link = LinkManager::new(9600);
        let mut transport = RecordingTransport::new();
        let payload = [LinkControlType::Status.to_u8()];
        let outcome =
            dispatch(&header(Profile::LinkControl), &payload, &mut link, &[0x0000], None, &mut transport);
        assert_eq!(outcome, DispatchOutcome::Handled);
        assert_eq!(transport.frames.len(), 1);
    }

    #[test]
    fn profiles_reply_includes_raw_data_and_generic_service() {
        let mut link = LinkManager::new(9600);
        let mut transport = RecordingTransport::new();
        let payload = [LinkControlType::Profiles.to_u8()];
        dispatch(
            &header(Profile::LinkControl),
            &payload,
            &mut link,
            &[0x0000, 0x1001],
            None,
            &mut transport,
        );
        assert_eq!(transport.frames.len(), 1);
    }

    #[test]
    fn baud_frame_switches_baud_after_replying() {
        let mut link = LinkManager::new(250_000);
        let mut transport = RecordingTransport::new();
        let payload = [LinkControlType::Baud.to_u8()];
        dispatch(&header(Profile::LinkControl), &payload, &mut link, &[], None, &mut transport);
        assert_eq!(transport.baud_calls, std::vec![250_000]);
        assert_eq!(link.current_baud(), 250_000);
    }

    #[test]
    fn raw_data_read_is_surfaced() {
        let hdr = AssembledHeader {
            version: 1,
            flags: FrameFlags::IS_MASTER | FrameFlags::IS_READ,
            profile: Profile::RawData.to_u16(),
        };
        let mut link = LinkManager::new(9600);
        let mut transport = RecordingTransport::new();
        let outcome = dispatch(&hdr, &[], &mut link, &[0x0000], None, &mut transport);
        assert_eq!(
            outcome,
            DispatchOutcome::Surface {
                service_id: 0,
                attribute_id: 0,
                length: 0,
                request_type: RequestType::Read
            }
        );
    }

    fn header(profile: Profile) -> AssembledHeader {
        AssembledHeader { version: 1, flags: FrameFlags::IS_MASTER, profile: profile.to_u16() }
    }
}
