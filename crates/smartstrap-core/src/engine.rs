//! Public façade: `init`, `prepare_for_read`, `handle_byte`, `write`,
//! `notify`, `is_connected`.
//!
//! Bundles every piece of engine state behind one value the integrator
//! owns, instead of the reference firmware's process globals — this
//! removes reentrancy hazards and allows more than one instance per
//! program (spec §9).

use smartstrap_proto::{FrameFlags, FrameHeader, PROTOCOL_VERSION, Profile, RequestType};

use crate::{
    dispatcher::{self, DispatchOutcome},
    error::WriteError,
    frame_assembler::{FrameAssembler, FrameOutcome},
    link_manager::LinkManager,
    transport::Transport,
    wire,
};

#[derive(Debug, Clone, Copy)]
struct PendingResponse {
    can_respond: bool,
    service_id: u16,
    attribute_id: u16,
    request_type: RequestType,
}

/// The smartstrap accessory protocol engine.
///
/// Generic over the transport implementation `T` (held by value for the
/// engine's lifetime, registered once at [`Engine::init`]) and over two
/// lifetimes: `'buf` for the payload buffer supplied to
/// [`Engine::prepare_for_read`], and `'svc` for the integrator-owned
/// service ID list.
pub struct Engine<'buf, 'svc, T: Transport> {
    transport: T,
    link: LinkManager,
    services: &'svc [u16],
    assembler: Option<FrameAssembler<'buf>>,
    pending: Option<PendingResponse>,
    last_notification: Option<(u16, u16)>,
}

impl<'buf, 'svc, T: Transport> Engine<'buf, 'svc, T> {
    /// Record `target_baud` and `services`, and force the transport to
    /// 9600 baud.
    pub fn init(mut transport: T, target_baud: u32, services: &'svc [u16]) -> Self {
        transport.set_baud_rate(crate::link_manager::DEFAULT_BAUD);
        Self {
            transport,
            link: LinkManager::new(target_baud),
            services,
            assembler: None,
            pending: None,
            last_notification: None,
        }
    }

    /// Reset the assembler to a fresh frame bound to `buffer`. Idempotent:
    /// calling this twice in a row is equivalent to calling it once.
    pub fn prepare_for_read(&mut self, buffer: &'buf mut [u8]) {
        self.pending = None;
        self.assembler = Some(FrameAssembler::new(buffer));
    }

    /// Feed one wire byte. Returns `true` exactly once per
    /// application-visible completed frame, writing the request's
    /// addressing and length into the `out_*` parameters.
    ///
    /// Returns `false` when the frame is incomplete, dropped, or consumed
    /// internally (link-control, or an intercepted generic-service
    /// attribute) — and when no [`Engine::prepare_for_read`] call is
    /// currently active.
    ///
    /// Bytes that arrive while a surfaced request is still awaiting
    /// [`Engine::write`]/[`Engine::try_write`] are dropped: the façade only
    /// ever has one outstanding request at a time, so nothing may be
    /// assembled until the integrator responds or calls
    /// [`Engine::prepare_for_read`] again.
    pub fn handle_byte(
        &mut self,
        byte: u8,
        out_service_id: &mut u16,
        out_attribute_id: &mut u16,
        out_length: &mut usize,
        out_request_type: &mut RequestType,
        time_ms: u32,
    ) -> bool {
        self.link.check_timeout(time_ms, &mut self.transport);

        if self.pending.is_some() {
            return false;
        }

        let outcome = match &mut self.assembler {
            Some(assembler) => assembler.handle_byte(byte),
            None => return false,
        };

        let (header, payload_length) = match outcome {
            FrameOutcome::Complete { header, payload_length } => (header, payload_length),
            FrameOutcome::Incomplete | FrameOutcome::Dropped => return false,
        };

        self.link.note_valid_frame(time_ms);

        let payload = {
            let assembler = self.assembler.as_ref().expect("assembler present, checked above");
            &assembler.payload()[..payload_length]
        };

        let dispatch_outcome = dispatcher::dispatch(
            &header,
            payload,
            &mut self.link,
            self.services,
            self.last_notification,
            &mut self.transport,
        );

        match dispatch_outcome {
            DispatchOutcome::Handled => {
                if let Some(assembler) = &mut self.assembler {
                    assembler.start_next_frame();
                }
                false
            },
            DispatchOutcome::Surface { service_id, attribute_id, length, request_type } => {
                self.pending =
                    Some(PendingResponse { can_respond: true, service_id, attribute_id, request_type });
                *out_service_id = service_id;
                *out_attribute_id = attribute_id;
                *out_length = length;
                *out_request_type = request_type;
                true
            },
        }
    }

    /// Emit a response to the request most recently surfaced by
    /// [`Engine::handle_byte`]. Returns `false` if no request is pending or
    /// its addressing is invalid; see [`Engine::try_write`] for the reason.
    pub fn write(&mut self, success: bool, payload: &[u8], length: usize) -> bool {
        self.try_write(success, payload, length).is_ok()
    }

    /// As [`Engine::write`], but reports why a failed write was rejected.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::NoPendingRequest`] if no surfaced request is
    /// awaiting a response, or [`WriteError::InvalidAddressing`] if the
    /// pending request's service/attribute addressing cannot be answered.
    pub fn try_write(&mut self, success: bool, payload: &[u8], length: usize) -> Result<(), WriteError> {
        let pending = match self.pending {
            Some(p) if p.can_respond => p,
            _ => {
                log::debug!("smartstrap: write() with no pending request");
                return Err(WriteError::NoPendingRequest);
            },
        };
        validate_addressing(pending.service_id, pending.attribute_id)?;

        let data = &payload[..length.min(payload.len())];
        if pending.service_id == 0 {
            let header =
                FrameHeader { version: PROTOCOL_VERSION, flags: FrameFlags::empty(), profile: Profile::RawData.to_u16() };
            wire::emit_frame(&mut self.transport, header, data.iter().copied());
        } else {
            let gs_header = smartstrap_proto::GenericServiceHeader {
                version: PROTOCOL_VERSION,
                service_id: pending.service_id,
                attribute_id: pending.attribute_id,
                request_type: pending.request_type,
                error: u8::from(!success),
                length: data.len() as u16,
            };
            let header = FrameHeader {
                version: PROTOCOL_VERSION,
                flags: FrameFlags::empty(),
                profile: Profile::GenericService.to_u16(),
            };
            wire::emit_frame(&mut self.transport, header, gs_header.to_wire().into_iter().chain(data.iter().copied()));
        }

        self.pending = None;
        if let Some(assembler) = &mut self.assembler {
            assembler.start_next_frame();
        }
        Ok(())
    }

    /// Send a break burst followed by an empty notification frame on the
    /// profile matching `service_id` (RawData when zero, else
    /// GenericService). The host uses this as a wakeup to poll
    /// `notification-info`.
    pub fn notify(&mut self, service_id: u16, attribute_id: u16) {
        self.last_notification = Some((service_id, attribute_id));
        self.transport.write_break();
        self.transport.write_break();
        self.transport.write_break();

        let profile = if service_id == 0 { Profile::RawData } else { Profile::GenericService };
        let header = FrameHeader {
            version: PROTOCOL_VERSION,
            flags: FrameFlags::IS_NOTIFICATION,
            profile: profile.to_u16(),
        };
        wire::emit_frame(&mut self.transport, header, core::iter::empty());
    }

    /// Current connection state, applying the 10-second inactivity rule.
    pub fn is_connected(&mut self, time_ms: u32) -> bool {
        self.link.is_connected(time_ms, &mut self.transport)
    }
}

fn validate_addressing(service_id: u16, attribute_id: u16) -> Result<(), WriteError> {
    if service_id == 0 && attribute_id != 0 {
        return Err(WriteError::InvalidAddressing);
    }
    if service_id > 0 && service_id < 0x00FF {
        return Err(WriteError::InvalidAddressing);
    }
    Ok(())
}
