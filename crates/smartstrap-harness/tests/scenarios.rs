//! End-to-end scenario tests from the engine's test plan (S1-S6), driven
//! through `RecordingTransport`.

use smartstrap_core::Engine;
use smartstrap_harness::{
    RecordingTransport,
    scenario::{encode_frame, replay},
};
use smartstrap_proto::{FrameFlags, GenericServiceHeader, Profile, RequestType};

fn feed(
    engine: &mut Engine<'_, '_, RecordingTransport>,
    wire: &[u8],
    time_ms: u32,
) -> Option<(u16, u16, usize, RequestType)> {
    let mut service_id = 0;
    let mut attribute_id = 0;
    let mut length = 0;
    let mut request_type = RequestType::Read;
    let mut surfaced = None;
    replay(wire, |byte| {
        if engine.handle_byte(byte, &mut service_id, &mut attribute_id, &mut length, &mut request_type, time_ms) {
            surfaced = Some((service_id, attribute_id, length, request_type));
        }
    });
    surfaced
}

#[test]
fn s1_minimal_raw_data_read_request() {
    let services = [0x0000u16];
    let mut engine = Engine::init(RecordingTransport::new(), 9600, &services);
    let mut buf = [0u8; 16];
    engine.prepare_for_read(&mut buf);

    let flags = (FrameFlags::IS_MASTER | FrameFlags::IS_READ).bits();
    let wire = encode_frame(1, flags, Profile::RawData.to_u16(), &[]);
    let surfaced = feed(&mut engine, &wire, 0);

    assert_eq!(surfaced, Some((0, 0, 0, RequestType::Read)));
    assert!(engine.write(true, &[0xAA, 0xBB], 2));
}

#[test]
fn s2_baud_handshake() {
    let services = [0x0000u16];
    let transport = RecordingTransport::new();
    let mut engine = Engine::init(transport, 250_000, &services);
    let mut buf = [0u8; 16];

    let master = FrameFlags::IS_MASTER.bits();
    engine.prepare_for_read(&mut buf);
    let status = encode_frame(1, master, Profile::LinkControl.to_u16(), &[1]);
    feed(&mut engine, &status, 0);
    assert!(!engine.is_connected(0));

    engine.prepare_for_read(&mut buf);
    let baud = encode_frame(1, master, Profile::LinkControl.to_u16(), &[3]);
    feed(&mut engine, &baud, 0);

    engine.prepare_for_read(&mut buf);
    let status2 = encode_frame(1, master, Profile::LinkControl.to_u16(), &[1]);
    feed(&mut engine, &status2, 0);
    assert!(engine.is_connected(0));
}

#[test]
fn s3_service_discovery_via_generic_service() {
    let services = [0x0000u16, 0x1001];
    let mut engine = Engine::init(RecordingTransport::new(), 9600, &services);
    let mut buf = [0u8; 32];
    engine.prepare_for_read(&mut buf);

    let request = GenericServiceHeader {
        version: 1,
        service_id: 0x0101,
        attribute_id: 0x0001,
        request_type: RequestType::Read,
        error: 0,
        length: 0,
    };
    let master = FrameFlags::IS_MASTER.bits();
    let wire = encode_frame(1, master, Profile::GenericService.to_u16(), &request.to_wire());
    let surfaced = feed(&mut engine, &wire, 0);
    assert_eq!(surfaced, None);
}

#[test]
fn s4_escape_handling_round_trips_payload() {
    let services = [0x0000u16];
    let mut engine = Engine::init(RecordingTransport::new(), 9600, &services);
    let mut buf = [0u8; 8];
    engine.prepare_for_read(&mut buf);

    let flags = (FrameFlags::IS_MASTER | FrameFlags::IS_READ).bits();
    let wire = encode_frame(1, flags, Profile::RawData.to_u16(), &[0x7D, 0x7E]);
    let surfaced = feed(&mut engine, &wire, 0);
    assert_eq!(surfaced, Some((0, 0, 2, RequestType::WriteRead)));
}

#[test]
fn s5_overrun_safety() {
    let services = [0x0000u16];
    let mut engine = Engine::init(RecordingTransport::new(), 9600, &services);
    let mut buf = [0u8; 4];
    engine.prepare_for_read(&mut buf);

    let flags = (FrameFlags::IS_MASTER | FrameFlags::IS_READ).bits();
    let big_payload = [0xABu8; 10];
    let wire = encode_frame(1, flags, Profile::RawData.to_u16(), &big_payload);
    let surfaced = feed(&mut engine, &wire, 0);
    assert_eq!(surfaced, None);
    assert!(buf.iter().all(|&b| b == 0 || b == 0xAB));
}

#[test]
fn s6_inactivity_timeout_falls_back_to_default_baud() {
    let services = [0x0000u16];
    let mut engine = Engine::init(RecordingTransport::new(), 250_000, &services);
    let mut buf = [0u8; 16];

    let master = FrameFlags::IS_MASTER.bits();
    engine.prepare_for_read(&mut buf);
    feed(&mut engine, &encode_frame(1, master, Profile::LinkControl.to_u16(), &[3]), 0);
    engine.prepare_for_read(&mut buf);
    feed(&mut engine, &encode_frame(1, master, Profile::LinkControl.to_u16(), &[1]), 1_000);
    assert!(engine.is_connected(1_000));

    assert!(!engine.is_connected(1_000 + smartstrap_core::INACTIVITY_TIMEOUT_MS + 1));
}
