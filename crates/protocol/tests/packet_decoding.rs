//! End-to-end decoding checks against hand-built datagrams.

use pitwall_protocol::builders::{
    build_car_status_packet, build_car_telemetry_packet, build_event_packet,
    build_final_classification_packet, build_header_bytes, build_lap_data_packet,
    build_motion_packet, build_participants_packet, build_session_history_packet,
    build_session_packet,
};
use pitwall_protocol::{
    DecodeError, EventPayload, PacketBody, combine_split_time, decode_packet, EVENT_PACKET_SIZE,
    HEADER_SIZE, NUM_CARS, PACKET_ID_LAP_DATA,
};

#[test]
fn every_builder_packet_decodes_to_its_own_body_variant() {
    let cases: Vec<(Vec<u8>, fn(&PacketBody) -> bool)> = vec![
        (build_motion_packet(0, 1.0, 0.0), |b| {
            matches!(b, PacketBody::Motion(_))
        }),
        (build_session_packet(2, 56, 5441, 1417.0, 2984.0), |b| {
            matches!(b, PacketBody::Session(_))
        }),
        (build_lap_data_packet(0, 1, 1, 0), |b| {
            matches!(b, PacketBody::LapData(_))
        }),
        (build_event_packet(b"SSTA", &[]), |b| {
            matches!(b, PacketBody::Event(_))
        }),
        (build_participants_packet(&[(0, "P1")]), |b| {
            matches!(b, PacketBody::Participants(_))
        }),
        (build_car_telemetry_packet(0, 100, 3, 9_000), |b| {
            matches!(b, PacketBody::CarTelemetry(_))
        }),
        (build_car_status_packet(0, 10.0, 1), |b| {
            matches!(b, PacketBody::CarStatus(_))
        }),
        (build_final_classification_packet(20, 1, 0, 100.0), |b| {
            matches!(b, PacketBody::FinalClassification(_))
        }),
        (build_session_history_packet(0, 1, 90_000), |b| {
            matches!(b, PacketBody::SessionHistory(_))
        }),
    ];
    for (raw, is_expected) in cases {
        let decoded = decode_packet(&raw).unwrap();
        assert!(is_expected(&decoded.body), "wrong variant for id {}", decoded.header.packet_id);
    }
}

#[test]
fn decoding_is_idempotent() {
    let raw = build_lap_data_packet(9, 2, 30, 88_123);
    let first = decode_packet(&raw).unwrap();
    let second = decode_packet(&raw).unwrap();
    assert_eq!(first, second);
}

#[test]
fn per_car_packets_always_expose_22_entries() {
    let raw = build_participants_packet(&[(0, "SOLO")]);
    match decode_packet(&raw).unwrap().body {
        PacketBody::Participants(p) => {
            assert_eq!(p.num_active_cars, 1);
            assert_eq!(p.participants.len(), NUM_CARS);
        }
        other => panic!("expected participants, got {other:?}"),
    }
}

#[test]
fn split_time_reference_value() {
    assert_eq!(combine_split_time(1, 500), 60_500);
}

#[test]
fn truncated_body_is_rejected_not_misread() {
    let mut raw = build_lap_data_packet(0, 1, 1, 0);
    raw.truncate(raw.len() - 1);
    assert!(matches!(
        decode_packet(&raw),
        Err(DecodeError::TooShort { .. })
    ));
}

#[test]
fn header_only_datagram_fails_for_bodied_packet_ids() {
    let raw = build_header_bytes(2025, PACKET_ID_LAP_DATA, 0);
    assert!(matches!(
        decode_packet(&raw),
        Err(DecodeError::TooShort { .. })
    ));
}

#[test]
fn event_sub_protocol_dispatches_on_the_code() {
    let raw = build_event_packet(b"LGOT", &[]);
    assert_eq!(raw.len(), EVENT_PACKET_SIZE);
    match decode_packet(&raw).unwrap().body {
        PacketBody::Event(e) => {
            assert_eq!(e.code, *b"LGOT");
            assert_eq!(e.payload, EventPayload::LightsOut);
        }
        other => panic!("expected event, got {other:?}"),
    }
}

#[test]
fn unrecognised_event_code_is_preserved_verbatim() {
    let raw = build_event_packet(b"ZZZZ", &[1, 2, 3]);
    match decode_packet(&raw).unwrap().body {
        PacketBody::Event(e) => {
            assert_eq!(e.payload, EventPayload::Unrecognised { code: *b"ZZZZ" });
        }
        other => panic!("expected event, got {other:?}"),
    }
}

#[test]
fn oversized_datagram_decodes_using_only_the_documented_bytes() {
    let mut raw = build_car_status_packet(4, 33.3, 3);
    raw.extend_from_slice(&[0xFF; 64]);
    match decode_packet(&raw).unwrap().body {
        PacketBody::CarStatus(p) => {
            assert_eq!(p.cars[4].ers_deploy_mode, 3);
        }
        other => panic!("expected car status, got {other:?}"),
    }
}

#[test]
fn foreign_format_never_reaches_a_body_decoder() {
    let mut raw = build_session_packet(2, 56, 5441, 1417.0, 2984.0);
    raw[0..2].copy_from_slice(&2023u16.to_le_bytes());
    assert_eq!(
        decode_packet(&raw),
        Err(DecodeError::UnsupportedFormat {
            format: 2023,
            expected: 2025,
        })
    );
    // The header itself stays decodable.
    assert_eq!(raw[..HEADER_SIZE].len(), HEADER_SIZE);
}
