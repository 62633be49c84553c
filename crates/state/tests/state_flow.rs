//! Multi-packet flows through the store, including the derived
//! pace-delta computation.

use pitwall_protocol::builders::{
    build_lap_data_packet, build_session_history_packet, build_session_packet,
};
use pitwall_protocol::{decode_packet, HEADER_SIZE};
use pitwall_state::TelemetryStore;

fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_f32(buf: &mut [u8], offset: usize, value: f32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Session History for car 0 whose lap 1 has known sector times.
fn history_with_sectors(lap_time_ms: u32, s1_ms: u16, s2_ms: u16, s3_ms: u16) -> Vec<u8> {
    let mut raw = build_session_history_packet(0, 1, lap_time_ms);
    let lap_1 = HEADER_SIZE + 7;
    put_u16(&mut raw, lap_1 + 4, s1_ms);
    put_u16(&mut raw, lap_1 + 7, s2_ms);
    put_u16(&mut raw, lap_1 + 10, s3_ms);
    raw
}

/// Lap Data where car 0 is part-way through a lap.
fn lap_in_progress(lap_number: u8, current_time_ms: u32, lap_distance: f32) -> Vec<u8> {
    let mut raw = build_lap_data_packet(0, 1, lap_number, 0);
    let base = HEADER_SIZE;
    put_u32(&mut raw, base + 4, current_time_ms);
    put_f32(&mut raw, base + 20, lap_distance);
    raw
}

#[test]
fn pace_delta_apportions_inside_the_current_sector() {
    let store = TelemetryStore::new();
    // Shanghai: sectors end at 1417 m, 2984 m, 5441 m.
    let session = build_session_packet(2, 56, 5441, 1417.0, 2984.0);
    store.apply(&decode_packet(&session).unwrap());
    // Previous lap: 90 s total, 30 s per sector.
    let history = history_with_sectors(90_000, 30_000, 30_000, 30_000);
    store.apply(&decode_packet(&history).unwrap());
    // Lap 2, halfway through sector 1, 16 s elapsed.  The same point on
    // lap 1 took 15 s, so the car is 1 s down.
    let lap = lap_in_progress(2, 16_000, 708.5);
    store.apply(&decode_packet(&lap).unwrap());

    assert_eq!(store.snapshot().pace_delta_ms(0), Some(1_000));
}

#[test]
fn pace_delta_counts_completed_sectors_in_full() {
    let store = TelemetryStore::new();
    store.apply(&decode_packet(&build_session_packet(2, 56, 5441, 1417.0, 2984.0)).unwrap());
    store.apply(&decode_packet(&history_with_sectors(90_000, 30_000, 30_000, 30_000)).unwrap());
    // Start of sector 3: both full previous sectors count, none of s3.
    store.apply(&decode_packet(&lap_in_progress(2, 59_000, 2_984.0)).unwrap());

    assert_eq!(store.snapshot().pace_delta_ms(0), Some(-1_000));
}

#[test]
fn pace_delta_needs_history_and_a_completed_lap() {
    let store = TelemetryStore::new();
    store.apply(&decode_packet(&build_session_packet(2, 56, 5441, 1417.0, 2984.0)).unwrap());
    // Lap 1 has no previous lap.
    store.apply(&decode_packet(&lap_in_progress(1, 20_000, 500.0)).unwrap());
    assert_eq!(store.snapshot().pace_delta_ms(0), None);

    // Lap 2 without any history packet still yields nothing.
    store.apply(&decode_packet(&lap_in_progress(2, 20_000, 500.0)).unwrap());
    assert_eq!(store.snapshot().pace_delta_ms(0), None);
}

#[test]
fn pace_delta_survives_unknown_sector_boundaries() {
    let store = TelemetryStore::new();
    // No session packet: all boundary distances are zero length.
    store.apply(&decode_packet(&history_with_sectors(90_000, 30_000, 30_000, 30_000)).unwrap());
    store.apply(&decode_packet(&lap_in_progress(2, 91_500, 500.0)).unwrap());

    // Degenerate boundaries credit the whole previous lap; no NaN, no panic.
    assert_eq!(store.snapshot().pace_delta_ms(0), Some(1_500));
}

#[test]
fn sections_accumulate_across_packet_types() {
    let store = TelemetryStore::new();
    store.apply(&decode_packet(&build_session_packet(2, 56, 5441, 1417.0, 2984.0)).unwrap());
    store.apply(&decode_packet(&build_lap_data_packet(4, 7, 12, 91_250)).unwrap());

    let snap = store.snapshot();
    assert_eq!(snap.session.track_name(), "Shanghai");
    let lap = snap.cars[4].lap.unwrap();
    assert_eq!(lap.car_position, 7);
    assert_eq!(lap.current_lap_number, 12);
    assert_eq!(lap.last_lap_time_ms, 91_250);
    // Sections that have not arrived stay empty.
    assert!(snap.cars[4].telemetry.is_none());
    assert!(snap.cars[4].history.is_none());
}
