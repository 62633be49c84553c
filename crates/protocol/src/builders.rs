//! Test packet builders.
//!
//! Each builder produces a full-size, zero-padded datagram with a valid
//! header and just enough interesting fields set to exercise a decoder.
//! They live in the library (not `#[cfg(test)]`) so downstream crates can
//! build realistic packets in their own tests.

use crate::{
    CAR_DAMAGE_ENTRY_SIZE, CAR_DAMAGE_PACKET_SIZE, CAR_STATUS_ENTRY_SIZE,
    CAR_STATUS_PACKET_SIZE, CAR_TELEMETRY_ENTRY_SIZE, CAR_TELEMETRY_PACKET_SIZE,
    CLASSIFICATION_ENTRY_SIZE, EVENT_PACKET_SIZE, FINAL_CLASSIFICATION_PACKET_SIZE,
    HEADER_SIZE, LAP_DATA_ENTRY_SIZE, LAP_DATA_PACKET_SIZE, LAP_HISTORY_ENTRY_SIZE,
    LAP_POSITIONS_PACKET_SIZE, MOTION_ENTRY_SIZE, MOTION_PACKET_SIZE, NUM_CARS,
    NUM_LAP_POSITION_LAPS, PACKET_ID_CAR_DAMAGE, PACKET_ID_CAR_STATUS,
    PACKET_ID_CAR_TELEMETRY, PACKET_ID_EVENT, PACKET_ID_FINAL_CLASSIFICATION,
    PACKET_ID_LAP_DATA, PACKET_ID_LAP_POSITIONS, PACKET_ID_MOTION, PACKET_ID_PARTICIPANTS,
    PACKET_ID_SESSION, PACKET_ID_SESSION_HISTORY, PACKET_ID_TIME_TRIAL, PACKET_ID_TYRE_SETS,
    PARTICIPANT_ENTRY_SIZE, PARTICIPANTS_PACKET_SIZE, SESSION_HISTORY_PACKET_SIZE,
    SESSION_PACKET_SIZE, TIME_TRIAL_PACKET_SIZE, TIME_TRIAL_SET_SIZE, TYRE_SET_ENTRY_SIZE,
    TYRE_SETS_PACKET_SIZE,
};

/// Default session UID written by the builders.
pub const BUILDER_SESSION_UID: u64 = 0x00C0_FFEE_0000_2025;

fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_u64(buf: &mut [u8], offset: usize, value: u64) {
    buf[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
}

fn put_f32(buf: &mut [u8], offset: usize, value: f32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_f64(buf: &mut [u8], offset: usize, value: f64) {
    buf[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
}

/// A 29-byte header with a caller-chosen session UID.
pub fn build_header_bytes_with_uid(
    packet_format: u16,
    packet_id: u8,
    player_car_index: u8,
    session_uid: u64,
) -> Vec<u8> {
    let mut buf = vec![0u8; HEADER_SIZE];
    put_u16(&mut buf, 0, packet_format);
    buf[2] = 25; // game year
    buf[3] = 1; // major version
    buf[4] = 12; // minor version
    buf[5] = 1; // packet version
    buf[6] = packet_id;
    put_u64(&mut buf, 7, session_uid);
    put_f32(&mut buf, 15, 123.5); // session time
    put_u32(&mut buf, 19, 1_000); // frame identifier
    put_u32(&mut buf, 23, 1_000); // overall frame identifier
    buf[27] = player_car_index;
    buf[28] = 255; // no secondary player
    buf
}

/// A 29-byte header with the default builder session UID.
pub fn build_header_bytes(packet_format: u16, packet_id: u8, player_car_index: u8) -> Vec<u8> {
    build_header_bytes_with_uid(
        packet_format,
        packet_id,
        player_car_index,
        BUILDER_SESSION_UID,
    )
}

fn packet_with_header(size: usize, packet_id: u8) -> Vec<u8> {
    let mut buf = build_header_bytes(2025, packet_id, 0);
    buf.resize(size, 0);
    buf
}

/// Motion packet with position and lateral g set for one car.
pub fn build_motion_packet(car_index: usize, world_x: f32, g_lateral: f32) -> Vec<u8> {
    let mut buf = packet_with_header(MOTION_PACKET_SIZE, PACKET_ID_MOTION);
    let base = HEADER_SIZE + car_index * MOTION_ENTRY_SIZE;
    put_f32(&mut buf, base, world_x);
    put_f32(&mut buf, base + 36, g_lateral);
    buf
}

/// Session packet with track identity and sector boundaries set.
pub fn build_session_packet(
    track_id: i8,
    total_laps: u8,
    track_length: u16,
    sector_2_start: f32,
    sector_3_start: f32,
) -> Vec<u8> {
    let mut buf = packet_with_header(SESSION_PACKET_SIZE, PACKET_ID_SESSION);
    let body = HEADER_SIZE;
    buf[body + 3] = total_laps;
    put_u16(&mut buf, body + 4, track_length);
    buf[body + 6] = 10; // session type: race
    buf[body + 7] = track_id as u8;
    buf[body + 18] = 3; // num marshal zones claimed live
    put_f32(&mut buf, body + 716, sector_2_start);
    put_f32(&mut buf, body + 720, sector_3_start);
    buf
}

/// Lap Data packet with one car's headline fields set.
///
/// The target car also gets a sector 1 split of 1:05.250 written as the
/// wire's (milliseconds, minutes) pair, and the time-trial trailer is set
/// to the "no car" sentinel.
pub fn build_lap_data_packet(
    car_index: usize,
    car_position: u8,
    current_lap_number: u8,
    last_lap_time_ms: u32,
) -> Vec<u8> {
    let mut buf = packet_with_header(LAP_DATA_PACKET_SIZE, PACKET_ID_LAP_DATA);
    let base = HEADER_SIZE + car_index * LAP_DATA_ENTRY_SIZE;
    put_u32(&mut buf, base, last_lap_time_ms);
    put_u16(&mut buf, base + 8, 5_250); // sector 1 ms part
    buf[base + 10] = 1; // sector 1 minutes part
    buf[base + 32] = car_position;
    buf[base + 33] = current_lap_number;
    buf[base + 44] = 4; // driver status: on track
    buf[base + 45] = 2; // result status: active
    let trailer = HEADER_SIZE + NUM_CARS * LAP_DATA_ENTRY_SIZE;
    buf[trailer] = 255;
    buf[trailer + 1] = 255;
    buf
}

/// Event packet for `code`, zero-padded to the full 45 bytes.
pub fn build_event_packet(code: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut buf = packet_with_header(EVENT_PACKET_SIZE, PACKET_ID_EVENT);
    buf[HEADER_SIZE..HEADER_SIZE + 4].copy_from_slice(code);
    buf[HEADER_SIZE + 4..HEADER_SIZE + 4 + payload.len()].copy_from_slice(payload);
    buf
}

/// Participants packet; one `(ai_controlled, name)` pair per leading slot.
pub fn build_participants_packet(entries: &[(u8, &str)]) -> Vec<u8> {
    let mut buf = packet_with_header(PARTICIPANTS_PACKET_SIZE, PACKET_ID_PARTICIPANTS);
    buf[HEADER_SIZE] = entries.len() as u8;
    for (index, (ai_controlled, name)) in entries.iter().enumerate() {
        let base = HEADER_SIZE + 1 + index * PARTICIPANT_ENTRY_SIZE;
        buf[base] = *ai_controlled;
        buf[base + 5] = (index + 1) as u8; // race number
        let name_bytes = name.as_bytes();
        let n = name_bytes.len().min(31);
        buf[base + 7..base + 7 + n].copy_from_slice(&name_bytes[..n]);
    }
    buf
}

/// Car Telemetry packet with speed, gear and rpm set for one car.
pub fn build_car_telemetry_packet(
    car_index: usize,
    speed_kmh: u16,
    gear: i8,
    engine_rpm: u16,
) -> Vec<u8> {
    let mut buf = packet_with_header(CAR_TELEMETRY_PACKET_SIZE, PACKET_ID_CAR_TELEMETRY);
    let base = HEADER_SIZE + car_index * CAR_TELEMETRY_ENTRY_SIZE;
    put_u16(&mut buf, base, speed_kmh);
    buf[base + 15] = gear as u8;
    put_u16(&mut buf, base + 16, engine_rpm);
    buf
}

/// Car Status packet with fuel and ERS deploy mode set for one car.
pub fn build_car_status_packet(car_index: usize, fuel_in_tank: f32, ers_deploy_mode: u8) -> Vec<u8> {
    let mut buf = packet_with_header(CAR_STATUS_PACKET_SIZE, PACKET_ID_CAR_STATUS);
    let base = HEADER_SIZE + car_index * CAR_STATUS_ENTRY_SIZE;
    put_f32(&mut buf, base + 5, fuel_in_tank);
    buf[base + 41] = ers_deploy_mode;
    buf
}

/// Final Classification packet with one car's result set.
pub fn build_final_classification_packet(
    num_cars: u8,
    position: u8,
    car_index: usize,
    total_race_time_sec: f64,
) -> Vec<u8> {
    let mut buf = packet_with_header(
        FINAL_CLASSIFICATION_PACKET_SIZE,
        PACKET_ID_FINAL_CLASSIFICATION,
    );
    buf[HEADER_SIZE] = num_cars;
    let base = HEADER_SIZE + 1 + car_index * CLASSIFICATION_ENTRY_SIZE;
    buf[base] = position;
    buf[base + 5] = 3; // result status: finished
    put_f64(&mut buf, base + 11, total_race_time_sec);
    buf
}

/// Session History packet with the first lap's time set.
pub fn build_session_history_packet(car_index: u8, num_laps: u8, lap_1_time_ms: u32) -> Vec<u8> {
    let mut buf = packet_with_header(SESSION_HISTORY_PACKET_SIZE, PACKET_ID_SESSION_HISTORY);
    let body = HEADER_SIZE;
    buf[body] = car_index;
    buf[body + 1] = num_laps;
    buf[body + 2] = 1; // num tyre stints
    buf[body + 3] = 1; // best lap number
    put_u32(&mut buf, body + 7, lap_1_time_ms);
    buf[body + 7 + LAP_HISTORY_ENTRY_SIZE - 1] = 0x0F; // lap 1 fully valid
    buf
}

/// Car Damage packet with uniform tyre wear and a wing hit for one car.
pub fn build_car_damage_packet(car_index: usize, tyre_wear: f32, front_left_wing: u8) -> Vec<u8> {
    let mut buf = packet_with_header(CAR_DAMAGE_PACKET_SIZE, PACKET_ID_CAR_DAMAGE);
    let base = HEADER_SIZE + car_index * CAR_DAMAGE_ENTRY_SIZE;
    for wheel in 0..4 {
        put_f32(&mut buf, base + wheel * 4, tyre_wear);
    }
    buf[base + 28] = front_left_wing;
    buf
}

/// Tyre Sets packet with the fitted set marked and lightly worn.
pub fn build_tyre_sets_packet(car_index: u8, fitted_index: u8) -> Vec<u8> {
    let mut buf = packet_with_header(TYRE_SETS_PACKET_SIZE, PACKET_ID_TYRE_SETS);
    let body = HEADER_SIZE;
    buf[body] = car_index;
    let set = body + 1 + usize::from(fitted_index) * TYRE_SET_ENTRY_SIZE;
    buf[set] = 16; // actual compound: C5
    buf[set + 2] = 30; // wear percent
    buf[set + 9] = 1; // fitted
    buf[body + 1 + 20 * TYRE_SET_ENTRY_SIZE] = fitted_index;
    buf
}

/// Time Trial packet with session-best and rival lap times set.
pub fn build_time_trial_packet(session_best_ms: u32, rival_ms: u32) -> Vec<u8> {
    let mut buf = packet_with_header(TIME_TRIAL_PACKET_SIZE, PACKET_ID_TIME_TRIAL);
    put_u32(&mut buf, HEADER_SIZE + 2, session_best_ms);
    put_u32(&mut buf, HEADER_SIZE + 2 * TIME_TRIAL_SET_SIZE + 2, rival_ms);
    buf
}

/// Lap Positions packet where cars 0 and 1 run P1 and P2 on every
/// live lap.
pub fn build_lap_positions_packet(num_laps: u8, lap_start: u8) -> Vec<u8> {
    let mut buf = packet_with_header(LAP_POSITIONS_PACKET_SIZE, PACKET_ID_LAP_POSITIONS);
    let body = HEADER_SIZE;
    buf[body] = num_laps;
    buf[body + 1] = lap_start;
    let live = usize::from(num_laps).min(NUM_LAP_POSITION_LAPS);
    for row in 0..live {
        let base = body + 2 + row * NUM_CARS;
        buf[base] = 1;
        buf[base + 1] = 2;
    }
    buf
}
