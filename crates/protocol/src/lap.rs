//! Lap timing packets: Lap Data (id 2), Session History (id 11),
//! Time Trial (id 14) and Lap Positions (id 15).

use crate::error::DecodeError;
use crate::reader::ByteReader;
use crate::{
    HEADER_SIZE, LAP_DATA_ENTRY_SIZE, LAP_DATA_PACKET_SIZE, LAP_POSITIONS_PACKET_SIZE, NUM_CARS,
    NUM_LAP_HISTORY_ENTRIES, NUM_LAP_POSITION_LAPS, NUM_TYRE_STINTS,
    SESSION_HISTORY_PACKET_SIZE, TIME_TRIAL_PACKET_SIZE, TIME_TRIAL_SET_SIZE,
};

/// Combine a split time sent as whole minutes plus a millisecond part
/// into total milliseconds.
///
/// Sector and delta times above one minute are sent on the wire as
/// `(ms_part: u16, minutes: u8)`.
pub fn combine_split_time(minutes: u8, milliseconds: u16) -> u32 {
    u32::from(minutes) * 60_000 + u32::from(milliseconds)
}

/// Lap state of one car (57 bytes on the wire).
///
/// Split times arrive as separate ms/minute fields and are combined here;
/// consumers only ever see total milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LapData {
    pub last_lap_time_ms: u32,
    pub current_lap_time_ms: u32,
    pub sector_1_time_ms: u32,
    pub sector_2_time_ms: u32,
    pub delta_to_car_in_front_ms: u32,
    pub delta_to_race_leader_ms: u32,
    /// Distance around the current lap in metres; negative until the
    /// car crosses the line for the first time.
    pub lap_distance: f32,
    pub total_distance: f32,
    pub safety_car_delta: f32,
    pub car_position: u8,
    pub current_lap_number: u8,
    /// 0 none, 1 pitting, 2 in pit area.
    pub pit_status: u8,
    pub num_pit_stops: u8,
    /// 0 sector 1, 1 sector 2, 2 sector 3.
    pub sector: u8,
    pub current_lap_invalid: u8,
    pub penalties_sec: u8,
    pub total_warnings: u8,
    pub corner_cutting_warnings: u8,
    pub num_unserved_drive_through_pens: u8,
    pub num_unserved_stop_go_pens: u8,
    pub grid_position: u8,
    /// 0 in garage, 1 flying lap, 2 in lap, 3 out lap, 4 on track.
    pub driver_status: u8,
    /// 2 active, 3 finished, 4 DNF, 5 DSQ, 6 not classified, 7 retired.
    pub result_status: u8,
    pub pit_lane_timer_active: u8,
    pub pit_lane_time_in_lane_ms: u16,
    pub pit_stop_timer_ms: u16,
    pub pit_stop_should_serve_pen: u8,
    pub speed_trap_fastest_speed: f32,
    pub speed_trap_fastest_lap: u8,
}

/// Lap Data packet: per-car lap state plus the time-trial car indices.
#[derive(Debug, Clone, PartialEq)]
pub struct LapDataPacket {
    pub cars: Vec<LapData>,
    pub time_trial_pb_car_index: u8,
    pub time_trial_rival_car_index: u8,
}

fn decode_lap_entry(r: &mut ByteReader<'_>) -> Result<LapData, DecodeError> {
    let last_lap_time_ms = r.u32_le()?;                 // 0-3
    let current_lap_time_ms = r.u32_le()?;              // 4-7
    let s1_ms = r.u16_le()?;                            // 8-9
    let s1_min = r.u8()?;                               // 10
    let s2_ms = r.u16_le()?;                            // 11-12
    let s2_min = r.u8()?;                               // 13
    let front_ms = r.u16_le()?;                         // 14-15
    let front_min = r.u8()?;                            // 16
    let leader_ms = r.u16_le()?;                        // 17-18
    let leader_min = r.u8()?;                           // 19
    Ok(LapData {
        last_lap_time_ms,
        current_lap_time_ms,
        sector_1_time_ms: combine_split_time(s1_min, s1_ms),
        sector_2_time_ms: combine_split_time(s2_min, s2_ms),
        delta_to_car_in_front_ms: combine_split_time(front_min, front_ms),
        delta_to_race_leader_ms: combine_split_time(leader_min, leader_ms),
        lap_distance: r.f32_le()?,                      // 20-23
        total_distance: r.f32_le()?,                    // 24-27
        safety_car_delta: r.f32_le()?,                  // 28-31
        car_position: r.u8()?,                          // 32
        current_lap_number: r.u8()?,                    // 33
        pit_status: r.u8()?,                            // 34
        num_pit_stops: r.u8()?,                         // 35
        sector: r.u8()?,                                // 36
        current_lap_invalid: r.u8()?,                   // 37
        penalties_sec: r.u8()?,                         // 38
        total_warnings: r.u8()?,                        // 39
        corner_cutting_warnings: r.u8()?,               // 40
        num_unserved_drive_through_pens: r.u8()?,       // 41
        num_unserved_stop_go_pens: r.u8()?,             // 42
        grid_position: r.u8()?,                         // 43
        driver_status: r.u8()?,                         // 44
        result_status: r.u8()?,                         // 45
        pit_lane_timer_active: r.u8()?,                 // 46
        pit_lane_time_in_lane_ms: r.u16_le()?,          // 47-48
        pit_stop_timer_ms: r.u16_le()?,                 // 49-50
        pit_stop_should_serve_pen: r.u8()?,             // 51
        speed_trap_fastest_speed: r.f32_le()?,          // 52-55
        speed_trap_fastest_lap: r.u8()?,                // 56
    })
}

/// Decode a Lap Data packet (id 2).
///
/// # Errors
///
/// [`DecodeError::TooShort`] if `raw` is shorter than 1285 bytes.
pub fn decode_lap_data(raw: &[u8]) -> Result<LapDataPacket, DecodeError> {
    if raw.len() < LAP_DATA_PACKET_SIZE {
        return Err(DecodeError::TooShort {
            needed: LAP_DATA_PACKET_SIZE,
            len: raw.len(),
        });
    }

    let mut cars = Vec::with_capacity(NUM_CARS);
    for index in 0..NUM_CARS {
        let mut r = ByteReader::at(raw, HEADER_SIZE + index * LAP_DATA_ENTRY_SIZE);
        cars.push(decode_lap_entry(&mut r)?);
    }

    let mut r = ByteReader::at(raw, HEADER_SIZE + NUM_CARS * LAP_DATA_ENTRY_SIZE);
    Ok(LapDataPacket {
        cars,
        time_trial_pb_car_index: r.u8()?,
        time_trial_rival_car_index: r.u8()?,
    })
}

/// One completed lap in the Session History packet (14 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LapHistoryData {
    pub lap_time_ms: u32,
    pub sector_1_time_ms: u32,
    pub sector_2_time_ms: u32,
    pub sector_3_time_ms: u32,
    /// Bit 0 lap valid, bits 1-3 sectors 1-3 valid.
    pub lap_valid_bit_flags: u8,
}

/// One tyre stint in the Session History packet (3 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TyreStintHistory {
    /// Lap the stint ended on, 255 while the stint is current.
    pub end_lap: u8,
    pub tyre_actual_compound: u8,
    pub tyre_visual_compound: u8,
}

/// Session History packet (id 11): lap and stint history for one car.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionHistoryPacket {
    pub car_index: u8,
    pub num_laps: u8,
    pub num_tyre_stints: u8,
    pub best_lap_time_lap_num: u8,
    pub best_sector_1_lap_num: u8,
    pub best_sector_2_lap_num: u8,
    pub best_sector_3_lap_num: u8,
    pub laps: Vec<LapHistoryData>,
    pub tyre_stints: Vec<TyreStintHistory>,
}

/// Decode a Session History packet (id 11).
///
/// # Errors
///
/// [`DecodeError::TooShort`] if `raw` is shorter than 1460 bytes.
pub fn decode_session_history(raw: &[u8]) -> Result<SessionHistoryPacket, DecodeError> {
    if raw.len() < SESSION_HISTORY_PACKET_SIZE {
        return Err(DecodeError::TooShort {
            needed: SESSION_HISTORY_PACKET_SIZE,
            len: raw.len(),
        });
    }

    let mut r = ByteReader::at(raw, HEADER_SIZE);
    let car_index = r.u8()?;
    let num_laps = r.u8()?;
    let num_tyre_stints = r.u8()?;
    let best_lap_time_lap_num = r.u8()?;
    let best_sector_1_lap_num = r.u8()?;
    let best_sector_2_lap_num = r.u8()?;
    let best_sector_3_lap_num = r.u8()?;

    let mut laps = Vec::with_capacity(NUM_LAP_HISTORY_ENTRIES);
    for _ in 0..NUM_LAP_HISTORY_ENTRIES {
        let lap_time_ms = r.u32_le()?;
        let s1_ms = r.u16_le()?;
        let s1_min = r.u8()?;
        let s2_ms = r.u16_le()?;
        let s2_min = r.u8()?;
        let s3_ms = r.u16_le()?;
        let s3_min = r.u8()?;
        laps.push(LapHistoryData {
            lap_time_ms,
            sector_1_time_ms: combine_split_time(s1_min, s1_ms),
            sector_2_time_ms: combine_split_time(s2_min, s2_ms),
            sector_3_time_ms: combine_split_time(s3_min, s3_ms),
            lap_valid_bit_flags: r.u8()?,
        });
    }

    let mut tyre_stints = Vec::with_capacity(NUM_TYRE_STINTS);
    for _ in 0..NUM_TYRE_STINTS {
        tyre_stints.push(TyreStintHistory {
            end_lap: r.u8()?,
            tyre_actual_compound: r.u8()?,
            tyre_visual_compound: r.u8()?,
        });
    }

    Ok(SessionHistoryPacket {
        car_index,
        num_laps,
        num_tyre_stints,
        best_lap_time_lap_num,
        best_sector_1_lap_num,
        best_sector_2_lap_num,
        best_sector_3_lap_num,
        laps,
        tyre_stints,
    })
}

/// One lap set in the Time Trial packet (24 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeTrialDataSet {
    pub car_index: u8,
    pub team_id: u8,
    pub lap_time_ms: u32,
    pub sector_1_time_ms: u32,
    pub sector_2_time_ms: u32,
    pub sector_3_time_ms: u32,
    pub traction_control: u8,
    pub gearbox_assist: u8,
    pub anti_lock_brakes: u8,
    /// 1 if car setup is equal performance.
    pub equal_car_performance: u8,
    /// 1 if custom setup was used.
    pub custom_setup: u8,
    pub valid: u8,
}

/// Time Trial packet (id 14): session best, personal best and rival laps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeTrialPacket {
    pub player_session_best: TimeTrialDataSet,
    pub personal_best: TimeTrialDataSet,
    pub rival: TimeTrialDataSet,
}

fn decode_time_trial_set(r: &mut ByteReader<'_>) -> Result<TimeTrialDataSet, DecodeError> {
    Ok(TimeTrialDataSet {
        car_index: r.u8()?,
        team_id: r.u8()?,
        lap_time_ms: r.u32_le()?,
        sector_1_time_ms: r.u32_le()?,
        sector_2_time_ms: r.u32_le()?,
        sector_3_time_ms: r.u32_le()?,
        traction_control: r.u8()?,
        gearbox_assist: r.u8()?,
        anti_lock_brakes: r.u8()?,
        equal_car_performance: r.u8()?,
        custom_setup: r.u8()?,
        valid: r.u8()?,
    })
}

/// Decode a Time Trial packet (id 14).
///
/// # Errors
///
/// [`DecodeError::TooShort`] if `raw` is shorter than 101 bytes.
pub fn decode_time_trial(raw: &[u8]) -> Result<TimeTrialPacket, DecodeError> {
    if raw.len() < TIME_TRIAL_PACKET_SIZE {
        return Err(DecodeError::TooShort {
            needed: TIME_TRIAL_PACKET_SIZE,
            len: raw.len(),
        });
    }

    let mut sets = [TimeTrialDataSet::default(); 3];
    for (index, set) in sets.iter_mut().enumerate() {
        let mut r = ByteReader::at(raw, HEADER_SIZE + index * TIME_TRIAL_SET_SIZE);
        *set = decode_time_trial_set(&mut r)?;
    }
    Ok(TimeTrialPacket {
        player_session_best: sets[0],
        personal_best: sets[1],
        rival: sets[2],
    })
}

/// Lap Positions packet (id 15): grid position of every car at the start
/// of each lap, for the most recent window of 50 laps.
#[derive(Debug, Clone, PartialEq)]
pub struct LapPositionsPacket {
    pub num_laps: u8,
    /// Lap number of the first row in `positions`.
    pub lap_start: u8,
    /// `positions[lap][car]`; 0 means no data for that slot.
    pub positions: Vec<[u8; NUM_CARS]>,
}

/// Decode a Lap Positions packet (id 15).
///
/// # Errors
///
/// [`DecodeError::TooShort`] if `raw` is shorter than 1131 bytes.
pub fn decode_lap_positions(raw: &[u8]) -> Result<LapPositionsPacket, DecodeError> {
    if raw.len() < LAP_POSITIONS_PACKET_SIZE {
        return Err(DecodeError::TooShort {
            needed: LAP_POSITIONS_PACKET_SIZE,
            len: raw.len(),
        });
    }

    let mut r = ByteReader::at(raw, HEADER_SIZE);
    let num_laps = r.u8()?;
    let lap_start = r.u8()?;
    let mut positions = Vec::with_capacity(NUM_LAP_POSITION_LAPS);
    for _ in 0..NUM_LAP_POSITION_LAPS {
        positions.push(r.u8_array::<NUM_CARS>()?);
    }
    Ok(LapPositionsPacket {
        num_laps,
        lap_start,
        positions,
    })
}
