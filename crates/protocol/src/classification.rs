//! Final Classification (id 8) and Tyre Sets (id 12) packets.

use crate::error::DecodeError;
use crate::reader::ByteReader;
use crate::{
    CLASSIFICATION_ENTRY_SIZE, FINAL_CLASSIFICATION_PACKET_SIZE, HEADER_SIZE, NUM_CARS,
    NUM_TYRE_SETS, NUM_TYRE_STINTS, TYRE_SET_ENTRY_SIZE, TYRE_SETS_PACKET_SIZE,
};

/// One tyre stint in a classification entry.
///
/// The wire sends three parallel 8-element arrays; they are zipped into
/// one record per stint here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TyreStint {
    pub actual_compound: u8,
    pub visual_compound: u8,
    pub end_lap: u8,
}

/// Final result of one car (46 bytes on the wire).
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationData {
    pub position: u8,
    pub num_laps: u8,
    pub grid_position: u8,
    pub points: u8,
    pub num_pit_stops: u8,
    /// 2 active, 3 finished, 4 DNF, 5 DSQ, 6 not classified, 7 retired.
    pub result_status: u8,
    pub result_reason: u8,
    pub best_lap_time_ms: u32,
    /// Total race time in seconds, penalties excluded.
    pub total_race_time_sec: f64,
    pub penalties_time_sec: u8,
    pub num_penalties: u8,
    pub num_tyre_stints: u8,
    pub tyre_stints: Vec<TyreStint>,
}

/// Final Classification packet, sent once at the end of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalClassificationPacket {
    pub num_cars: u8,
    pub cars: Vec<ClassificationData>,
}

/// Decode a Final Classification packet (id 8).
///
/// # Errors
///
/// [`DecodeError::TooShort`] if `raw` is shorter than 1042 bytes.
pub fn decode_final_classification(
    raw: &[u8],
) -> Result<FinalClassificationPacket, DecodeError> {
    if raw.len() < FINAL_CLASSIFICATION_PACKET_SIZE {
        return Err(DecodeError::TooShort {
            needed: FINAL_CLASSIFICATION_PACKET_SIZE,
            len: raw.len(),
        });
    }

    let mut r = ByteReader::at(raw, HEADER_SIZE);
    let num_cars = r.u8()?;

    let mut cars = Vec::with_capacity(NUM_CARS);
    for index in 0..NUM_CARS {
        let mut r = ByteReader::at(raw, HEADER_SIZE + 1 + index * CLASSIFICATION_ENTRY_SIZE);
        let position = r.u8()?;                     // 0
        let num_laps = r.u8()?;                     // 1
        let grid_position = r.u8()?;                // 2
        let points = r.u8()?;                       // 3
        let num_pit_stops = r.u8()?;                // 4
        let result_status = r.u8()?;                // 5
        let result_reason = r.u8()?;                // 6
        let best_lap_time_ms = r.u32_le()?;         // 7-10
        let total_race_time_sec = r.f64_le()?;      // 11-18
        let penalties_time_sec = r.u8()?;           // 19
        let num_penalties = r.u8()?;                // 20
        let num_tyre_stints = r.u8()?;              // 21
        let actual = r.u8_array::<NUM_TYRE_STINTS>()?;  // 22-29
        let visual = r.u8_array::<NUM_TYRE_STINTS>()?;  // 30-37
        let end_laps = r.u8_array::<NUM_TYRE_STINTS>()?; // 38-45
        let tyre_stints = (0..NUM_TYRE_STINTS)
            .map(|s| TyreStint {
                actual_compound: actual[s],
                visual_compound: visual[s],
                end_lap: end_laps[s],
            })
            .collect();
        cars.push(ClassificationData {
            position,
            num_laps,
            grid_position,
            points,
            num_pit_stops,
            result_status,
            result_reason,
            best_lap_time_ms,
            total_race_time_sec,
            penalties_time_sec,
            num_penalties,
            num_tyre_stints,
            tyre_stints,
        });
    }

    Ok(FinalClassificationPacket { num_cars, cars })
}

/// One tyre set in the Tyre Sets packet (10 bytes on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TyreSetData {
    pub actual_compound: u8,
    pub visual_compound: u8,
    /// Wear percentage.
    pub wear: u8,
    pub available: u8,
    pub recommended_session: u8,
    pub life_span_laps: u8,
    pub usable_life_laps: u8,
    /// Lap time delta versus the fitted set, in milliseconds.
    pub lap_delta_time_ms: i16,
    pub fitted: u8,
}

/// Tyre Sets packet (id 12): the 20 tyre sets of one car.
#[derive(Debug, Clone, PartialEq)]
pub struct TyreSetsPacket {
    pub car_index: u8,
    pub tyre_sets: Vec<TyreSetData>,
    pub fitted_index: u8,
}

/// Decode a Tyre Sets packet (id 12).
///
/// # Errors
///
/// [`DecodeError::TooShort`] if `raw` is shorter than 231 bytes.
pub fn decode_tyre_sets(raw: &[u8]) -> Result<TyreSetsPacket, DecodeError> {
    if raw.len() < TYRE_SETS_PACKET_SIZE {
        return Err(DecodeError::TooShort {
            needed: TYRE_SETS_PACKET_SIZE,
            len: raw.len(),
        });
    }

    let mut r = ByteReader::at(raw, HEADER_SIZE);
    let car_index = r.u8()?;

    let mut tyre_sets = Vec::with_capacity(NUM_TYRE_SETS);
    for index in 0..NUM_TYRE_SETS {
        let mut r = ByteReader::at(raw, HEADER_SIZE + 1 + index * TYRE_SET_ENTRY_SIZE);
        tyre_sets.push(TyreSetData {
            actual_compound: r.u8()?,       // 0
            visual_compound: r.u8()?,       // 1
            wear: r.u8()?,                  // 2
            available: r.u8()?,             // 3
            recommended_session: r.u8()?,   // 4
            life_span_laps: r.u8()?,        // 5
            usable_life_laps: r.u8()?,      // 6
            lap_delta_time_ms: r.i16_le()?, // 7-8
            fitted: r.u8()?,                // 9
        });
    }

    let mut r = ByteReader::at(raw, HEADER_SIZE + 1 + NUM_TYRE_SETS * TYRE_SET_ENTRY_SIZE);
    Ok(TyreSetsPacket {
        car_index,
        tyre_sets,
        fitted_index: r.u8()?,
    })
}
