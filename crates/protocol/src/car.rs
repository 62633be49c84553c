//! Per-car packets: Car Setups (id 5), Car Telemetry (id 6),
//! Car Status (id 7) and Car Damage (id 10).
//!
//! Wheel-indexed arrays are in wire order: RL, RR, FL, FR.

use crate::error::DecodeError;
use crate::reader::ByteReader;
use crate::{
    CAR_DAMAGE_ENTRY_SIZE, CAR_DAMAGE_PACKET_SIZE, CAR_SETUP_ENTRY_SIZE, CAR_SETUPS_PACKET_SIZE,
    CAR_STATUS_ENTRY_SIZE, CAR_STATUS_PACKET_SIZE, CAR_TELEMETRY_ENTRY_SIZE,
    CAR_TELEMETRY_PACKET_SIZE, HEADER_SIZE, NUM_CARS,
};

/// Setup of one car (50 bytes on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CarSetupData {
    pub front_wing: u8,
    pub rear_wing: u8,
    pub on_throttle_diff: u8,
    pub off_throttle_diff: u8,
    pub front_camber: f32,
    pub rear_camber: f32,
    pub front_toe: f32,
    pub rear_toe: f32,
    pub front_suspension: u8,
    pub rear_suspension: u8,
    pub front_anti_roll_bar: u8,
    pub rear_anti_roll_bar: u8,
    pub front_suspension_height: u8,
    pub rear_suspension_height: u8,
    pub brake_pressure: u8,
    pub brake_bias: u8,
    pub engine_braking: u8,
    pub rear_left_tyre_pressure: f32,
    pub rear_right_tyre_pressure: f32,
    pub front_left_tyre_pressure: f32,
    pub front_right_tyre_pressure: f32,
    pub ballast: u8,
    pub fuel_load: f32,
}

/// Car Setups packet.  Other cars' setups are zeroed by the game in
/// multiplayer unless spectating.
#[derive(Debug, Clone, PartialEq)]
pub struct CarSetupsPacket {
    pub cars: Vec<CarSetupData>,
    /// Front wing the player's next pit stop will fit.
    pub next_front_wing_value: f32,
}

/// Decode a Car Setups packet (id 5).
///
/// # Errors
///
/// [`DecodeError::TooShort`] if `raw` is shorter than 1133 bytes.
pub fn decode_car_setups(raw: &[u8]) -> Result<CarSetupsPacket, DecodeError> {
    if raw.len() < CAR_SETUPS_PACKET_SIZE {
        return Err(DecodeError::TooShort {
            needed: CAR_SETUPS_PACKET_SIZE,
            len: raw.len(),
        });
    }

    let mut cars = Vec::with_capacity(NUM_CARS);
    for index in 0..NUM_CARS {
        let mut r = ByteReader::at(raw, HEADER_SIZE + index * CAR_SETUP_ENTRY_SIZE);
        cars.push(CarSetupData {
            front_wing: r.u8()?,                    // 0
            rear_wing: r.u8()?,                     // 1
            on_throttle_diff: r.u8()?,              // 2
            off_throttle_diff: r.u8()?,             // 3
            front_camber: r.f32_le()?,              // 4-7
            rear_camber: r.f32_le()?,               // 8-11
            front_toe: r.f32_le()?,                 // 12-15
            rear_toe: r.f32_le()?,                  // 16-19
            front_suspension: r.u8()?,              // 20
            rear_suspension: r.u8()?,               // 21
            front_anti_roll_bar: r.u8()?,           // 22
            rear_anti_roll_bar: r.u8()?,            // 23
            front_suspension_height: r.u8()?,       // 24
            rear_suspension_height: r.u8()?,        // 25
            brake_pressure: r.u8()?,                // 26
            brake_bias: r.u8()?,                    // 27
            engine_braking: r.u8()?,                // 28
            rear_left_tyre_pressure: r.f32_le()?,   // 29-32
            rear_right_tyre_pressure: r.f32_le()?,  // 33-36
            front_left_tyre_pressure: r.f32_le()?,  // 37-40
            front_right_tyre_pressure: r.f32_le()?, // 41-44
            ballast: r.u8()?,                       // 45
            fuel_load: r.f32_le()?,                 // 46-49
        });
    }

    let mut r = ByteReader::at(raw, HEADER_SIZE + NUM_CARS * CAR_SETUP_ENTRY_SIZE);
    Ok(CarSetupsPacket {
        cars,
        next_front_wing_value: r.f32_le()?,
    })
}

/// Live cockpit telemetry for one car (60 bytes on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CarTelemetryData {
    /// Speed in km/h.
    pub speed_kmh: u16,
    /// 0.0..1.0.
    pub throttle: f32,
    /// -1.0 full left to 1.0 full right.
    pub steer: f32,
    /// 0.0..1.0.
    pub brake: f32,
    pub clutch: u8,
    /// -1 reverse, 0 neutral, 1-8 forward.
    pub gear: i8,
    pub engine_rpm: u16,
    pub drs_open: u8,
    pub rev_lights_percent: u8,
    pub rev_lights_bit_value: u16,
    pub brakes_temperature: [u16; 4],
    pub tyres_surface_temperature: [u8; 4],
    pub tyres_inner_temperature: [u8; 4],
    pub engine_temperature: u16,
    pub tyres_pressure: [f32; 4],
    pub surface_type: [u8; 4],
}

/// Car Telemetry packet.
#[derive(Debug, Clone, PartialEq)]
pub struct CarTelemetryPacket {
    pub cars: Vec<CarTelemetryData>,
    pub mfd_panel_index: u8,
    pub mfd_panel_index_secondary_player: u8,
    /// 0 if no gear suggestion is active.
    pub suggested_gear: i8,
}

/// Decode a Car Telemetry packet (id 6).
///
/// # Errors
///
/// [`DecodeError::TooShort`] if `raw` is shorter than 1352 bytes.
pub fn decode_car_telemetry(raw: &[u8]) -> Result<CarTelemetryPacket, DecodeError> {
    if raw.len() < CAR_TELEMETRY_PACKET_SIZE {
        return Err(DecodeError::TooShort {
            needed: CAR_TELEMETRY_PACKET_SIZE,
            len: raw.len(),
        });
    }

    let mut cars = Vec::with_capacity(NUM_CARS);
    for index in 0..NUM_CARS {
        let mut r = ByteReader::at(raw, HEADER_SIZE + index * CAR_TELEMETRY_ENTRY_SIZE);
        cars.push(CarTelemetryData {
            speed_kmh: r.u16_le()?,                         // 0-1
            throttle: r.f32_le()?,                          // 2-5
            steer: r.f32_le()?,                             // 6-9
            brake: r.f32_le()?,                             // 10-13
            clutch: r.u8()?,                                // 14
            gear: r.i8()?,                                  // 15
            engine_rpm: r.u16_le()?,                        // 16-17
            drs_open: r.u8()?,                              // 18
            rev_lights_percent: r.u8()?,                    // 19
            rev_lights_bit_value: r.u16_le()?,              // 20-21
            brakes_temperature: r.u16_le_array::<4>()?,     // 22-29
            tyres_surface_temperature: r.u8_array::<4>()?,  // 30-33
            tyres_inner_temperature: r.u8_array::<4>()?,    // 34-37
            engine_temperature: r.u16_le()?,                // 38-39
            tyres_pressure: r.f32_le_array::<4>()?,         // 40-55
            surface_type: r.u8_array::<4>()?,               // 56-59
        });
    }

    let mut r = ByteReader::at(raw, HEADER_SIZE + NUM_CARS * CAR_TELEMETRY_ENTRY_SIZE);
    Ok(CarTelemetryPacket {
        cars,
        mfd_panel_index: r.u8()?,
        mfd_panel_index_secondary_player: r.u8()?,
        suggested_gear: r.i8()?,
    })
}

/// Fuel, ERS and tyre status of one car (55 bytes on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CarStatusData {
    pub traction_control: u8,
    pub anti_lock_brakes: u8,
    /// 0 lean, 1 standard, 2 rich, 3 max.
    pub fuel_mix: u8,
    pub front_brake_bias: u8,
    pub pit_limiter_on: u8,
    pub fuel_in_tank: f32,
    pub fuel_capacity: f32,
    /// Fuel delta to the end of the race in laps.
    pub fuel_remaining_laps: f32,
    pub max_rpm: u16,
    pub idle_rpm: u16,
    pub max_gears: u8,
    pub drs_allowed: u8,
    /// Metres until DRS becomes available, 0 if not.
    pub drs_activation_distance: u16,
    pub actual_tyre_compound: u8,
    pub visual_tyre_compound: u8,
    pub tyres_age_laps: u8,
    /// -1 invalid, 0 none, 1 green, 2 blue, 3 yellow, 4 red.
    pub vehicle_fia_flags: i8,
    pub engine_power_ice_w: f32,
    pub engine_power_mguk_w: f32,
    pub ers_store_energy_j: f32,
    /// 0 none, 1 medium, 2 hotlap, 3 overtake.
    pub ers_deploy_mode: u8,
    pub ers_harvested_this_lap_mguk_j: f32,
    pub ers_harvested_this_lap_mguh_j: f32,
    pub ers_deployed_this_lap_j: f32,
    pub network_paused: u8,
}

/// Car Status packet.
#[derive(Debug, Clone, PartialEq)]
pub struct CarStatusPacket {
    pub cars: Vec<CarStatusData>,
}

/// Decode a Car Status packet (id 7).
///
/// # Errors
///
/// [`DecodeError::TooShort`] if `raw` is shorter than 1239 bytes.
pub fn decode_car_status(raw: &[u8]) -> Result<CarStatusPacket, DecodeError> {
    if raw.len() < CAR_STATUS_PACKET_SIZE {
        return Err(DecodeError::TooShort {
            needed: CAR_STATUS_PACKET_SIZE,
            len: raw.len(),
        });
    }

    let mut cars = Vec::with_capacity(NUM_CARS);
    for index in 0..NUM_CARS {
        let mut r = ByteReader::at(raw, HEADER_SIZE + index * CAR_STATUS_ENTRY_SIZE);
        cars.push(CarStatusData {
            traction_control: r.u8()?,                  // 0
            anti_lock_brakes: r.u8()?,                  // 1
            fuel_mix: r.u8()?,                          // 2
            front_brake_bias: r.u8()?,                  // 3
            pit_limiter_on: r.u8()?,                    // 4
            fuel_in_tank: r.f32_le()?,                  // 5-8
            fuel_capacity: r.f32_le()?,                 // 9-12
            fuel_remaining_laps: r.f32_le()?,           // 13-16
            max_rpm: r.u16_le()?,                       // 17-18
            idle_rpm: r.u16_le()?,                      // 19-20
            max_gears: r.u8()?,                         // 21
            drs_allowed: r.u8()?,                       // 22
            drs_activation_distance: r.u16_le()?,       // 23-24
            actual_tyre_compound: r.u8()?,              // 25
            visual_tyre_compound: r.u8()?,              // 26
            tyres_age_laps: r.u8()?,                    // 27
            vehicle_fia_flags: r.i8()?,                 // 28
            engine_power_ice_w: r.f32_le()?,            // 29-32
            engine_power_mguk_w: r.f32_le()?,           // 33-36
            ers_store_energy_j: r.f32_le()?,            // 37-40
            ers_deploy_mode: r.u8()?,                   // 41
            ers_harvested_this_lap_mguk_j: r.f32_le()?, // 42-45
            ers_harvested_this_lap_mguh_j: r.f32_le()?, // 46-49
            ers_deployed_this_lap_j: r.f32_le()?,       // 50-53
            network_paused: r.u8()?,                    // 54
        });
    }
    Ok(CarStatusPacket { cars })
}

/// Damage state of one car (46 bytes on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CarDamageData {
    /// Tyre wear percentage per wheel.
    pub tyres_wear: [f32; 4],
    pub tyres_damage: [u8; 4],
    pub brakes_damage: [u8; 4],
    pub tyre_blisters: [u8; 4],
    pub front_left_wing_damage: u8,
    pub front_right_wing_damage: u8,
    pub rear_wing_damage: u8,
    pub floor_damage: u8,
    pub diffuser_damage: u8,
    pub sidepod_damage: u8,
    pub drs_fault: u8,
    pub ers_fault: u8,
    pub gear_box_damage: u8,
    pub engine_damage: u8,
    pub engine_mguh_wear: u8,
    pub engine_es_wear: u8,
    pub engine_ce_wear: u8,
    pub engine_ice_wear: u8,
    pub engine_mguk_wear: u8,
    pub engine_tc_wear: u8,
    pub engine_blown: u8,
    pub engine_seized: u8,
}

/// Car Damage packet.
#[derive(Debug, Clone, PartialEq)]
pub struct CarDamagePacket {
    pub cars: Vec<CarDamageData>,
}

/// Decode a Car Damage packet (id 10).
///
/// # Errors
///
/// [`DecodeError::TooShort`] if `raw` is shorter than 1041 bytes.
pub fn decode_car_damage(raw: &[u8]) -> Result<CarDamagePacket, DecodeError> {
    if raw.len() < CAR_DAMAGE_PACKET_SIZE {
        return Err(DecodeError::TooShort {
            needed: CAR_DAMAGE_PACKET_SIZE,
            len: raw.len(),
        });
    }

    let mut cars = Vec::with_capacity(NUM_CARS);
    for index in 0..NUM_CARS {
        let mut r = ByteReader::at(raw, HEADER_SIZE + index * CAR_DAMAGE_ENTRY_SIZE);
        cars.push(CarDamageData {
            tyres_wear: r.f32_le_array::<4>()?,     // 0-15
            tyres_damage: r.u8_array::<4>()?,       // 16-19
            brakes_damage: r.u8_array::<4>()?,      // 20-23
            tyre_blisters: r.u8_array::<4>()?,      // 24-27
            front_left_wing_damage: r.u8()?,        // 28
            front_right_wing_damage: r.u8()?,       // 29
            rear_wing_damage: r.u8()?,              // 30
            floor_damage: r.u8()?,                  // 31
            diffuser_damage: r.u8()?,               // 32
            sidepod_damage: r.u8()?,                // 33
            drs_fault: r.u8()?,                     // 34
            ers_fault: r.u8()?,                     // 35
            gear_box_damage: r.u8()?,               // 36
            engine_damage: r.u8()?,                 // 37
            engine_mguh_wear: r.u8()?,              // 38
            engine_es_wear: r.u8()?,                // 39
            engine_ce_wear: r.u8()?,                // 40
            engine_ice_wear: r.u8()?,               // 41
            engine_mguk_wear: r.u8()?,              // 42
            engine_tc_wear: r.u8()?,                // 43
            engine_blown: r.u8()?,                  // 44
            engine_seized: r.u8()?,                 // 45
        });
    }
    Ok(CarDamagePacket { cars })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builders::{build_car_status_packet, build_car_telemetry_packet};

    #[test]
    fn telemetry_decodes_speed_gear_and_temperatures() {
        let raw = build_car_telemetry_packet(3, 287, 7, 11_450);
        let packet = decode_car_telemetry(&raw).unwrap();
        assert_eq!(packet.cars.len(), NUM_CARS);
        let car = &packet.cars[3];
        assert_eq!(car.speed_kmh, 287);
        assert_eq!(car.gear, 7);
        assert_eq!(car.engine_rpm, 11_450);
    }

    #[test]
    fn status_decodes_fuel_and_ers() {
        let raw = build_car_status_packet(0, 45.5, 2);
        let packet = decode_car_status(&raw).unwrap();
        let car = &packet.cars[0];
        assert!((car.fuel_in_tank - 45.5).abs() < f32::EPSILON);
        assert_eq!(car.ers_deploy_mode, 2);
    }

    #[test]
    fn damage_decodes_wear_and_wing_state() {
        use crate::builders::build_car_damage_packet;
        let raw = build_car_damage_packet(11, 37.5, 60);
        let packet = decode_car_damage(&raw).unwrap();
        let car = &packet.cars[11];
        assert!(car.tyres_wear.iter().all(|&w| (w - 37.5).abs() < f32::EPSILON));
        assert_eq!(car.front_left_wing_damage, 60);
        assert_eq!(car.rear_wing_damage, 0);
    }

    #[test]
    fn status_one_byte_short_fails() {
        let mut raw = build_car_status_packet(0, 0.0, 0);
        raw.truncate(CAR_STATUS_PACKET_SIZE - 1);
        assert!(matches!(
            decode_car_status(&raw),
            Err(DecodeError::TooShort { .. })
        ));
    }
}
