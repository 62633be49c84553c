//! Session packet (id 1): track, weather, rules and assist settings.

use crate::error::DecodeError;
use crate::reader::ByteReader;
use crate::{HEADER_SIZE, NUM_MARSHAL_ZONES, NUM_WEATHER_SAMPLES, SESSION_PACKET_SIZE};

/// One of the 21 marshal zones around the lap.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MarshalZone {
    /// Fraction of the lap where the zone starts (0.0..1.0).
    pub zone_start: f32,
    /// -1 invalid, 0 none, 1 green, 2 blue, 3 yellow.
    pub zone_flag: i8,
}

/// One weather forecast sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeatherForecastSample {
    pub session_type: u8,
    /// Minutes into the future this sample applies to.
    pub time_offset: u8,
    pub weather: u8,
    pub track_temperature: i8,
    pub track_temperature_change: i8,
    pub air_temperature: i8,
    pub air_temperature_change: i8,
    pub rain_percentage: u8,
}

/// Session packet body.  Scalar blocks are kept in wire order.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPacket {
    pub weather: u8,
    pub track_temperature: i8,
    pub air_temperature: i8,
    pub total_laps: u8,
    /// Track length in metres.
    pub track_length: u16,
    pub session_type: u8,
    pub track_id: i8,
    pub formula: u8,
    pub session_time_left: u16,
    pub session_duration: u16,
    pub pit_speed_limit: u8,
    pub game_paused: u8,
    pub is_spectating: u8,
    pub spectator_car_index: u8,
    pub sli_pro_native_support: u8,
    pub num_marshal_zones: u8,
    pub marshal_zones: Vec<MarshalZone>,
    /// 0 no safety car, 1 full, 2 virtual, 3 formation lap.
    pub safety_car_status: u8,
    pub network_game: u8,
    pub num_weather_forecast_samples: u8,
    pub weather_forecast_samples: Vec<WeatherForecastSample>,
    pub forecast_accuracy: u8,
    pub ai_difficulty: u8,
    pub season_link_identifier: u32,
    pub weekend_link_identifier: u32,
    pub session_link_identifier: u32,
    pub pit_stop_window_ideal_lap: u8,
    pub pit_stop_window_latest_lap: u8,
    pub pit_stop_rejoin_position: u8,
    pub steering_assist: u8,
    pub braking_assist: u8,
    pub gearbox_assist: u8,
    pub pit_assist: u8,
    pub pit_release_assist: u8,
    pub ers_assist: u8,
    pub drs_assist: u8,
    pub dynamic_racing_line: u8,
    pub dynamic_racing_line_type: u8,
    pub game_mode: u8,
    pub ruleset: u8,
    /// Minutes since midnight, local track time.
    pub time_of_day: u32,
    pub session_length: u8,
    pub speed_units_lead_player: u8,
    pub temperature_units_lead_player: u8,
    pub speed_units_secondary_player: u8,
    pub temperature_units_secondary_player: u8,
    pub num_safety_car_periods: u8,
    pub num_virtual_safety_car_periods: u8,
    pub num_red_flag_periods: u8,
    pub equal_car_performance: u8,
    pub recovery_mode: u8,
    pub flashback_limit: u8,
    pub surface_type: u8,
    pub low_fuel_mode: u8,
    pub race_starts: u8,
    pub tyre_temperature_mode: u8,
    pub pit_lane_tyre_sim: u8,
    pub car_damage: u8,
    pub car_damage_rate: u8,
    pub collisions: u8,
    pub collisions_off_for_first_lap_only: u8,
    pub mp_unsafe_pit_release: u8,
    pub mp_off_for_griefing: u8,
    pub corner_cutting_stringency: u8,
    pub parc_ferme_rules: u8,
    pub pit_stop_experience: u8,
    pub safety_car_setting: u8,
    pub safety_car_experience: u8,
    pub formation_lap: u8,
    pub formation_lap_experience: u8,
    pub red_flags_setting: u8,
    pub affects_licence_level_solo: u8,
    pub affects_licence_level_mp: u8,
    pub num_sessions_in_weekend: u8,
    /// Session types making up the weekend, in order.
    pub weekend_structure: [u8; 12],
    /// Distance in metres where sector 2 starts.
    pub sector_2_lap_distance_start: f32,
    /// Distance in metres where sector 3 starts.
    pub sector_3_lap_distance_start: f32,
}

/// Decode a Session packet (id 1).
///
/// All 21 marshal zone and 64 forecast slots are decoded regardless of
/// `num_marshal_zones` / `num_weather_forecast_samples`; those counts say
/// how many leading entries are live.
///
/// # Errors
///
/// [`DecodeError::TooShort`] if `raw` is shorter than 753 bytes.
pub fn decode_session(raw: &[u8]) -> Result<SessionPacket, DecodeError> {
    if raw.len() < SESSION_PACKET_SIZE {
        return Err(DecodeError::TooShort {
            needed: SESSION_PACKET_SIZE,
            len: raw.len(),
        });
    }

    let mut r = ByteReader::at(raw, HEADER_SIZE);
    let weather = r.u8()?;                          // body 0
    let track_temperature = r.i8()?;                // 1
    let air_temperature = r.i8()?;                  // 2
    let total_laps = r.u8()?;                       // 3
    let track_length = r.u16_le()?;                 // 4-5
    let session_type = r.u8()?;                     // 6
    let track_id = r.i8()?;                         // 7
    let formula = r.u8()?;                          // 8
    let session_time_left = r.u16_le()?;            // 9-10
    let session_duration = r.u16_le()?;             // 11-12
    let pit_speed_limit = r.u8()?;                  // 13
    let game_paused = r.u8()?;                      // 14
    let is_spectating = r.u8()?;                    // 15
    let spectator_car_index = r.u8()?;              // 16
    let sli_pro_native_support = r.u8()?;           // 17
    let num_marshal_zones = r.u8()?;                // 18

    let mut marshal_zones = Vec::with_capacity(NUM_MARSHAL_ZONES);
    for _ in 0..NUM_MARSHAL_ZONES {
        marshal_zones.push(MarshalZone {
            zone_start: r.f32_le()?,
            zone_flag: r.i8()?,
        });
    }

    let safety_car_status = r.u8()?;                // 124
    let network_game = r.u8()?;                     // 125
    let num_weather_forecast_samples = r.u8()?;     // 126

    let mut weather_forecast_samples = Vec::with_capacity(NUM_WEATHER_SAMPLES);
    for _ in 0..NUM_WEATHER_SAMPLES {
        weather_forecast_samples.push(WeatherForecastSample {
            session_type: r.u8()?,
            time_offset: r.u8()?,
            weather: r.u8()?,
            track_temperature: r.i8()?,
            track_temperature_change: r.i8()?,
            air_temperature: r.i8()?,
            air_temperature_change: r.i8()?,
            rain_percentage: r.u8()?,
        });
    }

    Ok(SessionPacket {
        weather,
        track_temperature,
        air_temperature,
        total_laps,
        track_length,
        session_type,
        track_id,
        formula,
        session_time_left,
        session_duration,
        pit_speed_limit,
        game_paused,
        is_spectating,
        spectator_car_index,
        sli_pro_native_support,
        num_marshal_zones,
        marshal_zones,
        safety_car_status,
        network_game,
        num_weather_forecast_samples,
        weather_forecast_samples,
        forecast_accuracy: r.u8()?,                 // 639
        ai_difficulty: r.u8()?,                     // 640
        season_link_identifier: r.u32_le()?,        // 641-644
        weekend_link_identifier: r.u32_le()?,       // 645-648
        session_link_identifier: r.u32_le()?,       // 649-652
        pit_stop_window_ideal_lap: r.u8()?,         // 653
        pit_stop_window_latest_lap: r.u8()?,        // 654
        pit_stop_rejoin_position: r.u8()?,          // 655
        steering_assist: r.u8()?,                   // 656
        braking_assist: r.u8()?,                    // 657
        gearbox_assist: r.u8()?,                    // 658
        pit_assist: r.u8()?,                        // 659
        pit_release_assist: r.u8()?,                // 660
        ers_assist: r.u8()?,                        // 661
        drs_assist: r.u8()?,                        // 662
        dynamic_racing_line: r.u8()?,               // 663
        dynamic_racing_line_type: r.u8()?,          // 664
        game_mode: r.u8()?,                         // 665
        ruleset: r.u8()?,                           // 666
        time_of_day: r.u32_le()?,                   // 667-670
        session_length: r.u8()?,                    // 671
        speed_units_lead_player: r.u8()?,           // 672
        temperature_units_lead_player: r.u8()?,     // 673
        speed_units_secondary_player: r.u8()?,      // 674
        temperature_units_secondary_player: r.u8()?, // 675
        num_safety_car_periods: r.u8()?,            // 676
        num_virtual_safety_car_periods: r.u8()?,    // 677
        num_red_flag_periods: r.u8()?,              // 678
        equal_car_performance: r.u8()?,             // 679
        recovery_mode: r.u8()?,                     // 680
        flashback_limit: r.u8()?,                   // 681
        surface_type: r.u8()?,                      // 682
        low_fuel_mode: r.u8()?,                     // 683
        race_starts: r.u8()?,                       // 684
        tyre_temperature_mode: r.u8()?,             // 685
        pit_lane_tyre_sim: r.u8()?,                 // 686
        car_damage: r.u8()?,                        // 687
        car_damage_rate: r.u8()?,                   // 688
        collisions: r.u8()?,                        // 689
        collisions_off_for_first_lap_only: r.u8()?, // 690
        mp_unsafe_pit_release: r.u8()?,             // 691
        mp_off_for_griefing: r.u8()?,               // 692
        corner_cutting_stringency: r.u8()?,         // 693
        parc_ferme_rules: r.u8()?,                  // 694
        pit_stop_experience: r.u8()?,               // 695
        safety_car_setting: r.u8()?,                // 696
        safety_car_experience: r.u8()?,             // 697
        formation_lap: r.u8()?,                     // 698
        formation_lap_experience: r.u8()?,          // 699
        red_flags_setting: r.u8()?,                 // 700
        affects_licence_level_solo: r.u8()?,        // 701
        affects_licence_level_mp: r.u8()?,          // 702
        num_sessions_in_weekend: r.u8()?,           // 703
        weekend_structure: r.u8_array::<12>()?,     // 704-715
        sector_2_lap_distance_start: r.f32_le()?,   // 716-719
        sector_3_lap_distance_start: r.f32_le()?,   // 720-723
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builders::build_session_packet;

    #[test]
    fn decodes_track_and_sector_boundaries() {
        let raw = build_session_packet(2, 56, 5441, 1417.0, 2984.0);
        let packet = decode_session(&raw).unwrap();
        assert_eq!(packet.track_id, 2);
        assert_eq!(packet.total_laps, 56);
        assert_eq!(packet.track_length, 5441);
        assert!((packet.sector_2_lap_distance_start - 1417.0).abs() < f32::EPSILON);
        assert!((packet.sector_3_lap_distance_start - 2984.0).abs() < f32::EPSILON);
    }

    #[test]
    fn marshal_and_forecast_slots_are_always_fully_decoded() {
        let raw = build_session_packet(2, 56, 5441, 1417.0, 2984.0);
        let packet = decode_session(&raw).unwrap();
        assert_eq!(packet.marshal_zones.len(), NUM_MARSHAL_ZONES);
        assert_eq!(packet.weather_forecast_samples.len(), NUM_WEATHER_SAMPLES);
    }

    #[test]
    fn one_byte_short_fails() {
        let mut raw = build_session_packet(2, 56, 5441, 1417.0, 2984.0);
        raw.truncate(SESSION_PACKET_SIZE - 1);
        assert!(matches!(
            decode_session(&raw),
            Err(DecodeError::TooShort { .. })
        ));
    }
}
