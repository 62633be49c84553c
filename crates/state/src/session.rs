//! Session-scoped state, mutated only by Session packets and events.

use pitwall_protocol::{MarshalZone, SessionPacket, WeatherForecastSample};

use crate::tracks::track_name_from_id;

/// Sentinel for "no session packet seen yet".
pub const UNKNOWN_TRACK: i8 = -1;

/// Fastest lap of the session, taken from the fastest-lap event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FastestLap {
    pub car_index: u8,
    pub lap_time_sec: f32,
}

/// Session-wide state.  Starts from sentinel values and is overwritten
/// wholesale by each Session packet.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// 0 until the first packet of a session is applied.
    pub session_uid: u64,
    pub track_id: i8,
    /// Track length in metres, 0 until known.
    pub track_length_m: u16,
    pub session_type: u8,
    pub session_length: u8,
    pub weather: u8,
    pub track_temperature_c: i8,
    pub air_temperature_c: i8,
    pub total_laps: u8,
    pub session_time_left_sec: u16,
    pub session_duration_sec: u16,
    pub pit_speed_limit_kmh: u8,
    pub pit_stop_window_ideal_lap: u8,
    pub pit_stop_window_latest_lap: u8,
    pub safety_car_status: u8,
    pub num_safety_car_periods: u8,
    pub num_virtual_safety_car_periods: u8,
    pub num_red_flag_periods: u8,
    pub num_marshal_zones: u8,
    pub marshal_zones: Vec<MarshalZone>,
    pub num_weather_forecast_samples: u8,
    pub weather_forecast: Vec<WeatherForecastSample>,
    pub sector_2_start_m: f32,
    pub sector_3_start_m: f32,
    pub fastest_lap: Option<FastestLap>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            session_uid: 0,
            track_id: UNKNOWN_TRACK,
            track_length_m: 0,
            session_type: 0,
            session_length: 0,
            weather: 0,
            track_temperature_c: 0,
            air_temperature_c: 0,
            total_laps: 0,
            session_time_left_sec: 0,
            session_duration_sec: 0,
            pit_speed_limit_kmh: 0,
            pit_stop_window_ideal_lap: 0,
            pit_stop_window_latest_lap: 0,
            safety_car_status: 0,
            num_safety_car_periods: 0,
            num_virtual_safety_car_periods: 0,
            num_red_flag_periods: 0,
            num_marshal_zones: 0,
            marshal_zones: Vec::new(),
            num_weather_forecast_samples: 0,
            weather_forecast: Vec::new(),
            sector_2_start_m: 0.0,
            sector_3_start_m: 0.0,
            fastest_lap: None,
        }
    }
}

impl SessionState {
    /// Overwrite from a Session packet.  The fastest lap is event-sourced
    /// and survives Session packet refreshes.
    pub fn apply(&mut self, packet: &SessionPacket) {
        self.track_id = packet.track_id;
        self.track_length_m = packet.track_length;
        self.session_type = packet.session_type;
        self.session_length = packet.session_length;
        self.weather = packet.weather;
        self.track_temperature_c = packet.track_temperature;
        self.air_temperature_c = packet.air_temperature;
        self.total_laps = packet.total_laps;
        self.session_time_left_sec = packet.session_time_left;
        self.session_duration_sec = packet.session_duration;
        self.pit_speed_limit_kmh = packet.pit_speed_limit;
        self.pit_stop_window_ideal_lap = packet.pit_stop_window_ideal_lap;
        self.pit_stop_window_latest_lap = packet.pit_stop_window_latest_lap;
        self.safety_car_status = packet.safety_car_status;
        self.num_safety_car_periods = packet.num_safety_car_periods;
        self.num_virtual_safety_car_periods = packet.num_virtual_safety_car_periods;
        self.num_red_flag_periods = packet.num_red_flag_periods;
        self.num_marshal_zones = packet.num_marshal_zones;
        self.marshal_zones.clone_from(&packet.marshal_zones);
        self.num_weather_forecast_samples = packet.num_weather_forecast_samples;
        self.weather_forecast
            .clone_from(&packet.weather_forecast_samples);
        self.sector_2_start_m = packet.sector_2_lap_distance_start;
        self.sector_3_start_m = packet.sector_3_lap_distance_start;
    }

    /// Circuit name for the current track id.
    pub fn track_name(&self) -> &'static str {
        track_name_from_id(self.track_id)
    }

    /// Cumulative sector boundary distances in metres:
    /// `[0, s2_start, s3_start, track_length]`.
    pub fn sector_distances(&self) -> [f32; 4] {
        [
            0.0,
            self.sector_2_start_m,
            self.sector_3_start_m,
            f32::from(self.track_length_m),
        ]
    }
}
