//! EA F1 25 UDP telemetry wire protocol.
//!
//! Decodes the little-endian, fixed-layout binary packets the game emits
//! on UDP (packet format `2025`) into typed records.  Every packet starts
//! with a common 29-byte header whose `packet_id` selects one of sixteen
//! body layouts; packet id 3 carries a further tagged-union "event"
//! sub-protocol keyed by a 4-character ASCII code.
//!
//! ## Packet sizes (format 2025)
//!
//! | ID | Packet               | Bytes | Per-entry stride |
//! |----|----------------------|-------|------------------|
//! | 0  | Motion               | 1349  | 60 × 22 cars     |
//! | 1  | Session              | 753   | —                |
//! | 2  | Lap Data             | 1285  | 57 × 22 cars     |
//! | 3  | Event                | 45    | tagged union     |
//! | 4  | Participants         | 1284  | 57 × 22 cars     |
//! | 5  | Car Setups           | 1133  | 50 × 22 cars     |
//! | 6  | Car Telemetry        | 1352  | 60 × 22 cars     |
//! | 7  | Car Status           | 1239  | 55 × 22 cars     |
//! | 8  | Final Classification | 1042  | 46 × 22 cars     |
//! | 9  | Lobby Info           | 954   | 42 × 22 cars     |
//! | 10 | Car Damage           | 1041  | 46 × 22 cars     |
//! | 11 | Session History      | 1460  | 14 × 100 laps    |
//! | 12 | Tyre Sets            | 231   | 10 × 20 sets     |
//! | 13 | Motion Ex            | 273   | —                |
//! | 14 | Time Trial           | 101   | 24 × 3 sets      |
//! | 15 | Lap Positions        | 1131  | 22 × 50 laps     |
//!
//! Repeated sub-record counts are protocol constants; any embedded
//! "number of X" field communicates how many leading entries are
//! semantically valid, never how many bytes were sent.
//!
//! Decoding is stateless and idempotent: the same bytes always decode to
//! the same value, and truncated input fails with
//! [`DecodeError::TooShort`] instead of reading out of bounds.

pub mod builders;
mod car;
mod classification;
mod error;
mod event;
mod header;
mod lap;
mod motion;
mod packet;
mod participants;
mod reader;
mod session;

pub use car::{
    CarDamageData, CarDamagePacket, CarSetupData, CarSetupsPacket, CarStatusData,
    CarStatusPacket, CarTelemetryData, CarTelemetryPacket, decode_car_damage,
    decode_car_setups, decode_car_status, decode_car_telemetry,
};
pub use classification::{
    ClassificationData, FinalClassificationPacket, TyreSetData, TyreSetsPacket, TyreStint,
    decode_final_classification, decode_tyre_sets,
};
pub use error::DecodeError;
pub use event::{EventPacket, EventPayload, decode_event};
pub use header::{NO_SECONDARY_PLAYER, PacketHeader, decode_header};
pub use lap::{
    LapData, LapDataPacket, LapHistoryData, LapPositionsPacket, SessionHistoryPacket,
    TimeTrialDataSet, TimeTrialPacket, TyreStintHistory, combine_split_time, decode_lap_data,
    decode_lap_positions, decode_session_history, decode_time_trial,
};
pub use motion::{CarMotionData, MotionExPacket, MotionPacket, decode_motion, decode_motion_ex};
pub use packet::{Decoded, PacketBody, decode_body, decode_packet};
pub use participants::{
    LobbyInfoData, LobbyInfoPacket, ParticipantData, ParticipantsPacket, decode_lobby_info,
    decode_participants,
};
pub use reader::ByteReader;
pub use session::{MarshalZone, SessionPacket, WeatherForecastSample, decode_session};

/// Size of the common packet header.
pub const HEADER_SIZE: usize = 29;

/// Protocol version this crate decodes.
pub const PACKET_FORMAT_2025: u16 = 2025;

/// Grid slots in every per-car packet.
pub const NUM_CARS: usize = 22;

/// Marshal zones in the Session packet.
pub const NUM_MARSHAL_ZONES: usize = 21;

/// Weather forecast samples in the Session packet.
pub const NUM_WEATHER_SAMPLES: usize = 64;

/// Lap entries in the Session History packet.
pub const NUM_LAP_HISTORY_ENTRIES: usize = 100;

/// Tyre stint entries in Session History and Final Classification.
pub const NUM_TYRE_STINTS: usize = 8;

/// Entries in the Tyre Sets packet (13 slick + 7 wet weather).
pub const NUM_TYRE_SETS: usize = 20;

/// Lap rows in the Lap Positions packet.
pub const NUM_LAP_POSITION_LAPS: usize = 50;

/// Largest UDP payload over IPv4.
pub const MAX_UDP_PAYLOAD: usize = 65_507;

// Packet ids, in wire order.
pub const PACKET_ID_MOTION: u8 = 0;
pub const PACKET_ID_SESSION: u8 = 1;
pub const PACKET_ID_LAP_DATA: u8 = 2;
pub const PACKET_ID_EVENT: u8 = 3;
pub const PACKET_ID_PARTICIPANTS: u8 = 4;
pub const PACKET_ID_CAR_SETUPS: u8 = 5;
pub const PACKET_ID_CAR_TELEMETRY: u8 = 6;
pub const PACKET_ID_CAR_STATUS: u8 = 7;
pub const PACKET_ID_FINAL_CLASSIFICATION: u8 = 8;
pub const PACKET_ID_LOBBY_INFO: u8 = 9;
pub const PACKET_ID_CAR_DAMAGE: u8 = 10;
pub const PACKET_ID_SESSION_HISTORY: u8 = 11;
pub const PACKET_ID_TYRE_SETS: u8 = 12;
pub const PACKET_ID_MOTION_EX: u8 = 13;
pub const PACKET_ID_TIME_TRIAL: u8 = 14;
pub const PACKET_ID_LAP_POSITIONS: u8 = 15;

// Per-entry strides.
pub const MOTION_ENTRY_SIZE: usize = 60;
pub const LAP_DATA_ENTRY_SIZE: usize = 57;
pub const PARTICIPANT_ENTRY_SIZE: usize = 57;
pub const CAR_SETUP_ENTRY_SIZE: usize = 50;
pub const CAR_TELEMETRY_ENTRY_SIZE: usize = 60;
pub const CAR_STATUS_ENTRY_SIZE: usize = 55;
pub const CLASSIFICATION_ENTRY_SIZE: usize = 46;
pub const LOBBY_ENTRY_SIZE: usize = 42;
pub const CAR_DAMAGE_ENTRY_SIZE: usize = 46;
pub const LAP_HISTORY_ENTRY_SIZE: usize = 14;
pub const TYRE_STINT_ENTRY_SIZE: usize = 3;
pub const TYRE_SET_ENTRY_SIZE: usize = 10;
pub const MARSHAL_ZONE_SIZE: usize = 5;
pub const WEATHER_SAMPLE_SIZE: usize = 8;
pub const TIME_TRIAL_SET_SIZE: usize = 24;

// Total packet sizes, header included.
pub const MOTION_PACKET_SIZE: usize = HEADER_SIZE + NUM_CARS * MOTION_ENTRY_SIZE;
pub const SESSION_PACKET_SIZE: usize = HEADER_SIZE + 724;
pub const LAP_DATA_PACKET_SIZE: usize = HEADER_SIZE + NUM_CARS * LAP_DATA_ENTRY_SIZE + 2;
pub const EVENT_PACKET_SIZE: usize = 45;
pub const PARTICIPANTS_PACKET_SIZE: usize = HEADER_SIZE + 1 + NUM_CARS * PARTICIPANT_ENTRY_SIZE;
pub const CAR_SETUPS_PACKET_SIZE: usize = HEADER_SIZE + NUM_CARS * CAR_SETUP_ENTRY_SIZE + 4;
pub const CAR_TELEMETRY_PACKET_SIZE: usize =
    HEADER_SIZE + NUM_CARS * CAR_TELEMETRY_ENTRY_SIZE + 3;
pub const CAR_STATUS_PACKET_SIZE: usize = HEADER_SIZE + NUM_CARS * CAR_STATUS_ENTRY_SIZE;
pub const FINAL_CLASSIFICATION_PACKET_SIZE: usize =
    HEADER_SIZE + 1 + NUM_CARS * CLASSIFICATION_ENTRY_SIZE;
pub const LOBBY_INFO_PACKET_SIZE: usize = HEADER_SIZE + 1 + NUM_CARS * LOBBY_ENTRY_SIZE;
pub const CAR_DAMAGE_PACKET_SIZE: usize = HEADER_SIZE + NUM_CARS * CAR_DAMAGE_ENTRY_SIZE;
pub const SESSION_HISTORY_PACKET_SIZE: usize = HEADER_SIZE
    + 7
    + NUM_LAP_HISTORY_ENTRIES * LAP_HISTORY_ENTRY_SIZE
    + NUM_TYRE_STINTS * TYRE_STINT_ENTRY_SIZE;
pub const TYRE_SETS_PACKET_SIZE: usize = HEADER_SIZE + 1 + NUM_TYRE_SETS * TYRE_SET_ENTRY_SIZE + 1;
pub const MOTION_EX_PACKET_SIZE: usize = HEADER_SIZE + 61 * 4;
pub const TIME_TRIAL_PACKET_SIZE: usize = HEADER_SIZE + 3 * TIME_TRIAL_SET_SIZE;
pub const LAP_POSITIONS_PACKET_SIZE: usize =
    HEADER_SIZE + 2 + NUM_LAP_POSITION_LAPS * NUM_CARS;
