//! Event packet (id 3): a tagged union keyed by a 4-character ASCII code.
//!
//! Unlike every other packet, events are variable-significance: most carry
//! a small payload, some carry none.  The buffer only needs to be long
//! enough for the code plus that payload, not the full padded 45 bytes.

use crate::error::DecodeError;
use crate::reader::ByteReader;
use crate::HEADER_SIZE;

/// Offset of the 4-byte event code within the packet.
const CODE_OFFSET: usize = HEADER_SIZE;

/// Offset of the event payload within the packet.
const PAYLOAD_OFFSET: usize = HEADER_SIZE + 4;

/// Decoded event payload.
///
/// Codes this decoder does not know arrive as [`EventPayload::Unrecognised`]
/// so a game patch that adds events cannot break the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventPayload {
    SessionStarted,
    SessionEnded,
    FastestLap {
        car_index: u8,
        lap_time_sec: f32,
    },
    Retirement {
        car_index: u8,
        reason: u8,
    },
    DrsEnabled,
    DrsDisabled {
        reason: u8,
    },
    TeamMateInPits {
        car_index: u8,
    },
    ChequeredFlag,
    RaceWinner {
        car_index: u8,
    },
    Penalty {
        penalty_type: u8,
        infringement_type: u8,
        car_index: u8,
        other_car_index: u8,
        time_sec: u8,
        lap_number: u8,
        places_gained: u8,
    },
    SpeedTrap {
        car_index: u8,
        speed_kmh: f32,
        is_overall_fastest: u8,
        is_driver_fastest: u8,
        fastest_car_index: u8,
        fastest_speed_kmh: f32,
    },
    StartLights {
        num_lights: u8,
    },
    LightsOut,
    DriveThroughServed {
        car_index: u8,
    },
    StopGoServed {
        car_index: u8,
    },
    Flashback {
        frame_identifier: u32,
        session_time_sec: f32,
    },
    ButtonStatus {
        button_flags: u32,
    },
    RedFlag,
    Overtake {
        overtaking_car_index: u8,
        overtaken_car_index: u8,
    },
    SafetyCar {
        safety_car_type: u8,
        event_type: u8,
    },
    Collision {
        car_index_1: u8,
        car_index_2: u8,
    },
    /// An event code this decoder does not know.
    Unrecognised {
        code: [u8; 4],
    },
}

/// Event packet: the code string plus its decoded payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventPacket {
    pub code: [u8; 4],
    pub payload: EventPayload,
}

/// Decode an Event packet (id 3).
///
/// # Errors
///
/// [`DecodeError::TooShort`] if `raw` cannot hold the 4-byte code plus
/// the payload that code requires.
pub fn decode_event(raw: &[u8]) -> Result<EventPacket, DecodeError> {
    if raw.len() < PAYLOAD_OFFSET {
        return Err(DecodeError::TooShort {
            needed: PAYLOAD_OFFSET,
            len: raw.len(),
        });
    }
    let mut code = [0u8; 4];
    code.copy_from_slice(&raw[CODE_OFFSET..PAYLOAD_OFFSET]);

    let payload_len = match &code {
        b"FTLP" => 5,
        b"RTMT" | b"OVTK" | b"COLL" | b"SCAR" => 2,
        b"DRSD" | b"TMPT" | b"RCWN" | b"STLG" | b"DTSV" | b"SGSV" => 1,
        b"PENA" => 7,
        b"SPTP" => 12,
        b"FLBK" => 8,
        b"BUTN" => 4,
        _ => 0,
    };
    let needed = PAYLOAD_OFFSET + payload_len;
    if raw.len() < needed {
        return Err(DecodeError::TooShort {
            needed,
            len: raw.len(),
        });
    }

    let mut r = ByteReader::at(raw, PAYLOAD_OFFSET);
    let payload = match &code {
        b"SSTA" => EventPayload::SessionStarted,
        b"SEND" => EventPayload::SessionEnded,
        b"FTLP" => EventPayload::FastestLap {
            car_index: r.u8()?,
            lap_time_sec: r.f32_le()?,
        },
        b"RTMT" => EventPayload::Retirement {
            car_index: r.u8()?,
            reason: r.u8()?,
        },
        b"DRSE" => EventPayload::DrsEnabled,
        b"DRSD" => EventPayload::DrsDisabled { reason: r.u8()? },
        b"TMPT" => EventPayload::TeamMateInPits { car_index: r.u8()? },
        b"CHQF" => EventPayload::ChequeredFlag,
        b"RCWN" => EventPayload::RaceWinner { car_index: r.u8()? },
        b"PENA" => EventPayload::Penalty {
            penalty_type: r.u8()?,
            infringement_type: r.u8()?,
            car_index: r.u8()?,
            other_car_index: r.u8()?,
            time_sec: r.u8()?,
            lap_number: r.u8()?,
            places_gained: r.u8()?,
        },
        b"SPTP" => EventPayload::SpeedTrap {
            car_index: r.u8()?,
            speed_kmh: r.f32_le()?,
            is_overall_fastest: r.u8()?,
            is_driver_fastest: r.u8()?,
            fastest_car_index: r.u8()?,
            fastest_speed_kmh: r.f32_le()?,
        },
        b"STLG" => EventPayload::StartLights { num_lights: r.u8()? },
        b"LGOT" => EventPayload::LightsOut,
        b"DTSV" => EventPayload::DriveThroughServed { car_index: r.u8()? },
        b"SGSV" => EventPayload::StopGoServed { car_index: r.u8()? },
        b"FLBK" => EventPayload::Flashback {
            frame_identifier: r.u32_le()?,
            session_time_sec: r.f32_le()?,
        },
        b"BUTN" => EventPayload::ButtonStatus {
            button_flags: r.u32_le()?,
        },
        b"RDFL" => EventPayload::RedFlag,
        b"OVTK" => EventPayload::Overtake {
            overtaking_car_index: r.u8()?,
            overtaken_car_index: r.u8()?,
        },
        b"SCAR" => EventPayload::SafetyCar {
            safety_car_type: r.u8()?,
            event_type: r.u8()?,
        },
        b"COLL" => EventPayload::Collision {
            car_index_1: r.u8()?,
            car_index_2: r.u8()?,
        },
        _ => EventPayload::Unrecognised { code },
    };

    Ok(EventPacket { code, payload })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builders::build_event_packet;

    #[test]
    fn fastest_lap_event_decodes_car_and_time() {
        let mut payload = Vec::new();
        payload.push(14u8);
        payload.extend_from_slice(&88.417f32.to_le_bytes());
        let raw = build_event_packet(b"FTLP", &payload);
        let event = decode_event(&raw).unwrap();
        assert_eq!(
            event.payload,
            EventPayload::FastestLap {
                car_index: 14,
                lap_time_sec: 88.417,
            }
        );
    }

    #[test]
    fn no_payload_events_need_only_the_code() {
        let mut raw = build_event_packet(b"SSTA", &[]);
        // Strip the padding after the code; the decode must still succeed.
        raw.truncate(HEADER_SIZE + 4);
        assert_eq!(
            decode_event(&raw).unwrap().payload,
            EventPayload::SessionStarted
        );
    }

    #[test]
    fn known_codes_read_only_their_own_width() {
        let mut payload = Vec::new();
        payload.push(7u8);
        payload.extend_from_slice(&91.003f32.to_le_bytes());
        let mut raw = build_event_packet(b"FTLP", &payload);
        // Exactly code + 5 payload bytes, nothing beyond.
        raw.truncate(HEADER_SIZE + 4 + 5);
        assert_eq!(
            decode_event(&raw).unwrap().payload,
            EventPayload::FastestLap {
                car_index: 7,
                lap_time_sec: 91.003,
            }
        );
    }

    #[test]
    fn unknown_code_is_a_value_not_an_error() {
        let raw = build_event_packet(b"XXXX", &[]);
        let event = decode_event(&raw).unwrap();
        assert_eq!(
            event.payload,
            EventPayload::Unrecognised { code: *b"XXXX" }
        );
    }

    #[test]
    fn truncated_payload_fails() {
        let mut raw = build_event_packet(b"PENA", &[1, 2, 3, 4, 5, 6, 7]);
        raw.truncate(HEADER_SIZE + 4 + 3);
        assert!(matches!(
            decode_event(&raw),
            Err(DecodeError::TooShort { .. })
        ));
    }

    #[test]
    fn overtake_event_decodes_both_cars() {
        let raw = build_event_packet(b"OVTK", &[3, 9]);
        assert_eq!(
            decode_event(&raw).unwrap().payload,
            EventPayload::Overtake {
                overtaking_car_index: 3,
                overtaken_car_index: 9,
            }
        );
    }
}
