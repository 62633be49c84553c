//! Top-level dispatch: raw datagram in, typed packet out.

use crate::error::DecodeError;
use crate::event::{EventPacket, decode_event};
use crate::header::{PacketHeader, decode_header};
use crate::lap::{
    LapDataPacket, LapPositionsPacket, SessionHistoryPacket, TimeTrialPacket, decode_lap_data,
    decode_lap_positions, decode_session_history, decode_time_trial,
};
use crate::motion::{MotionExPacket, MotionPacket, decode_motion, decode_motion_ex};
use crate::participants::{
    LobbyInfoPacket, ParticipantsPacket, decode_lobby_info, decode_participants,
};
use crate::session::{SessionPacket, decode_session};
use crate::car::{
    CarDamagePacket, CarSetupsPacket, CarStatusPacket, CarTelemetryPacket, decode_car_damage,
    decode_car_setups, decode_car_status, decode_car_telemetry,
};
use crate::classification::{
    FinalClassificationPacket, TyreSetsPacket, decode_final_classification, decode_tyre_sets,
};
use crate::{
    PACKET_FORMAT_2025, PACKET_ID_CAR_DAMAGE, PACKET_ID_CAR_SETUPS, PACKET_ID_CAR_STATUS,
    PACKET_ID_CAR_TELEMETRY, PACKET_ID_EVENT, PACKET_ID_FINAL_CLASSIFICATION,
    PACKET_ID_LAP_DATA, PACKET_ID_LAP_POSITIONS, PACKET_ID_LOBBY_INFO, PACKET_ID_MOTION,
    PACKET_ID_MOTION_EX, PACKET_ID_PARTICIPANTS, PACKET_ID_SESSION, PACKET_ID_SESSION_HISTORY,
    PACKET_ID_TIME_TRIAL, PACKET_ID_TYRE_SETS,
};

/// A decoded packet body, one variant per packet id.
#[derive(Debug, Clone, PartialEq)]
pub enum PacketBody {
    Motion(MotionPacket),
    Session(SessionPacket),
    LapData(LapDataPacket),
    Event(EventPacket),
    Participants(ParticipantsPacket),
    CarSetups(CarSetupsPacket),
    CarTelemetry(CarTelemetryPacket),
    CarStatus(CarStatusPacket),
    FinalClassification(FinalClassificationPacket),
    LobbyInfo(LobbyInfoPacket),
    CarDamage(CarDamagePacket),
    SessionHistory(SessionHistoryPacket),
    TyreSets(TyreSetsPacket),
    MotionEx(MotionExPacket),
    TimeTrial(TimeTrialPacket),
    LapPositions(LapPositionsPacket),
    /// A packet id this decoder does not know; a recognised skip, not an
    /// error, so a game patch cannot break the stream.
    Unhandled { packet_id: u8 },
}

/// A fully decoded datagram: header plus body.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub header: PacketHeader,
    pub body: PacketBody,
}

/// Decode a packet body given its already decoded header.
///
/// # Errors
///
/// [`DecodeError::TooShort`] if `raw` is shorter than the body decoder
/// for `header.packet_id` requires.
pub fn decode_body(header: &PacketHeader, raw: &[u8]) -> Result<PacketBody, DecodeError> {
    Ok(match header.packet_id {
        PACKET_ID_MOTION => PacketBody::Motion(decode_motion(raw)?),
        PACKET_ID_SESSION => PacketBody::Session(decode_session(raw)?),
        PACKET_ID_LAP_DATA => PacketBody::LapData(decode_lap_data(raw)?),
        PACKET_ID_EVENT => PacketBody::Event(decode_event(raw)?),
        PACKET_ID_PARTICIPANTS => PacketBody::Participants(decode_participants(raw)?),
        PACKET_ID_CAR_SETUPS => PacketBody::CarSetups(decode_car_setups(raw)?),
        PACKET_ID_CAR_TELEMETRY => PacketBody::CarTelemetry(decode_car_telemetry(raw)?),
        PACKET_ID_CAR_STATUS => PacketBody::CarStatus(decode_car_status(raw)?),
        PACKET_ID_FINAL_CLASSIFICATION => {
            PacketBody::FinalClassification(decode_final_classification(raw)?)
        }
        PACKET_ID_LOBBY_INFO => PacketBody::LobbyInfo(decode_lobby_info(raw)?),
        PACKET_ID_CAR_DAMAGE => PacketBody::CarDamage(decode_car_damage(raw)?),
        PACKET_ID_SESSION_HISTORY => PacketBody::SessionHistory(decode_session_history(raw)?),
        PACKET_ID_TYRE_SETS => PacketBody::TyreSets(decode_tyre_sets(raw)?),
        PACKET_ID_MOTION_EX => PacketBody::MotionEx(decode_motion_ex(raw)?),
        PACKET_ID_TIME_TRIAL => PacketBody::TimeTrial(decode_time_trial(raw)?),
        PACKET_ID_LAP_POSITIONS => PacketBody::LapPositions(decode_lap_positions(raw)?),
        other => PacketBody::Unhandled { packet_id: other },
    })
}

/// Decode a whole datagram: header, format check, then body dispatch.
///
/// # Errors
///
/// * [`DecodeError::TooShort`] for a truncated header or body.
/// * [`DecodeError::UnsupportedFormat`] if `packet_format` is not 2025;
///   offsets differ across formats, so decoding anyway would produce
///   silently wrong values.
pub fn decode_packet(raw: &[u8]) -> Result<Decoded, DecodeError> {
    let header = decode_header(raw)?;
    if header.packet_format != PACKET_FORMAT_2025 {
        return Err(DecodeError::UnsupportedFormat {
            format: header.packet_format,
            expected: PACKET_FORMAT_2025,
        });
    }
    let body = decode_body(&header, raw)?;
    Ok(Decoded { header, body })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builders::{build_header_bytes, build_session_packet};

    #[test]
    fn foreign_format_is_rejected_before_body_decode() {
        let raw = build_header_bytes(2024, PACKET_ID_MOTION, 0);
        assert_eq!(
            decode_packet(&raw),
            Err(DecodeError::UnsupportedFormat {
                format: 2024,
                expected: 2025,
            })
        );
    }

    #[test]
    fn unknown_packet_id_decodes_to_unhandled() {
        let raw = build_header_bytes(2025, 200, 0);
        let decoded = decode_packet(&raw).unwrap();
        assert_eq!(decoded.body, PacketBody::Unhandled { packet_id: 200 });
    }

    #[test]
    fn session_packet_dispatches_to_the_session_decoder() {
        let raw = build_session_packet(2, 56, 5441, 1417.0, 2984.0);
        let decoded = decode_packet(&raw).unwrap();
        assert!(matches!(decoded.body, PacketBody::Session(_)));
        assert_eq!(decoded.header.packet_id, PACKET_ID_SESSION);
    }
}
