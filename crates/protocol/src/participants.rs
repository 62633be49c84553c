//! Participants (id 4) and Lobby Info (id 9) packets.

use crate::error::DecodeError;
use crate::reader::ByteReader;
use crate::{
    HEADER_SIZE, LOBBY_ENTRY_SIZE, LOBBY_INFO_PACKET_SIZE, NUM_CARS, PARTICIPANT_ENTRY_SIZE,
    PARTICIPANTS_PACKET_SIZE,
};

/// Identity of one participant (57 bytes on the wire).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticipantData {
    /// 0 human, 1 AI.
    pub ai_controlled: u8,
    pub driver_id: u8,
    /// Unique id in multiplayer, 255 offline.
    pub network_id: u8,
    pub team_id: u8,
    pub my_team: u8,
    pub race_number: u8,
    pub nationality: u8,
    /// UTF-8 driver name, truncated at the first NUL.
    pub name: String,
    /// 0 telemetry restricted, 1 public.
    pub your_telemetry: u8,
    pub show_online_names: u8,
    pub tech_level: u16,
    pub platform: u8,
    pub num_livery_colours: u8,
    /// Up to four RGB livery colours.
    pub livery_colours: [[u8; 3]; 4],
}

/// Participants packet: grid identity for every slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantsPacket {
    pub num_active_cars: u8,
    pub participants: Vec<ParticipantData>,
}

/// Decode a Participants packet (id 4).
///
/// # Errors
///
/// [`DecodeError::TooShort`] if `raw` is shorter than 1284 bytes.
pub fn decode_participants(raw: &[u8]) -> Result<ParticipantsPacket, DecodeError> {
    if raw.len() < PARTICIPANTS_PACKET_SIZE {
        return Err(DecodeError::TooShort {
            needed: PARTICIPANTS_PACKET_SIZE,
            len: raw.len(),
        });
    }

    let mut r = ByteReader::at(raw, HEADER_SIZE);
    let num_active_cars = r.u8()?;

    let mut participants = Vec::with_capacity(NUM_CARS);
    for index in 0..NUM_CARS {
        let mut r = ByteReader::at(raw, HEADER_SIZE + 1 + index * PARTICIPANT_ENTRY_SIZE);
        let ai_controlled = r.u8()?;            // 0
        let driver_id = r.u8()?;                // 1
        let network_id = r.u8()?;               // 2
        let team_id = r.u8()?;                  // 3
        let my_team = r.u8()?;                  // 4
        let race_number = r.u8()?;              // 5
        let nationality = r.u8()?;              // 6
        let name = r.fixed_string::<32>()?;     // 7-38
        let your_telemetry = r.u8()?;           // 39
        let show_online_names = r.u8()?;        // 40
        let tech_level = r.u16_le()?;           // 41-42
        let platform = r.u8()?;                 // 43
        let num_livery_colours = r.u8()?;       // 44
        let mut livery_colours = [[0u8; 3]; 4];
        for colour in livery_colours.iter_mut() {
            *colour = r.u8_array::<3>()?;       // 45-56
        }
        participants.push(ParticipantData {
            ai_controlled,
            driver_id,
            network_id,
            team_id,
            my_team,
            race_number,
            nationality,
            name,
            your_telemetry,
            show_online_names,
            tech_level,
            platform,
            num_livery_colours,
            livery_colours,
        });
    }

    Ok(ParticipantsPacket {
        num_active_cars,
        participants,
    })
}

/// One lobby member (42 bytes on the wire).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LobbyInfoData {
    pub ai_controlled: u8,
    pub team_id: u8,
    pub nationality: u8,
    pub platform: u8,
    pub name: String,
    pub car_number: u8,
    pub your_telemetry: u8,
    pub show_online_names: u8,
    pub tech_level: u16,
    /// 0 not ready, 1 ready, 2 spectating.
    pub ready_status: u8,
}

/// Lobby Info packet: pre-session lobby membership.
#[derive(Debug, Clone, PartialEq)]
pub struct LobbyInfoPacket {
    pub num_players: u8,
    pub players: Vec<LobbyInfoData>,
}

/// Decode a Lobby Info packet (id 9).
///
/// # Errors
///
/// [`DecodeError::TooShort`] if `raw` is shorter than 954 bytes.
pub fn decode_lobby_info(raw: &[u8]) -> Result<LobbyInfoPacket, DecodeError> {
    if raw.len() < LOBBY_INFO_PACKET_SIZE {
        return Err(DecodeError::TooShort {
            needed: LOBBY_INFO_PACKET_SIZE,
            len: raw.len(),
        });
    }

    let mut r = ByteReader::at(raw, HEADER_SIZE);
    let num_players = r.u8()?;

    let mut players = Vec::with_capacity(NUM_CARS);
    for index in 0..NUM_CARS {
        let mut r = ByteReader::at(raw, HEADER_SIZE + 1 + index * LOBBY_ENTRY_SIZE);
        players.push(LobbyInfoData {
            ai_controlled: r.u8()?,             // 0
            team_id: r.u8()?,                   // 1
            nationality: r.u8()?,               // 2
            platform: r.u8()?,                  // 3
            name: r.fixed_string::<32>()?,      // 4-35
            car_number: r.u8()?,                // 36
            your_telemetry: r.u8()?,            // 37
            show_online_names: r.u8()?,         // 38
            tech_level: r.u16_le()?,            // 39-40
            ready_status: r.u8()?,              // 41
        });
    }

    Ok(LobbyInfoPacket {
        num_players,
        players,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builders::build_participants_packet;

    #[test]
    fn decodes_names_and_ai_flags() {
        let raw = build_participants_packet(&[(0, "VERSTAPPEN"), (1, "BOT 07")]);
        let packet = decode_participants(&raw).unwrap();
        assert_eq!(packet.num_active_cars, 2);
        assert_eq!(packet.participants.len(), NUM_CARS);
        assert_eq!(packet.participants[0].name, "VERSTAPPEN");
        assert_eq!(packet.participants[0].ai_controlled, 0);
        assert_eq!(packet.participants[1].name, "BOT 07");
        assert_eq!(packet.participants[1].ai_controlled, 1);
        assert_eq!(packet.participants[2].name, "");
    }

    #[test]
    fn all_22_slots_decode_regardless_of_active_count() {
        let raw = build_participants_packet(&[(0, "ONLY HUMAN")]);
        let packet = decode_participants(&raw).unwrap();
        assert_eq!(packet.num_active_cars, 1);
        assert_eq!(packet.participants.len(), NUM_CARS);
    }

    #[test]
    fn one_byte_short_fails() {
        let mut raw = build_participants_packet(&[(0, "X")]);
        raw.truncate(PARTICIPANTS_PACKET_SIZE - 1);
        assert!(matches!(
            decode_participants(&raw),
            Err(DecodeError::TooShort { .. })
        ));
    }
}
