//! The 29-byte packet header shared by every packet type.

use crate::error::DecodeError;
use crate::reader::ByteReader;
use crate::HEADER_SIZE;

/// Sentinel for "no secondary player" in `secondary_player_car_index`.
pub const NO_SECONDARY_PLAYER: u8 = 255;

/// Decoded 29-byte packet header.
///
/// Identifies which body decoder applies (`packet_id`), which session the
/// packet belongs to (`session_uid`) and where the player sits on the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacketHeader {
    /// Protocol version discriminator (2025 for F1 25).
    pub packet_format: u16,
    /// Game year, last two digits (25).
    pub game_year: u8,
    pub game_major_version: u8,
    pub game_minor_version: u8,
    /// Version of this packet type.
    pub packet_version: u8,
    /// Selects the body decoder (0–15).
    pub packet_id: u8,
    /// Unique identifier of the session; changes at session boundaries.
    pub session_uid: u64,
    /// Session timestamp in seconds.
    pub session_time: f32,
    /// Frame the data was retrieved on.
    pub frame_identifier: u32,
    /// Frame identifier that does not go back after flashbacks.
    pub overall_frame_identifier: u32,
    /// Index of the player's car on the grid.
    pub player_car_index: u8,
    /// Index of the second player's car in split-screen, 255 otherwise.
    pub secondary_player_car_index: u8,
}

impl PacketHeader {
    /// The split-screen second player's car index, if present.
    pub fn secondary_player(&self) -> Option<u8> {
        if self.secondary_player_car_index == NO_SECONDARY_PLAYER {
            None
        } else {
            Some(self.secondary_player_car_index)
        }
    }
}

/// Decode the 29-byte header from the front of a raw datagram.
///
/// Pure function: no side effects, no allocation beyond the returned value.
///
/// # Errors
///
/// Returns [`DecodeError::TooShort`] if `raw` holds fewer than 29 bytes.
pub fn decode_header(raw: &[u8]) -> Result<PacketHeader, DecodeError> {
    if raw.len() < HEADER_SIZE {
        return Err(DecodeError::TooShort {
            needed: HEADER_SIZE,
            len: raw.len(),
        });
    }
    let mut r = ByteReader::new(raw);
    Ok(PacketHeader {
        packet_format: r.u16_le()?,                 // 0-1
        game_year: r.u8()?,                         // 2
        game_major_version: r.u8()?,                // 3
        game_minor_version: r.u8()?,                // 4
        packet_version: r.u8()?,                    // 5
        packet_id: r.u8()?,                         // 6
        session_uid: r.u64_le()?,                   // 7-14
        session_time: r.f32_le()?,                  // 15-18
        frame_identifier: r.u32_le()?,              // 19-22
        overall_frame_identifier: r.u32_le()?,      // 23-26
        player_car_index: r.u8()?,                  // 27
        secondary_player_car_index: r.u8()?,        // 28
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builders::build_header_bytes;

    #[test]
    fn header_round_trips_all_fields() {
        let raw = build_header_bytes(2025, 6, 3);
        let h = decode_header(&raw).unwrap();
        assert_eq!(h.packet_format, 2025);
        assert_eq!(h.game_year, 25);
        assert_eq!(h.packet_id, 6);
        assert_eq!(h.player_car_index, 3);
        assert_eq!(h.secondary_player_car_index, NO_SECONDARY_PLAYER);
        assert_eq!(h.secondary_player(), None);
    }

    #[test]
    fn short_buffer_fails_with_too_short() {
        let raw = [0u8; HEADER_SIZE - 1];
        assert_eq!(
            decode_header(&raw),
            Err(DecodeError::TooShort {
                needed: HEADER_SIZE,
                len: HEADER_SIZE - 1
            })
        );
    }

    #[test]
    fn exactly_29_bytes_decodes() {
        let raw = build_header_bytes(2025, 0, 0);
        assert_eq!(raw.len(), HEADER_SIZE);
        assert!(decode_header(&raw).is_ok());
    }
}
