//! Player car resolution.

use pitwall_protocol::{PacketHeader, ParticipantsPacket};

/// Sentinel for "no packet has identified the player yet".
pub const UNRESOLVED_INDEX: u8 = 255;

/// Which grid slots belong to people.
///
/// The primary and secondary indices come from every header; the set of
/// human-driven cars can only be resolved once a Participants packet
/// arrives and stays empty until then.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerContext {
    pub primary_index: u8,
    pub secondary_index: Option<u8>,
    /// Grid indices with `ai_controlled == 0`, ascending.
    pub human_cars: Vec<u8>,
}

impl Default for PlayerContext {
    fn default() -> Self {
        Self {
            primary_index: UNRESOLVED_INDEX,
            secondary_index: None,
            human_cars: Vec::new(),
        }
    }
}

impl PlayerContext {
    pub fn update_from_header(&mut self, header: &PacketHeader) {
        self.primary_index = header.player_car_index;
        self.secondary_index = header.secondary_player();
    }

    pub fn update_from_participants(&mut self, packet: &ParticipantsPacket) {
        let live = usize::from(packet.num_active_cars).min(packet.participants.len());
        self.human_cars = packet.participants[..live]
            .iter()
            .enumerate()
            .filter(|(_, p)| p.ai_controlled == 0)
            .map(|(index, _)| index as u8)
            .collect();
    }

    pub fn is_resolved(&self) -> bool {
        self.primary_index != UNRESOLVED_INDEX
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pitwall_protocol::builders::{build_header_bytes, build_participants_packet};
    use pitwall_protocol::{decode_header, decode_participants};

    #[test]
    fn header_resolves_primary_and_absent_secondary() {
        let header = decode_header(&build_header_bytes(2025, 0, 7)).unwrap();
        let mut player = PlayerContext::default();
        assert!(!player.is_resolved());
        player.update_from_header(&header);
        assert_eq!(player.primary_index, 7);
        assert_eq!(player.secondary_index, None);
        assert!(player.is_resolved());
    }

    #[test]
    fn humans_come_from_the_ai_controlled_flag() {
        let raw = build_participants_packet(&[(0, "YOU"), (1, "BOT"), (0, "FRIEND")]);
        let packet = decode_participants(&raw).unwrap();
        let mut player = PlayerContext::default();
        player.update_from_participants(&packet);
        assert_eq!(player.human_cars, vec![0, 2]);
    }
}
