//! The aggregate store: one writer, many readers.

use parking_lot::RwLock;
use tracing::{debug, info};

use pitwall_protocol::{
    Decoded, EventPacket, EventPayload, LobbyInfoPacket, MotionExPacket, PacketBody,
    TimeTrialPacket, NUM_CARS,
};

use crate::car::{CarSlot, LapPosition};
use crate::player::PlayerContext;
use crate::session::{FastestLap, SessionState};

/// Everything known about the race right now.
///
/// This is both the value under the store's lock and the snapshot type
/// handed to readers.
#[derive(Debug, Clone)]
pub struct RaceState {
    pub session: SessionState,
    pub cars: [CarSlot; NUM_CARS],
    pub player: PlayerContext,
    pub lobby: Option<LobbyInfoPacket>,
    pub motion_ex: Option<MotionExPacket>,
    pub time_trial: Option<TimeTrialPacket>,
    pub last_event: Option<EventPacket>,
    /// Cumulative count, not reset at session boundaries.
    pub packets_applied: u64,
}

impl Default for RaceState {
    fn default() -> Self {
        Self {
            session: SessionState::default(),
            cars: std::array::from_fn(|_| CarSlot::default()),
            player: PlayerContext::default(),
            lobby: None,
            motion_ex: None,
            time_trial: None,
            last_event: None,
            packets_applied: 0,
        }
    }
}

impl RaceState {
    /// Session-boundary reset.  Car slots survive as objects but lose
    /// their contents; the packet counter is cumulative and survives.
    fn reset(&mut self) {
        self.session = SessionState::default();
        for slot in &mut self.cars {
            slot.reset();
        }
        self.player = PlayerContext::default();
        self.lobby = None;
        self.motion_ex = None;
        self.time_trial = None;
        self.last_event = None;
    }

    fn position_of(&self, car_index: usize) -> Option<u8> {
        self.cars
            .get(car_index)?
            .lap
            .as_ref()
            .map(|lap| lap.car_position)
            .filter(|&p| p != 0)
    }

    fn car_at_position(&self, position: u8) -> Option<usize> {
        // Positions are unique on the wire; if a glitch duplicates one,
        // the first index wins.
        self.cars
            .iter()
            .position(|slot| slot.lap.as_ref().is_some_and(|l| l.car_position == position))
    }

    /// Index of the car one place ahead of `car_index`, if any.
    pub fn car_ahead(&self, car_index: usize) -> Option<usize> {
        let position = self.position_of(car_index)?;
        if position <= 1 {
            return None;
        }
        self.car_at_position(position - 1)
    }

    /// Index of the car one place behind `car_index`, if any.
    pub fn car_behind(&self, car_index: usize) -> Option<usize> {
        let position = self.position_of(car_index)?;
        self.car_at_position(position + 1)
    }

    /// Live pace delta in milliseconds against the same point of the
    /// previous lap: positive means slower than last lap.
    ///
    /// The previous lap's elapsed time at the car's current distance is
    /// rebuilt from its lap-history sector times, apportioning linearly
    /// inside the sector the car is in.  Zero-length sectors contribute
    /// nothing rather than dividing by zero.
    pub fn pace_delta_ms(&self, car_index: usize) -> Option<i64> {
        let slot = self.cars.get(car_index)?;
        let lap = slot.lap.as_ref()?;
        let history = slot.history.as_ref()?;

        let prev_lap_number = lap.current_lap_number.checked_sub(1)?;
        if prev_lap_number == 0 {
            return None;
        }
        let prev = history.laps.get(usize::from(prev_lap_number) - 1)?;
        if prev.lap_time_ms == 0 {
            return None;
        }

        let bounds = self.session.sector_distances();
        let sector_times = [
            prev.sector_1_time_ms,
            prev.sector_2_time_ms,
            prev.sector_3_time_ms,
        ];
        let distance = f64::from(lap.lap_distance.max(0.0));

        let mut prev_elapsed_ms = 0.0f64;
        for sector in 0..3 {
            let start = f64::from(bounds[sector]);
            let end = f64::from(bounds[sector + 1]);
            let time = f64::from(sector_times[sector]);
            if distance >= end {
                prev_elapsed_ms += time;
            } else {
                let length = end - start;
                if length > 0.0 {
                    prev_elapsed_ms += time * ((distance - start).max(0.0) / length);
                }
                break;
            }
        }

        Some(i64::from(lap.current_lap_time_ms) - prev_elapsed_ms.round() as i64)
    }
}

/// Shared handle over the race state.
///
/// The aggregator is the only writer; every packet is applied under one
/// write-lock hold so readers never observe a torn car slot.
#[derive(Debug, Default)]
pub struct TelemetryStore {
    inner: RwLock<RaceState>,
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point-in-time copy of the whole race state.
    pub fn snapshot(&self) -> RaceState {
        self.inner.read().clone()
    }

    pub fn packets_applied(&self) -> u64 {
        self.inner.read().packets_applied
    }

    pub fn session_uid(&self) -> u64 {
        self.inner.read().session.session_uid
    }

    /// Fold one decoded packet into the state.
    pub fn apply(&self, decoded: &Decoded) {
        let mut state = self.inner.write();
        let uid = decoded.header.session_uid;
        if state.session.session_uid != 0 && state.session.session_uid != uid {
            info!(
                old_uid = state.session.session_uid,
                new_uid = uid,
                "session change, resetting race state"
            );
            state.reset();
        }
        state.session.session_uid = uid;
        state.player.update_from_header(&decoded.header);
        state.packets_applied += 1;

        match &decoded.body {
            PacketBody::Motion(packet) => {
                for (slot, data) in state.cars.iter_mut().zip(&packet.cars) {
                    slot.motion = Some(*data);
                }
            }
            PacketBody::Session(packet) => state.session.apply(packet),
            PacketBody::LapData(packet) => {
                for (slot, data) in state.cars.iter_mut().zip(&packet.cars) {
                    slot.update_lap(*data);
                }
            }
            PacketBody::Event(packet) => {
                state.last_event = Some(*packet);
                match packet.payload {
                    EventPayload::SessionStarted => {
                        info!(uid, "session started, resetting race state");
                        state.reset();
                        state.session.session_uid = uid;
                        state.player.update_from_header(&decoded.header);
                    }
                    EventPayload::FastestLap {
                        car_index,
                        lap_time_sec,
                    } => {
                        state.session.fastest_lap = Some(FastestLap {
                            car_index,
                            lap_time_sec,
                        });
                    }
                    EventPayload::Unrecognised { code } => {
                        debug!(?code, "unrecognised event code");
                    }
                    _ => {}
                }
            }
            PacketBody::Participants(packet) => {
                state.player.update_from_participants(packet);
                for (slot, data) in state.cars.iter_mut().zip(&packet.participants) {
                    slot.participant = Some(data.clone());
                }
            }
            PacketBody::CarSetups(packet) => {
                for (slot, data) in state.cars.iter_mut().zip(&packet.cars) {
                    slot.setup = Some(*data);
                }
            }
            PacketBody::CarTelemetry(packet) => {
                for (slot, data) in state.cars.iter_mut().zip(&packet.cars) {
                    slot.telemetry = Some(*data);
                }
            }
            PacketBody::CarStatus(packet) => {
                for (slot, data) in state.cars.iter_mut().zip(&packet.cars) {
                    slot.status = Some(*data);
                }
            }
            PacketBody::FinalClassification(packet) => {
                let live = usize::from(packet.num_cars).min(NUM_CARS);
                for (slot, data) in state.cars.iter_mut().zip(&packet.cars).take(live) {
                    slot.classification = Some(data.clone());
                }
            }
            PacketBody::LobbyInfo(packet) => state.lobby = Some(packet.clone()),
            PacketBody::CarDamage(packet) => {
                for (slot, data) in state.cars.iter_mut().zip(&packet.cars) {
                    slot.damage = Some(*data);
                }
            }
            PacketBody::SessionHistory(packet) => {
                if let Some(slot) = state.cars.get_mut(usize::from(packet.car_index)) {
                    slot.history = Some(packet.clone());
                }
            }
            PacketBody::TyreSets(packet) => {
                if let Some(slot) = state.cars.get_mut(usize::from(packet.car_index)) {
                    slot.tyre_sets = Some(packet.clone());
                }
            }
            PacketBody::MotionEx(packet) => state.motion_ex = Some(packet.clone()),
            PacketBody::TimeTrial(packet) => state.time_trial = Some(*packet),
            PacketBody::LapPositions(packet) => {
                let live_laps = usize::from(packet.num_laps).min(packet.positions.len());
                for (car_index, slot) in state.cars.iter_mut().enumerate() {
                    slot.lap_positions = packet.positions[..live_laps]
                        .iter()
                        .enumerate()
                        .filter(|(_, row)| row[car_index] != 0)
                        .map(|(row_index, row)| LapPosition {
                            lap_number: packet.lap_start.wrapping_add(row_index as u8),
                            position: row[car_index],
                        })
                        .collect();
                }
            }
            PacketBody::Unhandled { packet_id } => {
                debug!(packet_id, "unhandled packet id, header applied only");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pitwall_protocol::builders::{
        build_event_packet, build_header_bytes_with_uid, build_lap_data_packet,
        build_session_packet,
    };
    use pitwall_protocol::decode_packet;

    fn with_uid(mut raw: Vec<u8>, uid: u64) -> Vec<u8> {
        raw[7..15].copy_from_slice(&uid.to_le_bytes());
        raw
    }

    #[test]
    fn uid_change_resets_car_slots() {
        let store = TelemetryStore::new();
        let lap = with_uid(build_lap_data_packet(0, 1, 5, 90_000), 10);
        store.apply(&decode_packet(&lap).unwrap());
        assert!(store.snapshot().cars[0].lap.is_some());

        let session = with_uid(build_session_packet(2, 56, 5441, 1417.0, 2984.0), 11);
        store.apply(&decode_packet(&session).unwrap());

        let snap = store.snapshot();
        assert_eq!(snap.session.session_uid, 11);
        assert!(snap.cars[0].lap.is_none());
        assert_eq!(snap.session.track_name(), "Shanghai");
    }

    #[test]
    fn session_started_event_resets_but_keeps_the_uid() {
        let store = TelemetryStore::new();
        let lap = build_lap_data_packet(3, 2, 8, 88_000);
        store.apply(&decode_packet(&lap).unwrap());
        let uid_before = store.session_uid();

        let ssta = build_event_packet(b"SSTA", &[]);
        store.apply(&decode_packet(&ssta).unwrap());

        let snap = store.snapshot();
        assert_eq!(snap.session.session_uid, uid_before);
        assert!(snap.cars[3].lap.is_none());
        assert!(matches!(
            snap.last_event.map(|e| e.payload),
            Some(EventPayload::SessionStarted)
        ));
    }

    #[test]
    fn fastest_lap_event_lands_in_session_state() {
        let store = TelemetryStore::new();
        let mut payload = vec![14u8];
        payload.extend_from_slice(&88.417f32.to_le_bytes());
        let ftlp = build_event_packet(b"FTLP", &payload);
        store.apply(&decode_packet(&ftlp).unwrap());

        let fastest = store.snapshot().session.fastest_lap.unwrap();
        assert_eq!(fastest.car_index, 14);
        assert!((fastest.lap_time_sec - 88.417).abs() < f32::EPSILON);
    }

    #[test]
    fn ahead_and_behind_resolve_by_position() {
        use pitwall_protocol::{HEADER_SIZE, LAP_DATA_ENTRY_SIZE};
        let position_offset = |car: usize| HEADER_SIZE + car * LAP_DATA_ENTRY_SIZE + 32;

        let store = TelemetryStore::new();
        // One packet: car 9 runs P1, car 5 P2, car 0 P3.
        let mut raw = build_lap_data_packet(5, 2, 10, 0);
        raw[position_offset(9)] = 1;
        raw[position_offset(0)] = 3;
        store.apply(&decode_packet(&raw).unwrap());

        let snap = store.snapshot();
        assert_eq!(snap.car_ahead(5), Some(9));
        assert_eq!(snap.car_behind(5), Some(0));
        assert_eq!(snap.car_ahead(9), None);
    }

    #[test]
    fn lap_positions_fill_per_car_rows_for_live_laps_only() {
        use pitwall_protocol::builders::build_lap_positions_packet;
        let store = TelemetryStore::new();
        store.apply(&decode_packet(&build_lap_positions_packet(3, 1)).unwrap());

        let snap = store.snapshot();
        let rows = &snap.cars[0].lap_positions;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], LapPosition { lap_number: 1, position: 1 });
        assert_eq!(rows[2], LapPosition { lap_number: 3, position: 1 });
        assert_eq!(snap.cars[1].lap_positions[0].position, 2);
        // Cars absent from the grid have no rows.
        assert!(snap.cars[5].lap_positions.is_empty());
    }

    #[test]
    fn tyre_sets_and_history_land_in_their_cars_slot() {
        use pitwall_protocol::builders::{build_session_history_packet, build_tyre_sets_packet};
        let store = TelemetryStore::new();
        store.apply(&decode_packet(&build_tyre_sets_packet(6, 4)).unwrap());
        store.apply(&decode_packet(&build_session_history_packet(6, 2, 90_500)).unwrap());

        let snap = store.snapshot();
        let slot = &snap.cars[6];
        assert_eq!(slot.tyre_sets.as_ref().map(|t| t.fitted_index), Some(4));
        assert_eq!(
            slot.history.as_ref().map(|h| h.laps[0].lap_time_ms),
            Some(90_500)
        );
        assert!(snap.cars[0].tyre_sets.is_none());
    }

    #[test]
    fn packet_counter_is_cumulative_across_resets() {
        let store = TelemetryStore::new();
        store.apply(&decode_packet(&with_uid(build_lap_data_packet(0, 1, 1, 0), 1)).unwrap());
        store.apply(&decode_packet(&with_uid(build_lap_data_packet(0, 1, 1, 0), 2)).unwrap());
        assert_eq!(store.packets_applied(), 2);
    }

    #[test]
    fn header_only_identifies_the_player() {
        let store = TelemetryStore::new();
        let raw = build_header_bytes_with_uid(2025, 200, 12, 77);
        store.apply(&decode_packet(&raw).unwrap());
        let snap = store.snapshot();
        assert_eq!(snap.player.primary_index, 12);
        assert_eq!(snap.session.session_uid, 77);
    }
}
