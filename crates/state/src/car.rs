//! Per-car state slot.

use pitwall_protocol::{
    CarDamageData, CarMotionData, CarSetupData, CarStatusData, CarTelemetryData,
    ClassificationData, LapData, ParticipantData, SessionHistoryPacket, TyreSetsPacket,
};

/// Position of one car at the start of one lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LapPosition {
    pub lap_number: u8,
    pub position: u8,
}

/// State of one grid slot, built up section by section as packets arrive.
///
/// Each section stays `None` until its packet type has been seen; slots
/// are never destroyed, only reset at session boundaries.
#[derive(Debug, Clone, Default)]
pub struct CarSlot {
    pub motion: Option<CarMotionData>,
    pub lap: Option<LapData>,
    /// The lap section as it was before the latest Lap Data packet.
    /// Retained per packet type, not per tick.
    pub prev_lap: Option<LapData>,
    pub status: Option<CarStatusData>,
    pub telemetry: Option<CarTelemetryData>,
    pub damage: Option<CarDamageData>,
    pub participant: Option<ParticipantData>,
    pub setup: Option<CarSetupData>,
    pub classification: Option<ClassificationData>,
    pub history: Option<SessionHistoryPacket>,
    pub tyre_sets: Option<TyreSetsPacket>,
    /// Live rows from the Lap Positions packet, oldest first.
    pub lap_positions: Vec<LapPosition>,
}

impl CarSlot {
    /// Shift the current lap section into `prev_lap` and install `lap`.
    pub fn update_lap(&mut self, lap: LapData) {
        self.prev_lap = self.lap.take();
        self.lap = Some(lap);
    }

    /// Driver name if a Participants packet has named this slot.
    pub fn driver_name(&self) -> Option<&str> {
        self.participant
            .as_ref()
            .map(|p| p.name.as_str())
            .filter(|name| !name.is_empty())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
