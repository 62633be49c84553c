//! Aggregate race state built from decoded telemetry packets.
//!
//! The store keeps the latest value of every packet section: session
//! state, 22 per-car slots, player resolution and a handful of
//! session-global packets.  One writer (the pipeline aggregator) folds
//! packets in through [`TelemetryStore::apply`]; readers take cheap
//! point-in-time clones through [`TelemetryStore::snapshot`].
//!
//! State survives packet loss (sections simply stay at their previous
//! value) and resets at session boundaries, detected either by a
//! `session_uid` change or a session-started event.

mod car;
mod player;
mod session;
mod store;
mod tracks;

pub use car::{CarSlot, LapPosition};
pub use player::{PlayerContext, UNRESOLVED_INDEX};
pub use session::{FastestLap, SessionState, UNKNOWN_TRACK};
pub use store::{RaceState, TelemetryStore};
pub use tracks::track_name_from_id;
