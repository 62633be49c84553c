//! Aggregator: the single writer behind the telemetry store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam::channel::{Receiver, RecvTimeoutError};

use pitwall_protocol::Decoded;
use pitwall_state::TelemetryStore;

pub(crate) fn run_aggregator(
    decoded_rx: Receiver<Decoded>,
    store: Arc<TelemetryStore>,
    stop: Arc<AtomicBool>,
    queue_timeout: Duration,
) {
    while !stop.load(Ordering::Relaxed) {
        match decoded_rx.recv_timeout(queue_timeout) {
            Ok(decoded) => store.apply(&decoded),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}
