//! Decode worker: raw buffers in, typed packets out.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam::channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use tracing::{debug, warn};

use pitwall_protocol::{DecodeError, Decoded, decode_packet};

use crate::counters::PipelineCounters;

/// Decode loop run by each worker thread.
///
/// Malformed datagrams are counted and dropped; they must never take the
/// pipeline down, because the socket is open to anything on the network.
pub(crate) fn run_worker(
    raw_rx: Receiver<Vec<u8>>,
    decoded_tx: Sender<Decoded>,
    stop: Arc<AtomicBool>,
    counters: Arc<PipelineCounters>,
    queue_timeout: Duration,
) {
    while !stop.load(Ordering::Relaxed) {
        let raw = match raw_rx.recv_timeout(queue_timeout) {
            Ok(raw) => raw,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => return,
        };
        match decode_packet(&raw) {
            Ok(decoded) => match decoded_tx.try_send(decoded) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    counters.record_decoded_dropped();
                    debug!("decoded queue full, packet dropped");
                }
                Err(TrySendError::Disconnected(_)) => return,
            },
            Err(e @ DecodeError::UnsupportedFormat { .. }) => {
                counters.record_decode_error();
                warn!(error = %e, "datagram from a different game version");
            }
            Err(e) => {
                counters.record_decode_error();
                debug!(error = %e, len = raw.len(), "undecodable datagram dropped");
            }
        }
    }
}
