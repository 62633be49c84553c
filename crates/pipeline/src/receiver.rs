//! Socket receive loop: datagrams in, raw buffers out.

use std::io;
use std::net::UdpSocket;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam::channel::{Sender, TrySendError};
use parking_lot::Mutex;
use tracing::{debug, warn};

use pitwall_protocol::MAX_UDP_PAYLOAD;

use crate::counters::PipelineCounters;

/// Blocking receive loop.  Returns when the stop flag is set or the
/// socket fails; the failure is parked in `error_slot` for the handle.
pub(crate) fn run_receiver(
    socket: UdpSocket,
    raw_tx: Sender<Vec<u8>>,
    stop: Arc<AtomicBool>,
    counters: Arc<PipelineCounters>,
    error_slot: Arc<Mutex<Option<io::Error>>>,
) {
    let mut buf = vec![0u8; MAX_UDP_PAYLOAD];
    while !stop.load(Ordering::Relaxed) {
        match socket.recv_from(&mut buf) {
            Ok((len, _peer)) => {
                counters.record_received();
                match raw_tx.try_send(buf[..len].to_vec()) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        // Live telemetry: newer data supersedes dropped data.
                        counters.record_raw_dropped();
                        debug!(len, "raw queue full, datagram dropped");
                    }
                    Err(TrySendError::Disconnected(_)) => return,
                }
            }
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                // Read timeout: loop around and re-check the stop flag.
            }
            Err(e) => {
                warn!(error = %e, "socket receive failed, receiver stopping");
                *error_slot.lock() = Some(e);
                return;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use crossbeam::channel;

    #[test]
    fn full_queue_drops_the_datagram_without_blocking() {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket
            .set_read_timeout(Some(Duration::from_millis(20)))
            .unwrap();
        let addr = socket.local_addr().unwrap();

        // Capacity 1 and nobody draining: the second datagram must be
        // dropped, not block the receive loop.
        let (raw_tx, raw_rx) = channel::bounded::<Vec<u8>>(1);
        let stop = Arc::new(AtomicBool::new(false));
        let counters = Arc::new(PipelineCounters::default());
        let error_slot = Arc::new(Mutex::new(None));

        let receiver = {
            let stop = Arc::clone(&stop);
            let counters = Arc::clone(&counters);
            let error_slot = Arc::clone(&error_slot);
            std::thread::spawn(move || run_receiver(socket, raw_tx, stop, counters, error_slot))
        };

        let client = UdpSocket::bind("127.0.0.1:0").unwrap();
        client.send_to(&[0x11; 64], addr).unwrap();
        client.send_to(&[0x22; 64], addr).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline && counters.snapshot().datagrams_received < 2 {
            std::thread::sleep(Duration::from_millis(10));
        }

        stop.store(true, Ordering::Relaxed);
        receiver.join().unwrap();

        let snap = counters.snapshot();
        assert_eq!(snap.datagrams_received, 2);
        assert_eq!(snap.raw_dropped, 1);
        assert_eq!(raw_rx.len(), 1);
        assert_eq!(raw_rx.recv().unwrap(), vec![0x11; 64]);
        assert!(error_slot.lock().is_none());
    }
}
