//! Concurrent receive/decode/aggregate pipeline.
//!
//! Three stages connected by bounded queues:
//!
//! ```text
//! UdpSocket -> receiver -> [raw queue] -> decode workers -> [decoded queue] -> aggregator -> TelemetryStore
//! ```
//!
//! Both queues drop on full: the stream is lossy by nature and a fresh
//! packet always supersedes a stale one.  Every stage polls a shared stop
//! flag with bounded waits, so [`PipelineHandle::shutdown`] joins promptly.

mod aggregator;
mod config;
mod counters;
mod receiver;
mod ring;
mod worker;

pub use config::{DEFAULT_PORT, PipelineConfig};
pub use counters::{CounterSnapshot, PipelineCounters};
pub use ring::{RING_SLOT_PAYLOAD, RingConsumer, RingProducer, SlotRing};

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use anyhow::Context;
use crossbeam::channel;
use parking_lot::Mutex;
use tracing::info;

use pitwall_state::TelemetryStore;

/// A running pipeline.
///
/// Dropping the handle without calling [`shutdown`](Self::shutdown)
/// leaves the threads running for the life of the process.
pub struct PipelineHandle {
    store: Arc<TelemetryStore>,
    counters: Arc<PipelineCounters>,
    stop: Arc<AtomicBool>,
    threads: Vec<JoinHandle<()>>,
    local_addr: SocketAddr,
    receiver_error: Arc<Mutex<Option<io::Error>>>,
}

impl PipelineHandle {
    /// The shared state store the aggregator writes into.
    pub fn store(&self) -> Arc<TelemetryStore> {
        Arc::clone(&self.store)
    }

    pub fn counters(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }

    /// The address the socket actually bound; useful with port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The error that stopped the receiver, if it has died.
    pub fn receiver_error(&self) -> Option<io::Error> {
        self.receiver_error.lock().take()
    }

    /// Signal every stage to stop and join all threads.
    pub fn shutdown(mut self) {
        self.stop.store(true, Ordering::Relaxed);
        for thread in self.threads.drain(..) {
            // A stage that panicked already lost its data; nothing to
            // salvage here beyond finishing the join pass.
            let _: Result<(), _> = thread.join();
        }
    }
}

/// Bind the socket and start receiver, decode workers and aggregator.
///
/// # Errors
///
/// Fails if the socket cannot be bound or configured; everything after
/// startup is handled inside the pipeline instead of surfacing here.
pub fn start(config: PipelineConfig) -> anyhow::Result<PipelineHandle> {
    let socket = UdpSocket::bind((config.bind_addr, config.port))
        .with_context(|| format!("binding udp {}:{}", config.bind_addr, config.port))?;
    socket
        .set_read_timeout(Some(config.receive_timeout))
        .context("setting socket read timeout")?;
    let local_addr = socket.local_addr().context("reading bound address")?;
    info!(%local_addr, workers = config.num_workers, "telemetry pipeline listening");

    let store = Arc::new(TelemetryStore::new());
    let counters = Arc::new(PipelineCounters::default());
    let stop = Arc::new(AtomicBool::new(false));
    let receiver_error = Arc::new(Mutex::new(None));

    let (raw_tx, raw_rx) = channel::bounded::<Vec<u8>>(config.raw_queue_capacity);
    let (decoded_tx, decoded_rx) = channel::bounded(config.decoded_queue_capacity);

    let mut threads = Vec::with_capacity(config.num_workers + 2);

    {
        let stop = Arc::clone(&stop);
        let counters = Arc::clone(&counters);
        let error_slot = Arc::clone(&receiver_error);
        threads.push(
            std::thread::Builder::new()
                .name("pitwall-recv".into())
                .spawn(move || receiver::run_receiver(socket, raw_tx, stop, counters, error_slot))
                .context("spawning receiver thread")?,
        );
    }

    for index in 0..config.num_workers.max(1) {
        let raw_rx = raw_rx.clone();
        let decoded_tx = decoded_tx.clone();
        let stop = Arc::clone(&stop);
        let counters = Arc::clone(&counters);
        let queue_timeout = config.queue_timeout;
        threads.push(
            std::thread::Builder::new()
                .name(format!("pitwall-decode-{index}"))
                .spawn(move || {
                    worker::run_worker(raw_rx, decoded_tx, stop, counters, queue_timeout)
                })
                .context("spawning decode worker")?,
        );
    }
    // The spawned workers hold the only live clones now.
    drop(raw_rx);
    drop(decoded_tx);

    {
        let store = Arc::clone(&store);
        let stop = Arc::clone(&stop);
        let queue_timeout = config.queue_timeout;
        threads.push(
            std::thread::Builder::new()
                .name("pitwall-aggregate".into())
                .spawn(move || aggregator::run_aggregator(decoded_rx, store, stop, queue_timeout))
                .context("spawning aggregator thread")?,
        );
    }

    Ok(PipelineHandle {
        store,
        counters,
        stop,
        threads,
        local_addr,
        receiver_error,
    })
}
