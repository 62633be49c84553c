//! Lock-free pipeline statistics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by every pipeline stage.  Relaxed ordering: these are
/// statistics, not synchronisation.
#[derive(Debug, Default)]
pub struct PipelineCounters {
    datagrams_received: AtomicU64,
    raw_dropped: AtomicU64,
    decode_errors: AtomicU64,
    decoded_dropped: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterSnapshot {
    pub datagrams_received: u64,
    pub raw_dropped: u64,
    pub decode_errors: u64,
    pub decoded_dropped: u64,
}

impl PipelineCounters {
    pub fn record_received(&self) {
        self.datagrams_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_raw_dropped(&self) {
        self.raw_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_decoded_dropped(&self) {
        self.decoded_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            datagrams_received: self.datagrams_received.load(Ordering::Relaxed),
            raw_dropped: self.raw_dropped.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            decoded_dropped: self.decoded_dropped.load(Ordering::Relaxed),
        }
    }
}
