//! Fixed-slot ring transport, modelled on a shared-memory layout.
//!
//! Each slot carries a length, a payload area and a ready flag.  The
//! producer fills length and payload, then flips ready with `Release`;
//! the consumer observes ready with `Acquire` before touching the
//! payload, so the flag orders the data.  When the ring is full the
//! producer overwrites the oldest slot: for live telemetry a fresher
//! datagram always beats an unread stale one.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Payload capacity of one slot.
pub const RING_SLOT_PAYLOAD: usize = 65_535;

struct SlotPayload {
    len: usize,
    bytes: Vec<u8>,
}

struct Slot {
    ready: AtomicBool,
    payload: Mutex<SlotPayload>,
}

impl Slot {
    fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
            payload: Mutex::new(SlotPayload {
                len: 0,
                bytes: vec![0u8; RING_SLOT_PAYLOAD],
            }),
        }
    }
}

/// A ring of datagram slots; split into exactly one producer and one
/// consumer.
pub struct SlotRing {
    slots: Arc<Vec<Slot>>,
}

impl SlotRing {
    /// A ring with `num_slots` slots (at least 1).
    pub fn with_slots(num_slots: usize) -> Self {
        let slots = (0..num_slots.max(1)).map(|_| Slot::new()).collect();
        Self {
            slots: Arc::new(slots),
        }
    }

    pub fn split(self) -> (RingProducer, RingConsumer) {
        (
            RingProducer {
                slots: Arc::clone(&self.slots),
                head: 0,
            },
            RingConsumer {
                slots: self.slots,
                tail: 0,
            },
        )
    }
}

/// Writing end of a [`SlotRing`].
pub struct RingProducer {
    slots: Arc<Vec<Slot>>,
    head: usize,
}

impl RingProducer {
    /// Write one datagram into the next slot, overwriting the oldest
    /// unread slot when the ring has wrapped.  Datagrams longer than the
    /// slot payload are truncated; UDP cannot deliver one that long.
    pub fn push(&mut self, data: &[u8]) {
        let slot = &self.slots[self.head % self.slots.len()];
        let len = data.len().min(RING_SLOT_PAYLOAD);
        {
            let mut payload = slot.payload.lock();
            payload.len = len;
            payload.bytes[..len].copy_from_slice(&data[..len]);
        }
        slot.ready.store(true, Ordering::Release);
        self.head += 1;
    }
}

/// Reading end of a [`SlotRing`].
pub struct RingConsumer {
    slots: Arc<Vec<Slot>>,
    tail: usize,
}

impl RingConsumer {
    /// Take the datagram at the read position, if one is ready.
    pub fn pop(&mut self) -> Option<Vec<u8>> {
        let slot = &self.slots[self.tail % self.slots.len()];
        if !slot.ready.load(Ordering::Acquire) {
            return None;
        }
        let data = {
            let payload = slot.payload.lock();
            payload.bytes[..payload.len].to_vec()
        };
        slot.ready.store(false, Ordering::Release);
        self.tail += 1;
        Some(data)
    }

    /// [`pop`](Self::pop) with a bounded spin-then-sleep wait.
    pub fn pop_timeout(&mut self, timeout: Duration) -> Option<Vec<u8>> {
        let deadline = Instant::now() + timeout;
        let mut spins = 0u32;
        loop {
            if let Some(data) = self.pop() {
                return Some(data);
            }
            if Instant::now() >= deadline {
                return None;
            }
            if spins < 64 {
                spins += 1;
                std::hint::spin_loop();
            } else {
                std::thread::sleep(Duration::from_micros(100));
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn datagrams_come_out_in_push_order() {
        let (mut producer, mut consumer) = SlotRing::with_slots(4).split();
        producer.push(&[1]);
        producer.push(&[2, 2]);
        producer.push(&[3, 3, 3]);
        assert_eq!(consumer.pop(), Some(vec![1]));
        assert_eq!(consumer.pop(), Some(vec![2, 2]));
        assert_eq!(consumer.pop(), Some(vec![3, 3, 3]));
        assert_eq!(consumer.pop(), None);
    }

    #[test]
    fn wrap_overwrites_the_oldest_slot() {
        let (mut producer, mut consumer) = SlotRing::with_slots(2).split();
        producer.push(&[1]);
        producer.push(&[2]);
        producer.push(&[3]); // lands on the slot holding [1]
        assert_eq!(consumer.pop(), Some(vec![3]));
        assert_eq!(consumer.pop(), Some(vec![2]));
        assert_eq!(consumer.pop(), None);
    }

    #[test]
    fn handoff_across_threads() {
        let (mut producer, mut consumer) = SlotRing::with_slots(64).split();
        let writer = std::thread::spawn(move || {
            for i in 0..1_000u32 {
                producer.push(&i.to_le_bytes());
            }
        });
        let mut seen = 0u32;
        let mut last = None;
        while let Some(data) = consumer.pop_timeout(Duration::from_secs(2)) {
            // Ready-flag ordering: the payload read after Acquire is
            // always a complete write, never torn bytes.
            let value = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
            assert!(value < 1_000, "value {value} was never pushed");
            last = Some(value);
            seen += 1;
            if value == 999 {
                break;
            }
        }
        writer.join().expect("writer thread");
        assert!(seen > 0);
        // The final datagram is never lost to an overwrite.
        assert_eq!(last, Some(999));
    }

    #[test]
    fn oversized_payload_is_truncated_not_panicking() {
        let (mut producer, mut consumer) = SlotRing::with_slots(1).split();
        let big = vec![0xAB; RING_SLOT_PAYLOAD + 100];
        producer.push(&big);
        let out = consumer.pop().expect("slot ready");
        assert_eq!(out.len(), RING_SLOT_PAYLOAD);
    }
}
