//! Decoder robustness: arbitrary bytes must never panic, only return.

use proptest::prelude::*;
use pitwall_protocol::builders::build_header_bytes;
use pitwall_protocol::{HEADER_SIZE, MAX_UDP_PAYLOAD, decode_header, decode_packet};

proptest! {
    #[test]
    fn decode_packet_never_panics_on_arbitrary_bytes(
        raw in proptest::collection::vec(any::<u8>(), 0..2048)
    ) {
        let _ = decode_packet(&raw);
    }

    #[test]
    fn decode_header_never_panics_on_arbitrary_bytes(
        raw in proptest::collection::vec(any::<u8>(), 0..64)
    ) {
        let _ = decode_header(&raw);
    }

    // Valid header, arbitrary packet id and body: either a typed packet
    // or a clean error, never a panic and never an out-of-bounds read.
    #[test]
    fn valid_header_with_garbage_body_decodes_or_errors(
        packet_id in any::<u8>(),
        body in proptest::collection::vec(any::<u8>(), 0..1600)
    ) {
        let mut raw = build_header_bytes(2025, packet_id, 0);
        raw.extend_from_slice(&body);
        prop_assert!(raw.len() <= MAX_UDP_PAYLOAD);
        let _ = decode_packet(&raw);
    }

    #[test]
    fn truncated_packets_always_fail_cleanly(
        cut in 0..HEADER_SIZE
    ) {
        let raw = build_header_bytes(2025, 0, 0);
        prop_assert!(decode_header(&raw[..cut]).is_err());
    }
}
