//! Decode error taxonomy.
//!
//! Only conditions that make a packet unusable are errors.  An unknown
//! packet id or event code is a recognised *skip* outcome and is modelled
//! as a value ([`crate::PacketBody::Unhandled`],
//! [`crate::EventPayload::Unrecognised`]), never as an error.

/// Errors produced while decoding a raw datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Buffer is smaller than the decoder's required minimum.
    #[error("packet too short: {len} bytes (need {needed})")]
    TooShort {
        /// Minimum number of bytes the decoder requires.
        needed: usize,
        /// Number of bytes actually received.
        len: usize,
    },

    /// The packet_format in the header is not one this decoder understands.
    ///
    /// Field offsets shift between protocol versions, so misparsing a
    /// foreign format silently would be worse than rejecting it.
    #[error("unsupported packet format {format} (expected {expected})")]
    UnsupportedFormat {
        /// The packet_format value received on the wire.
        format: u16,
        /// The packet_format this decoder was built for.
        expected: u16,
    },

    /// An array decode would have read past the end of the buffer.
    ///
    /// Packet lengths are validated up front, so hitting this means a
    /// stride/count constant is out of step with a length constant.  The
    /// read is refused rather than performed out of bounds.
    #[error("array bounds violated at byte offset {offset}")]
    ArrayBounds {
        /// Byte offset of the refused read.
        offset: usize,
    },
}
