//! # Frame Reassembly
//!
//! RFCOMM delivers a byte stream, not messages. A reply can arrive split
//! across several reads, and one read can carry several replies.
//! [`FrameBuffer`] accumulates raw bytes and hands back complete packets.
//!
//! ## Algorithm
//!
//! ```text
//! while buffer.len() > 4:
//!     frame_len = buffer[3] + 7
//!     if buffer.len() < frame_len: wait for more bytes
//!     emit decode(buffer[..frame_len]); drop those bytes
//! ```
//!
//! ## Resynchronisation
//!
//! The length byte is only meaningful when the buffer starts on a frame
//! boundary. If the buffer does not begin with `55 55` (line noise, a
//! half-received frame from before we connected), bytes are discarded up to
//! the next start marker. A well-formed stream never triggers this.

use tracing::{trace, warn};

use super::packet::{FRAME_OVERHEAD, Packet, START_MARKER};

/// Append-only byte accumulator that yields complete packets.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    buf: Vec<u8>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk read from the transport.
    pub fn feed(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Number of bytes waiting for the rest of their frame.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Discard everything buffered.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Extract every complete packet currently buffered, in arrival order.
    ///
    /// Never blocks. Incomplete trailing bytes stay buffered for the next
    /// call.
    pub fn drain(&mut self) -> Vec<Packet> {
        let mut packets = Vec::new();

        while self.buf.len() > 4 {
            if !self.resync() {
                break;
            }
            if self.buf.len() <= 4 {
                break;
            }

            let frame_len = self.buf[3] as usize + FRAME_OVERHEAD;
            if self.buf.len() < frame_len {
                break;
            }

            match Packet::decode(&self.buf[..frame_len]) {
                Ok(packet) => {
                    trace!(?packet, "frame reassembled");
                    packets.push(packet);
                }
                // resync() guarantees the marker and the length check above
                // guarantees the size, so this is unreachable in practice
                Err(e) => warn!("dropping undecodable frame: {}", e),
            }
            self.buf.drain(..frame_len);
        }

        packets
    }

    /// Align the buffer on a start marker.
    ///
    /// Returns `false` when no marker candidate remains.
    fn resync(&mut self) -> bool {
        if self.buf.starts_with(&START_MARKER) {
            return true;
        }

        let skip = self
            .buf
            .windows(2)
            .position(|w| w == START_MARKER)
            .unwrap_or_else(|| {
                // Keep a trailing 0x55, it may be the first half of a marker
                if self.buf.last() == Some(&START_MARKER[0]) {
                    self.buf.len() - 1
                } else {
                    self.buf.len()
                }
            });

        warn!(skipped = skip, "discarding bytes before frame start marker");
        self.buf.drain(..skip);
        self.buf.starts_with(&START_MARKER)
    }
}

// ============================================================================
// TESTS
// ============================================================================
