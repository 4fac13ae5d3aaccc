//! # Packet Framing
//!
//! Every message to and from the printer is a single length-prefixed,
//! checksummed frame.
//!
//! ## Wire Format
//!
//! ```text
//! ┌───────┬──────┬─────┬──────────────┬──────────┬───────┐
//! │ 55 55 │ type │ len │ data (len B) │ checksum │ AA AA │
//! └───────┴──────┴─────┴──────────────┴──────────┴───────┘
//!
//! checksum = type ^ len ^ data[0] ^ ... ^ data[len-1]
//! total frame size = len + 7
//! ```
//!
//! ## Checksum Verification
//!
//! [`Packet::decode`] does not verify the checksum. Some firmware emits
//! frames with a nonstandard checksum byte and those replies are still
//! usable, so the receive path stays permissive. Callers that want to reject
//! corrupted frames use [`Packet::decode_strict`].
//!
//! ## Example
//!
//! ```
//! use niimprint::protocol::Packet;
//!
//! let bytes = Packet::encode(0x23, &[0x02])?;
//! assert_eq!(bytes, vec![0x55, 0x55, 0x23, 0x01, 0x02, 0x20, 0xAA, 0xAA]);
//!
//! let packet = Packet::decode(&bytes)?;
//! assert_eq!(packet.packet_type(), 0x23);
//! assert_eq!(packet.data(), &[0x02]);
//! # Ok::<(), niimprint::NiimprintError>(())
//! ```

use std::fmt;

use crate::error::{NiimprintError, Result};

/// Start-of-frame marker
pub const START_MARKER: [u8; 2] = [0x55, 0x55];

/// End-of-frame marker
pub const END_MARKER: [u8; 2] = [0xAA, 0xAA];

/// Bytes in a frame that are not payload: markers, type, length, checksum.
pub const FRAME_OVERHEAD: usize = 7;

/// Largest payload a single frame can carry.
pub const MAX_DATA_LEN: usize = u8::MAX as usize;

/// A single protocol packet.
///
/// The length field is not stored; it is always `data.len()`, which
/// construction guarantees fits in one byte.
#[derive(Clone, PartialEq, Eq)]
pub struct Packet {
    packet_type: u8,
    data: Vec<u8>,
}

impl Packet {
    /// Build a packet, rejecting payloads longer than 255 bytes.
    pub fn new(packet_type: u8, data: impl Into<Vec<u8>>) -> Result<Self> {
        let data = data.into();
        if data.len() > MAX_DATA_LEN {
            return Err(NiimprintError::PayloadTooLarge { len: data.len() });
        }
        Ok(Self { packet_type, data })
    }

    /// Build a packet whose payload is already known to fit.
    pub(crate) fn from_parts(packet_type: u8, data: Vec<u8>) -> Self {
        debug_assert!(
            data.len() <= MAX_DATA_LEN,
            "Packet payload must be at most {} bytes, got {}",
            MAX_DATA_LEN,
            data.len()
        );
        Self { packet_type, data }
    }

    /// Packet type code.
    pub fn packet_type(&self) -> u8 {
        self.packet_type
    }

    /// Payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Value of the length byte on the wire.
    pub fn len_byte(&self) -> u8 {
        // constructors bound data.len() to 255
        self.data.len() as u8
    }

    /// XOR-fold of type, length and payload.
    pub fn checksum(&self) -> u8 {
        checksum(self.packet_type, self.len_byte(), &self.data)
    }

    /// Serialize to the exact wire frame.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut frame = Vec::with_capacity(self.data.len() + FRAME_OVERHEAD);
        frame.extend_from_slice(&START_MARKER);
        frame.push(self.packet_type);
        frame.push(self.len_byte());
        frame.extend_from_slice(&self.data);
        frame.push(self.checksum());
        frame.extend_from_slice(&END_MARKER);
        frame
    }

    /// Encode `data` as a frame of type `packet_type`.
    pub fn encode(packet_type: u8, data: &[u8]) -> Result<Vec<u8>> {
        Ok(Self::new(packet_type, data)?.to_bytes())
    }

    /// Decode a frame from the start of `bytes`.
    ///
    /// `bytes` must begin with the start marker and hold at least the whole
    /// frame announced by its length byte. Trailing bytes are ignored. The
    /// checksum is not checked.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < FRAME_OVERHEAD {
            return Err(NiimprintError::Frame(format!(
                "frame too short: {} bytes",
                bytes.len()
            )));
        }
        if bytes[..2] != START_MARKER {
            return Err(NiimprintError::Frame(format!(
                "bad start marker {:02X} {:02X}",
                bytes[0], bytes[1]
            )));
        }

        let len = bytes[3] as usize;
        let frame_len = len + FRAME_OVERHEAD;
        if bytes.len() < frame_len {
            return Err(NiimprintError::Frame(format!(
                "truncated frame: length byte says {} bytes, have {}",
                frame_len,
                bytes.len()
            )));
        }

        Ok(Self {
            packet_type: bytes[2],
            data: bytes[4..4 + len].to_vec(),
        })
    }

    /// Decode a frame and reject it unless the checksum and end marker match.
    pub fn decode_strict(bytes: &[u8]) -> Result<Self> {
        let packet = Self::decode(bytes)?;
        let end = 4 + packet.data.len();
        let received = bytes[end];
        if received != packet.checksum() {
            return Err(NiimprintError::Frame(format!(
                "checksum mismatch: expected {:02X}, got {:02X}",
                packet.checksum(),
                received
            )));
        }
        if bytes[end + 1..end + 3] != END_MARKER {
            return Err(NiimprintError::Frame("bad end marker".to_string()));
        }
        Ok(packet)
    }

    /// Whether `bytes` holds a complete frame whose checksum byte matches.
    pub fn checksum_ok(bytes: &[u8]) -> bool {
        Self::decode(bytes)
            .map(|packet| bytes[4 + packet.data.len()] == packet.checksum())
            .unwrap_or(false)
    }

    /// First payload byte as a success flag.
    pub fn flag(&self) -> Option<bool> {
        self.data.first().map(|&b| b != 0)
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Packet(type=0x{:02X}, data=", self.packet_type)?;
        for b in &self.data {
            write!(f, "{:02x}", b)?;
        }
        f.write_str(")")
    }
}

/// XOR-fold of type, length and every payload byte.
pub fn checksum(packet_type: u8, len: u8, data: &[u8]) -> u8 {
    data.iter().fold(packet_type ^ len, |acc, &b| acc ^ b)
}

// ============================================================================
// TESTS
// ============================================================================
