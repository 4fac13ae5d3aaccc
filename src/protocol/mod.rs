//! # Niimbot Protocol Implementation
//!
//! This module provides the wire format and reply decoders for the binary
//! protocol spoken by Niimbot label printers over Bluetooth serial.
//!
//! ## Module Structure
//!
//! - [`packet`]: Frame encode/decode and checksum
//! - [`frame`]: Reassembly of packets from a byte stream
//! - [`command`]: Request/response type codes per operation
//! - [`info`]: `get_info` keys and value decoding
//! - [`rfid`]: Label roll RFID record
//! - [`heartbeat`]: Length-keyed heartbeat layouts
//! - [`status`]: Print progress record
//!
//! ## Usage Example
//!
//! ```
//! use niimprint::protocol::{FrameBuffer, Packet};
//!
//! let mut bytes = Packet::encode(0x02, &[0x01])?;
//! bytes.extend(Packet::encode(0x04, &[0x01])?);
//!
//! // Feed the stream in two arbitrary pieces
//! let mut frames = FrameBuffer::new();
//! frames.feed(&bytes[..5]);
//! assert!(frames.drain().is_empty());
//! frames.feed(&bytes[5..]);
//!
//! let types: Vec<u8> = frames.drain().iter().map(|p| p.packet_type()).collect();
//! assert_eq!(types, vec![0x02, 0x04]);
//! # Ok::<(), niimprint::NiimprintError>(())
//! ```
//!
//! ## Protocol Reference
//!
//! The protocol is undocumented; codes and layouts here come from observed
//! traffic between the vendor app and D11/B21-class printers.

pub mod command;
pub mod frame;
pub mod heartbeat;
pub mod info;
pub mod packet;
pub mod rfid;
pub mod status;

pub use command::Command;
pub use frame::FrameBuffer;
pub use heartbeat::Heartbeat;
pub use info::{InfoKey, InfoValue};
pub use packet::Packet;
pub use rfid::RfidRecord;
pub use status::PrintStatus;
