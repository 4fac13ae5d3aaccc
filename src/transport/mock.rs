//! # Mock Transport
//!
//! An in-memory [`Transport`] for exercising the client without hardware.
//!
//! Inbound bytes come from two sources: chunks queued up front with
//! [`MockTransport::push_inbound`], and replies produced by an optional
//! responder closure that sees every packet the client sends. Each queued
//! chunk is returned by one `recv` call, so tests control exactly how the
//! stream is fragmented.
//!
//! ```
//! use niimprint::client::PrinterClient;
//! use niimprint::protocol::Packet;
//! use niimprint::transport::MockTransport;
//!
//! let mock = MockTransport::with_responder(|req: &Packet| {
//!     vec![Packet::new(req.packet_type() + 16, vec![0x01]).unwrap()]
//! });
//! let mut client = PrinterClient::new(mock);
//! assert!(client.set_label_type(2)?);
//! # Ok::<(), niimprint::NiimprintError>(())
//! ```

use std::collections::VecDeque;

use super::Transport;
use crate::error::{NiimprintError, Result};
use crate::protocol::{FrameBuffer, Packet};

type Responder = Box<dyn FnMut(&Packet) -> Vec<Packet> + Send>;

/// Scripted transport recording everything sent to it.
#[derive(Default)]
pub struct MockTransport {
    inbound: VecDeque<Vec<u8>>,
    sent: Vec<u8>,
    sent_frames: FrameBuffer,
    sent_packets: Vec<Packet>,
    responder: Option<Responder>,
    closed: bool,
    recv_calls: usize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mock that answers each sent packet with the packets `f`
    /// returns, queued as a single inbound chunk.
    pub fn with_responder<F>(f: F) -> Self
    where
        F: FnMut(&Packet) -> Vec<Packet> + Send + 'static,
    {
        Self {
            responder: Some(Box::new(f)),
            ..Self::default()
        }
    }

    /// Queue a raw chunk to be returned by a future `recv`.
    pub fn push_inbound(&mut self, chunk: impl Into<Vec<u8>>) {
        self.inbound.push_back(chunk.into());
    }

    /// Queue a packet's wire frame as one chunk.
    pub fn push_packet(&mut self, packet: &Packet) {
        self.push_inbound(packet.to_bytes());
    }

    /// After queued data runs out, report the connection as closed.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Every byte written so far.
    pub fn sent_bytes(&self) -> &[u8] {
        &self.sent
    }

    /// Every complete packet written so far, in order.
    pub fn sent_packets(&self) -> &[Packet] {
        &self.sent_packets
    }

    /// Number of `recv` calls made.
    pub fn recv_calls(&self) -> usize {
        self.recv_calls
    }

    /// Chunks still waiting to be received.
    pub fn inbound_len(&self) -> usize {
        self.inbound.len()
    }
}

impl Transport for MockTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.sent.extend_from_slice(data);
        self.sent_frames.feed(data);

        for packet in self.sent_frames.drain() {
            if let Some(responder) = self.responder.as_mut() {
                let replies = responder(&packet);
                if !replies.is_empty() {
                    let chunk: Vec<u8> = replies.iter().flat_map(Packet::to_bytes).collect();
                    self.inbound.push_back(chunk);
                }
            }
            self.sent_packets.push(packet);
        }
        Ok(())
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.recv_calls += 1;

        let Some(mut chunk) = self.inbound.pop_front() else {
            if self.closed {
                return Err(NiimprintError::Transport("connection closed".to_string()));
            }
            return Ok(0);
        };

        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            self.inbound.push_front(chunk.split_off(n));
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recv_returns_queued_chunks_in_order() {
        let mut mock = MockTransport::new();
        mock.push_inbound(vec![1, 2, 3]);
        mock.push_inbound(vec![4]);

        let mut buf = [0u8; 16];
        assert_eq!(mock.recv(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], &[1, 2, 3]);
        assert_eq!(mock.recv(&mut buf).unwrap(), 1);
        assert_eq!(mock.recv(&mut buf).unwrap(), 0);
        assert_eq!(mock.recv_calls(), 3);
    }

    #[test]
    fn test_recv_splits_oversized_chunk() {
        let mut mock = MockTransport::new();
        mock.push_inbound(vec![1, 2, 3, 4, 5]);

        let mut buf = [0u8; 2];
        assert_eq!(mock.recv(&mut buf).unwrap(), 2);
        assert_eq!(mock.inbound_len(), 1);
        assert_eq!(mock.recv(&mut buf).unwrap(), 2);
        assert_eq!(mock.recv(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], 5);
    }

    #[test]
    fn test_closed_after_drain() {
        let mut mock = MockTransport::new();
        mock.push_inbound(vec![9]);
        mock.close();

        let mut buf = [0u8; 4];
        assert_eq!(mock.recv(&mut buf).unwrap(), 1);
        assert!(matches!(mock.recv(&mut buf), Err(NiimprintError::Transport(_))));
    }

    #[test]
    fn test_responder_sees_each_packet() {
        let mut mock = MockTransport::with_responder(|p: &Packet| {
            vec![Packet::new(p.packet_type() + 1, vec![0x01]).unwrap()]
        });
        let mut bytes = Packet::encode(0x01, &[0x01]).unwrap();
        bytes.extend(Packet::encode(0x03, &[0x01]).unwrap());
        mock.send(&bytes).unwrap();

        assert_eq!(mock.sent_packets().len(), 2);
        assert_eq!(mock.inbound_len(), 2);
    }
}
