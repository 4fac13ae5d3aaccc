//! # Transceiver
//!
//! One exchange = send a request once, then poll for its reply:
//!
//! ```text
//! send(request)
//! repeat up to `attempts` times:
//!     read what is available, reassemble packets
//!     NAK (0xDB)          → Err(Rejected), no retry
//!     UNSUPPORTED (0x00)  → Err(Unsupported), no retry
//!     type == expected    → remember it (last match in the batch wins)
//!     matched?            → return it
//!     sleep(retry_interval)
//! → Ok(None)
//! ```
//!
//! A missing reply is `Ok(None)`, not an error: whether silence is fatal is
//! up to the operation. Packets that match nothing are logged and dropped.

use std::thread;

use tracing::{debug, trace};

use super::PrinterClient;
use crate::error::{NiimprintError, Result};
use crate::protocol::Packet;
use crate::protocol::command::{Command, NAK, UNSUPPORTED};
use crate::transport::Transport;

impl<T: Transport> PrinterClient<T> {
    /// Write one packet without waiting for a reply.
    pub fn send(&mut self, packet: &Packet) -> Result<()> {
        debug!(?packet, "send");
        self.transport.send(&packet.to_bytes())
    }

    /// Send `data` as a `command` request and wait for its reply.
    pub fn transceive(&mut self, command: Command, data: &[u8]) -> Result<Option<Packet>> {
        let Some(expected) = command.response_code() else {
            return Err(NiimprintError::Precondition(format!(
                "{} has no reply to wait for",
                command
            )));
        };

        let request = Packet::new(command.request_code(), data)?;
        self.send(&request)?;

        let attempts = self.config.attempts;
        for attempt in 1..=attempts {
            if attempt > 1 {
                self.cancel.check()?;
            }

            let mut matched = None;
            for packet in self.receive()? {
                match packet.packet_type() {
                    NAK => {
                        debug!(%command, ?packet, "rejected");
                        return Err(NiimprintError::Rejected { command });
                    }
                    UNSUPPORTED => {
                        debug!(%command, ?packet, "unsupported");
                        return Err(NiimprintError::Unsupported { command });
                    }
                    t if t == expected => matched = Some(packet),
                    _ => trace!(%command, ?packet, "ignoring uncorrelated packet"),
                }
            }

            if let Some(packet) = matched {
                debug!(%command, attempt, ?packet, "recv");
                return Ok(Some(packet));
            }

            if attempt < attempts && !self.config.retry_interval.is_zero() {
                thread::sleep(self.config.retry_interval);
            }
        }

        debug!(%command, attempts, "no reply");
        Ok(None)
    }

    /// Pull every byte the transport has ready and return the complete
    /// packets.
    fn receive(&mut self) -> Result<Vec<Packet>> {
        let mut buf = vec![0u8; self.config.read_chunk.max(1)];
        loop {
            let n = self.transport.recv(&mut buf)?;
            self.frames.feed(&buf[..n]);
            if n < buf.len() {
                break;
            }
        }
        Ok(self.frames.drain())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::client::{CancelToken, ClientConfig};
    use crate::transport::MockTransport;

    fn fast() -> ClientConfig {
        ClientConfig {
            retry_interval: Duration::ZERO,
            ..ClientConfig::default()
        }
    }

    fn reply(packet_type: u8, data: &[u8]) -> Vec<u8> {
        Packet::encode(packet_type, data).unwrap()
    }

    #[test]
    fn test_returns_matching_reply() {
        let mut mock = MockTransport::new();
        mock.push_inbound(reply(0x02, &[0x01]));
        let mut client = PrinterClient::with_config(mock, fast());

        let packet = client.transceive(Command::StartPrint, &[0x01]).unwrap().unwrap();
        assert_eq!(packet.data(), &[0x01]);
        assert_eq!(client.transport().sent_bytes(), &reply(0x01, &[0x01])[..]);
    }

    #[test]
    fn test_last_match_in_batch_wins() {
        let mut chunk = reply(0x02, &[0x00]);
        chunk.extend(reply(0x02, &[0x01]));
        let mut mock = MockTransport::new();
        mock.push_inbound(chunk);
        let mut client = PrinterClient::with_config(mock, fast());

        let packet = client.transceive(Command::StartPrint, &[0x01]).unwrap().unwrap();
        assert_eq!(packet.data(), &[0x01]);
    }

    #[test]
    fn test_reply_after_empty_polls() {
        let mut mock = MockTransport::new();
        mock.push_inbound(Vec::new());
        mock.push_inbound(Vec::new());
        mock.push_inbound(reply(0x04, &[0x01]));
        let mut client = PrinterClient::with_config(mock, fast());

        assert!(client.transceive(Command::StartPagePrint, &[0x01]).unwrap().is_some());
        assert_eq!(client.transport().recv_calls(), 3);
    }

    #[test]
    fn test_uncorrelated_packets_are_skipped() {
        let mut chunk = reply(0xB3, &[0, 1, 0, 0]);
        chunk.extend(reply(0x14, &[0x01]));
        let mut mock = MockTransport::new();
        mock.push_inbound(chunk);
        let mut client = PrinterClient::with_config(mock, fast());

        let packet = client.transceive(Command::SetDimension, &[0, 1, 0, 96]).unwrap();
        assert_eq!(packet.unwrap().packet_type(), 0x14);
    }

    #[test]
    fn test_unsupported_fails_fast() {
        let mut mock = MockTransport::new();
        mock.push_inbound(reply(0x00, &[0x01]));
        let mut client = PrinterClient::with_config(mock, fast());

        let err = client.transceive(Command::Heartbeat, &[0x01]).unwrap_err();
        assert!(matches!(
            err,
            NiimprintError::Unsupported {
                command: Command::Heartbeat
            }
        ));
        assert_eq!(client.transport().recv_calls(), 1);
    }

    #[test]
    fn test_cancel_stops_retrying() {
        let mut client = PrinterClient::with_config(MockTransport::new(), fast());
        let cancel = CancelToken::new();
        client.set_cancel_token(cancel.clone());
        cancel.cancel();

        let err = client.transceive(Command::EndPrint, &[0x01]).unwrap_err();
        assert!(matches!(err, NiimprintError::Cancelled));
        assert_eq!(client.transport().recv_calls(), 1);
    }

    #[test]
    fn test_print_row_cannot_be_transceived() {
        let mut client = PrinterClient::with_config(MockTransport::new(), fast());
        let err = client.transceive(Command::PrintRow, &[]).unwrap_err();
        assert!(matches!(err, NiimprintError::Precondition(_)));
        assert!(client.transport().sent_bytes().is_empty());
    }

    #[test]
    fn test_closed_connection_is_transport_error() {
        let mut mock = MockTransport::new();
        mock.close();
        let mut client = PrinterClient::with_config(mock, fast());

        let err = client.transceive(Command::StartPrint, &[0x01]).unwrap_err();
        assert!(matches!(err, NiimprintError::Transport(_)));
    }
}
