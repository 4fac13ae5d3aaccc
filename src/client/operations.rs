//! # Device Operations
//!
//! Each operation is one request/response exchange with a documented reply
//! decode.
//!
//! ## Silence
//!
//! How a missing reply is reported depends on what the operation is for:
//!
//! | Operation | No reply |
//! |-----------|----------|
//! | `get_info`, `get_rfid`, `get_print_status` | `Ok(None)` |
//! | `heartbeat` | `Ok` with every field absent |
//! | everything that changes printer state | `Err(Timeout)` |
//!
//! NAK and unsupported replies are always errors.

use tracing::{debug, warn};

use super::PrinterClient;
use crate::error::{NiimprintError, Result};
use crate::protocol::command::Command;
use crate::protocol::heartbeat::{self, Heartbeat};
use crate::protocol::info::{InfoKey, InfoValue};
use crate::protocol::rfid::{self, RfidRecord};
use crate::protocol::status::{self, PrintStatus};
use crate::transport::Transport;

/// Valid range for label type and density settings.
pub const SETTING_RANGE: std::ops::RangeInclusive<u8> = 1..=3;

impl<T: Transport> PrinterClient<T> {
    /// Query one device property.
    pub fn get_info(&mut self, key: InfoKey) -> Result<Option<InfoValue>> {
        let reply = self.transceive(Command::GetInfo(key), &[key.code()])?;
        Ok(reply.map(|packet| key.decode(packet.data())))
    }

    /// Query every known property.
    ///
    /// Keys the firmware does not implement are reported as absent rather
    /// than failing the whole dump.
    pub fn get_all_info(&mut self) -> Result<Vec<(InfoKey, Option<InfoValue>)>> {
        let mut values = Vec::with_capacity(InfoKey::ALL.len());
        for key in InfoKey::ALL {
            let value = match self.get_info(key) {
                Ok(value) => value,
                Err(NiimprintError::Unsupported { .. }) => {
                    debug!(%key, "key not supported by firmware");
                    None
                }
                Err(e) => return Err(e),
            };
            values.push((key, value));
        }
        Ok(values)
    }

    /// Read the RFID tag of the loaded label roll.
    ///
    /// `Ok(None)` when no tag is present or the printer does not answer.
    pub fn get_rfid(&mut self) -> Result<Option<RfidRecord>> {
        let command = Command::GetRfid;
        let Some(packet) = self.transceive(command, &[0x01])? else {
            return Ok(None);
        };
        rfid::parse(packet.data())
            .map_err(|reason| NiimprintError::MalformedReply { command, reason })
    }

    /// Poll printer state.
    pub fn heartbeat(&mut self) -> Result<Heartbeat> {
        match self.transceive(Command::Heartbeat, &[0x01])? {
            Some(packet) => Ok(heartbeat::parse(packet.data())),
            None => Ok(Heartbeat::default()),
        }
    }

    /// Select the label type (1..=3).
    pub fn set_label_type(&mut self, n: u8) -> Result<bool> {
        check_setting("label type", n)?;
        self.command(Command::SetLabelType, &[n])
    }

    /// Select print density (1..=3).
    pub fn set_label_density(&mut self, n: u8) -> Result<bool> {
        check_setting("label density", n)?;
        self.command(Command::SetLabelDensity, &[n])
    }

    pub fn start_print(&mut self) -> Result<bool> {
        self.command(Command::StartPrint, &[0x01])
    }

    pub fn end_print(&mut self) -> Result<bool> {
        self.command(Command::EndPrint, &[0x01])
    }

    pub fn start_page_print(&mut self) -> Result<bool> {
        self.command(Command::StartPagePrint, &[0x01])
    }

    pub fn end_page_print(&mut self) -> Result<bool> {
        self.command(Command::EndPagePrint, &[0x01])
    }

    pub fn allow_print_clear(&mut self) -> Result<bool> {
        self.command(Command::AllowPrintClear, &[0x01])
    }

    /// Announce the page size in pixels.
    ///
    /// `height` is the number of rows that will be sent and goes first on
    /// the wire; `width` is the row width. Swapping them garbles the print.
    pub fn set_dimension(&mut self, height: u16, width: u16) -> Result<bool> {
        let mut data = [0u8; 4];
        data[..2].copy_from_slice(&height.to_be_bytes());
        data[2..].copy_from_slice(&width.to_be_bytes());
        self.command(Command::SetDimension, &data)
    }

    /// Number of copies of the page to print.
    pub fn set_quantity(&mut self, n: u16) -> Result<bool> {
        self.command(Command::SetQuantity, &n.to_be_bytes())
    }

    /// Query job progress. `Ok(None)` when the printer does not answer.
    pub fn get_print_status(&mut self) -> Result<Option<PrintStatus>> {
        let command = Command::GetPrintStatus;
        let Some(packet) = self.transceive(command, &[0x01])? else {
            return Ok(None);
        };
        status::parse(packet.data())
            .map(Some)
            .map_err(|reason| NiimprintError::MalformedReply { command, reason })
    }

    /// State-changing exchange: silence is an error, the first reply byte
    /// is the success flag.
    fn command(&mut self, command: Command, data: &[u8]) -> Result<bool> {
        let packet = self
            .transceive(command, data)?
            .ok_or(NiimprintError::Timeout { command })?;

        let ok = packet.flag().ok_or_else(|| NiimprintError::MalformedReply {
            command,
            reason: "empty payload".to_string(),
        })?;
        if !ok {
            warn!(%command, "printer reported failure");
        }
        Ok(ok)
    }
}

fn check_setting(what: &str, n: u8) -> Result<()> {
    if SETTING_RANGE.contains(&n) {
        Ok(())
    } else {
        Err(NiimprintError::Precondition(format!(
            "{} must be between 1 and 3, got {}",
            what, n
        )))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::client::ClientConfig;
    use crate::protocol::Packet;
    use crate::transport::MockTransport;

    fn client_with(replies: &[(u8, &[u8])]) -> PrinterClient<MockTransport> {
        let mut mock = MockTransport::new();
        for (t, data) in replies {
            mock.push_inbound(Packet::encode(*t, data).unwrap());
        }
        let config = ClientConfig {
            retry_interval: Duration::ZERO,
            ..ClientConfig::default()
        };
        PrinterClient::with_config(mock, config)
    }

    #[test]
    fn test_get_info_sends_key_and_expects_offset_reply() {
        let mut client = client_with(&[(0x49, &[0x04, 0xD2])]);
        let value = client.get_info(InfoKey::SoftVersion).unwrap();
        assert_eq!(value, Some(InfoValue::Version(12.34)));

        let sent = client.transport().sent_packets();
        assert_eq!(sent[0].packet_type(), 0x40);
        assert_eq!(sent[0].data(), &[9]);
    }

    #[test]
    fn test_get_info_ignores_other_key_reply() {
        // A HARDVERSION reply does not answer a SOFTVERSION query
        let mut client = client_with(&[(0x4C, &[0x01, 0x00])]);
        assert_eq!(client.get_info(InfoKey::SoftVersion).unwrap(), None);
    }

    #[test]
    fn test_get_info_silence_is_none() {
        let mut client = client_with(&[]);
        assert_eq!(client.get_info(InfoKey::Battery).unwrap(), None);
        assert_eq!(client.transport().recv_calls(), 6);
    }

    #[test]
    fn test_get_rfid_absent_tag() {
        let mut client = client_with(&[(0x1B, &[0x00])]);
        assert_eq!(client.get_rfid().unwrap(), None);
    }

    #[test]
    fn test_get_rfid_truncated_is_malformed() {
        let mut client = client_with(&[(0x1B, &[0x01, 0x02, 0x03])]);
        let err = client.get_rfid().unwrap_err();
        assert!(matches!(
            err,
            NiimprintError::MalformedReply {
                command: Command::GetRfid,
                ..
            }
        ));
    }

    #[test]
    fn test_heartbeat_silence_is_all_absent() {
        let mut client = client_with(&[]);
        assert_eq!(client.heartbeat().unwrap(), Heartbeat::default());
    }

    #[test]
    fn test_set_label_type_range_checked_before_send() {
        let mut client = client_with(&[]);
        for n in [0, 4, 255] {
            assert!(matches!(
                client.set_label_type(n),
                Err(NiimprintError::Precondition(_))
            ));
            assert!(matches!(
                client.set_label_density(n),
                Err(NiimprintError::Precondition(_))
            ));
        }
        assert!(client.transport().sent_bytes().is_empty());
    }

    #[test]
    fn test_false_flag_is_not_an_error() {
        let mut client = client_with(&[(0x31, &[0x00])]);
        assert_eq!(client.set_label_density(3).unwrap(), false);
    }

    #[test]
    fn test_state_change_silence_is_timeout() {
        let mut client = client_with(&[]);
        let err = client.start_print().unwrap_err();
        assert!(matches!(
            err,
            NiimprintError::Timeout {
                command: Command::StartPrint
            }
        ));
    }

    #[test]
    fn test_empty_success_reply_is_malformed() {
        let mut client = client_with(&[(0xF4, &[])]);
        assert!(matches!(
            client.end_print(),
            Err(NiimprintError::MalformedReply { .. })
        ));
    }

    #[test]
    fn test_set_dimension_sends_height_then_width() {
        let mut client = client_with(&[(0x14, &[0x01])]);
        assert!(client.set_dimension(320, 96).unwrap());
        let sent = &client.transport().sent_packets()[0];
        assert_eq!(sent.packet_type(), 0x13);
        assert_eq!(sent.data(), &[0x01, 0x40, 0x00, 0x60]);
    }

    #[test]
    fn test_set_quantity_is_big_endian() {
        let mut client = client_with(&[(0x16, &[0x01])]);
        assert!(client.set_quantity(258).unwrap());
        assert_eq!(client.transport().sent_packets()[0].data(), &[0x01, 0x02]);
    }

    #[test]
    fn test_fixed_single_byte_requests() {
        let mut client = client_with(&[
            (0x02, &[0x01]),
            (0x30, &[0x01]),
            (0x04, &[0x01]),
            (0xE4, &[0x01]),
            (0xF4, &[0x01]),
        ]);
        assert!(client.start_print().unwrap());
        assert!(client.allow_print_clear().unwrap());
        assert!(client.start_page_print().unwrap());
        assert!(client.end_page_print().unwrap());
        assert!(client.end_print().unwrap());

        let sent: Vec<(u8, Vec<u8>)> = client
            .transport()
            .sent_packets()
            .iter()
            .map(|p| (p.packet_type(), p.data().to_vec()))
            .collect();
        assert_eq!(
            sent,
            vec![
                (0x01, vec![0x01]),
                (0x20, vec![0x01]),
                (0x03, vec![0x01]),
                (0xE3, vec![0x01]),
                (0xF3, vec![0x01]),
            ]
        );
    }

    #[test]
    fn test_get_print_status() {
        let mut client = client_with(&[(0xB3, &[0x00, 0x02, 0x64, 0x00])]);
        let status = client.get_print_status().unwrap().unwrap();
        assert_eq!(status.page, 2);
        assert_eq!(status.progress1, 100);
    }

    #[test]
    fn test_get_all_info_skips_unsupported() {
        let mock = MockTransport::with_responder(|req: &Packet| {
            let key = req.data()[0];
            if key == 9 {
                vec![Packet::new(0x40 + key, vec![0x00, 0x64]).unwrap()]
            } else {
                vec![Packet::new(0x00, vec![0x01]).unwrap()]
            }
        });
        let config = ClientConfig {
            retry_interval: Duration::ZERO,
            ..ClientConfig::default()
        };
        let mut client = PrinterClient::with_config(mock, config);

        let all = client.get_all_info().unwrap();
        assert_eq!(all.len(), InfoKey::ALL.len());
        for (key, value) in all {
            if key == InfoKey::SoftVersion {
                assert_eq!(value, Some(InfoValue::Version(1.0)));
            } else {
                assert_eq!(value, None);
            }
        }
    }
}
