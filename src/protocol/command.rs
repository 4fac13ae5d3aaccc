//! # Command Catalog
//!
//! Request and response type codes for every operation the printer
//! understands.
//!
//! ## Correlation
//!
//! Most replies use a fixed type code, but there is no single rule relating
//! request and response codes:
//!
//! | Command | Request | Response |
//! |---------|---------|----------|
//! | start_print | 0x01 | 0x02 |
//! | start_page_print | 0x03 | 0x04 |
//! | set_dimension | 0x13 | 0x14 |
//! | set_quantity | 0x15 | 0x16 |
//! | get_rfid | 0x1A | 0x1B |
//! | allow_print_clear | 0x20 | 0x30 |
//! | set_label_density | 0x21 | 0x31 |
//! | set_label_type | 0x23 | 0x33 |
//! | get_info | 0x40 | 0x40 + key |
//! | print_row | 0x85 | (none) |
//! | get_print_status | 0xA3 | 0xB3 |
//! | heartbeat | 0xDC | 0xDD |
//! | end_page_print | 0xE3 | 0xE4 |
//! | end_print | 0xF3 | 0xF4 |
//!
//! `get_info` replies are offset by the key being queried, so the expected
//! response is a function of the whole command, not of the request code.
//!
//! Two reply types are universal: [`NAK`] and [`UNSUPPORTED`].

use std::fmt;

use super::info::InfoKey;

/// Reply type signalling the printer refused the request.
pub const NAK: u8 = 0xDB;

/// Reply type signalling the firmware does not know the request.
pub const UNSUPPORTED: u8 = 0x00;

/// Base code for `get_info`; the reply type is `GET_INFO + key`.
pub const GET_INFO: u8 = 0x40;

/// Type code of a raster row packet.
pub const PRINT_ROW: u8 = 0x85;

/// A logical printer operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    GetInfo(InfoKey),
    GetRfid,
    Heartbeat,
    SetLabelType,
    SetLabelDensity,
    StartPrint,
    EndPrint,
    StartPagePrint,
    EndPagePrint,
    AllowPrintClear,
    SetDimension,
    SetQuantity,
    GetPrintStatus,
    PrintRow,
}

impl Command {
    /// Packet type code of the request.
    pub fn request_code(self) -> u8 {
        match self {
            Command::GetInfo(_) => GET_INFO,
            Command::GetRfid => 0x1A,
            Command::Heartbeat => 0xDC,
            Command::SetLabelType => 0x23,
            Command::SetLabelDensity => 0x21,
            Command::StartPrint => 0x01,
            Command::EndPrint => 0xF3,
            Command::StartPagePrint => 0x03,
            Command::EndPagePrint => 0xE3,
            Command::AllowPrintClear => 0x20,
            Command::SetDimension => 0x13,
            Command::SetQuantity => 0x15,
            Command::GetPrintStatus => 0xA3,
            Command::PrintRow => PRINT_ROW,
        }
    }

    /// Packet type code of the correlated reply, if the command has one.
    pub fn response_code(self) -> Option<u8> {
        let code = match self {
            Command::GetInfo(key) => GET_INFO.wrapping_add(key.code()),
            Command::GetRfid => 0x1B,
            Command::Heartbeat => 0xDD,
            Command::SetLabelType => 0x33,
            Command::SetLabelDensity => 0x31,
            Command::StartPrint => 0x02,
            Command::EndPrint => 0xF4,
            Command::StartPagePrint => 0x04,
            Command::EndPagePrint => 0xE4,
            Command::AllowPrintClear => 0x30,
            Command::SetDimension => 0x14,
            Command::SetQuantity => 0x16,
            Command::GetPrintStatus => 0xB3,
            Command::PrintRow => return None,
        };
        Some(code)
    }

    /// Operation name as used in logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            Command::GetInfo(_) => "get_info",
            Command::GetRfid => "get_rfid",
            Command::Heartbeat => "heartbeat",
            Command::SetLabelType => "set_label_type",
            Command::SetLabelDensity => "set_label_density",
            Command::StartPrint => "start_print",
            Command::EndPrint => "end_print",
            Command::StartPagePrint => "start_page_print",
            Command::EndPagePrint => "end_page_print",
            Command::AllowPrintClear => "allow_print_clear",
            Command::SetDimension => "set_dimension",
            Command::SetQuantity => "set_quantity",
            Command::GetPrintStatus => "get_print_status",
            Command::PrintRow => "print_row",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::GetInfo(key) => write!(f, "get_info({})", key),
            other => f.write_str(other.name()),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_info_response_is_key_offset() {
        assert_eq!(Command::GetInfo(InfoKey::SoftVersion).response_code(), Some(0x49));
        assert_eq!(Command::GetInfo(InfoKey::DeviceSerial).response_code(), Some(0x4B));
        assert_eq!(Command::GetInfo(InfoKey::Density).response_code(), Some(0x41));
        for key in InfoKey::ALL {
            assert_eq!(Command::GetInfo(key).request_code(), GET_INFO);
        }
    }

    #[test]
    fn test_settings_respond_sixteen_above_request() {
        for cmd in [
            Command::SetLabelType,
            Command::SetLabelDensity,
            Command::AllowPrintClear,
        ] {
            assert_eq!(cmd.response_code(), Some(cmd.request_code() + 16));
        }
    }

    #[test]
    fn test_print_row_has_no_reply() {
        assert_eq!(Command::PrintRow.request_code(), 0x85);
        assert_eq!(Command::PrintRow.response_code(), None);
    }

    #[test]
    fn test_display_names_operation() {
        assert_eq!(Command::SetQuantity.to_string(), "set_quantity");
        assert_eq!(
            Command::GetInfo(InfoKey::HardVersion).to_string(),
            "get_info(HARDVERSION)"
        );
    }
}
