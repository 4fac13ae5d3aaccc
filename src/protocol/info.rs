//! # Device Information Keys
//!
//! `get_info` takes a one-byte key and the reply payload is decoded
//! according to that key:
//!
//! | Key | Code | Decoded as |
//! |-----|------|------------|
//! | DENSITY | 1 | integer |
//! | PRINTSPEED | 2 | integer |
//! | LABELTYPE | 3 | integer |
//! | LANGUAGETYPE | 6 | integer |
//! | AUTOSHUTDOWNTIME | 7 | integer |
//! | DEVICETYPE | 8 | integer (model id) |
//! | SOFTVERSION | 9 | integer / 100 |
//! | BATTERY | 10 | integer |
//! | DEVICESERIAL | 11 | hex string of raw bytes |
//! | HARDVERSION | 12 | integer / 100 |
//!
//! Integers are big-endian and as wide as the payload.

use std::fmt;

use serde::Serialize;

/// Key selecting which device property `get_info` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoKey {
    Density,
    PrintSpeed,
    LabelType,
    LanguageType,
    AutoShutdownTime,
    DeviceType,
    SoftVersion,
    Battery,
    DeviceSerial,
    HardVersion,
}

impl InfoKey {
    /// Every key, in code order.
    pub const ALL: [InfoKey; 10] = [
        InfoKey::Density,
        InfoKey::PrintSpeed,
        InfoKey::LabelType,
        InfoKey::LanguageType,
        InfoKey::AutoShutdownTime,
        InfoKey::DeviceType,
        InfoKey::SoftVersion,
        InfoKey::Battery,
        InfoKey::DeviceSerial,
        InfoKey::HardVersion,
    ];

    /// Wire code of the key.
    pub fn code(self) -> u8 {
        match self {
            InfoKey::Density => 1,
            InfoKey::PrintSpeed => 2,
            InfoKey::LabelType => 3,
            InfoKey::LanguageType => 6,
            InfoKey::AutoShutdownTime => 7,
            InfoKey::DeviceType => 8,
            InfoKey::SoftVersion => 9,
            InfoKey::Battery => 10,
            InfoKey::DeviceSerial => 11,
            InfoKey::HardVersion => 12,
        }
    }

    /// Look a key up by wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }

    /// Protocol name of the key.
    pub fn name(self) -> &'static str {
        match self {
            InfoKey::Density => "DENSITY",
            InfoKey::PrintSpeed => "PRINTSPEED",
            InfoKey::LabelType => "LABELTYPE",
            InfoKey::LanguageType => "LANGUAGETYPE",
            InfoKey::AutoShutdownTime => "AUTOSHUTDOWNTIME",
            InfoKey::DeviceType => "DEVICETYPE",
            InfoKey::SoftVersion => "SOFTVERSION",
            InfoKey::Battery => "BATTERY",
            InfoKey::DeviceSerial => "DEVICESERIAL",
            InfoKey::HardVersion => "HARDVERSION",
        }
    }

    /// Decode a reply payload for this key.
    pub fn decode(self, data: &[u8]) -> InfoValue {
        match self {
            InfoKey::DeviceSerial => InfoValue::Text(to_hex(data)),
            InfoKey::SoftVersion | InfoKey::HardVersion => {
                InfoValue::Version(be_uint(data) as f64 / 100.0)
            }
            _ => InfoValue::Integer(be_uint(data)),
        }
    }
}

impl fmt::Display for InfoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded `get_info` reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InfoValue {
    Integer(u64),
    Version(f64),
    Text(String),
}

impl InfoValue {
    pub fn as_integer(&self) -> Option<u64> {
        match self {
            InfoValue::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for InfoValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfoValue::Integer(n) => write!(f, "{}", n),
            InfoValue::Version(v) => write!(f, "{}", v),
            InfoValue::Text(s) => f.write_str(s),
        }
    }
}

/// Big-endian unsigned integer of arbitrary width.
///
/// Payloads wider than eight bytes keep their low 64 bits.
pub fn be_uint(data: &[u8]) -> u64 {
    data.iter().fold(0u64, |acc, &b| acc.wrapping_shl(8) | b as u64)
}

/// Lowercase hex rendering of raw bytes.
pub fn to_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

// ============================================================================
// TESTS
// ============================================================================
