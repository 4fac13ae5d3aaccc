//! # RFID Label Record
//!
//! Niimbot label rolls carry an RFID tag describing the consumable. The
//! `get_rfid` reply is parsed sequentially:
//!
//! ```text
//! ┌──────────┬────┬─────────┬────┬────────┬───────────┬──────────┬──────┐
//! │ uuid (8) │ bl │ barcode │ sl │ serial │ total u16 │ used u16 │ type │
//! └──────────┴────┴─────────┴────┴────────┴───────────┴──────────┴──────┘
//!               bl, sl = one-byte lengths of the following strings
//! ```
//!
//! A payload whose first byte is zero means no tag is present. Barcode and
//! serial must be valid UTF-8.

use serde::Serialize;

use super::info::to_hex;

/// Contents of a label roll's RFID tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RfidRecord {
    /// Tag UUID as lowercase hex
    pub uuid: String,
    pub barcode: String,
    pub serial: String,
    /// Labels already printed from this roll
    pub used_len: u16,
    /// Labels on a full roll
    pub total_len: u16,
    #[serde(rename = "type")]
    pub label_type: u8,
}

/// Parse a `get_rfid` reply payload.
///
/// Returns `Ok(None)` when no tag is present and `Err` with a description
/// when the payload is shorter than its embedded lengths require.
pub fn parse(data: &[u8]) -> Result<Option<RfidRecord>, String> {
    match data.first() {
        None => return Err("empty payload".to_string()),
        Some(0) => return Ok(None),
        Some(_) => {}
    }

    let mut cursor = Cursor { data, pos: 0 };
    let uuid = to_hex(cursor.take(8, "uuid")?);
    let barcode = cursor.string("barcode")?;
    let serial = cursor.string("serial")?;
    let tail = cursor.take(5, "lengths")?;

    Ok(Some(RfidRecord {
        uuid,
        barcode,
        serial,
        total_len: u16::from_be_bytes([tail[0], tail[1]]),
        used_len: u16::from_be_bytes([tail[2], tail[3]]),
        label_type: tail[4],
    }))
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize, field: &str) -> Result<&'a [u8], String> {
        let end = self.pos + n;
        let slice = self.data.get(self.pos..end).ok_or_else(|| {
            format!(
                "{} needs {} bytes at offset {}, payload is {} bytes",
                field,
                n,
                self.pos,
                self.data.len()
            )
        })?;
        self.pos = end;
        Ok(slice)
    }

    /// One length byte followed by that many bytes of text.
    fn string(&mut self, field: &str) -> Result<String, String> {
        let len = self.take(1, field)?[0] as usize;
        let bytes = self.take(len, field)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| format!("{} is not UTF-8: {}", field, e))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> Vec<u8> {
        let mut data = vec![0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        data.push(3);
        data.extend_from_slice(b"ABC");
        data.push(2);
        data.extend_from_slice(b"XY");
        data.extend_from_slice(&500u16.to_be_bytes());
        data.extend_from_slice(&120u16.to_be_bytes());
        data.push(1);
        data
    }

    #[test]
    fn test_parse_full_record() {
        let record = parse(&sample_payload()).unwrap().unwrap();
        assert_eq!(
            record,
            RfidRecord {
                uuid: "0102030405060708".to_string(),
                barcode: "ABC".to_string(),
                serial: "XY".to_string(),
                used_len: 120,
                total_len: 500,
                label_type: 1,
            }
        );
    }

    #[test]
    fn test_leading_zero_means_no_tag() {
        assert_eq!(parse(&[0x00]).unwrap(), None);
        assert_eq!(parse(&[0x00, 0xFF, 0xFF]).unwrap(), None);
    }

    #[test]
    fn test_empty_strings() {
        let mut data = vec![0xAA; 8];
        data.extend_from_slice(&[0, 0]);
        data.extend_from_slice(&[0, 10, 0, 0, 2]);
        let record = parse(&data).unwrap().unwrap();
        assert_eq!(record.barcode, "");
        assert_eq!(record.serial, "");
        assert_eq!(record.total_len, 10);
        assert_eq!(record.label_type, 2);
    }

    #[test]
    fn test_truncated_payload_is_an_error() {
        let data = sample_payload();
        assert!(parse(&data[..data.len() - 1]).is_err());
        assert!(parse(&data[..10]).is_err());
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let mut data = sample_payload();
        // second barcode byte
        data[10] = 0xFF;
        let err = parse(&data).unwrap_err();
        assert!(err.starts_with("barcode is not UTF-8"), "{}", err);
    }

    #[test]
    fn test_serializes_type_field() {
        let record = parse(&sample_payload()).unwrap().unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], 1);
        assert_eq!(json["barcode"], "ABC");
    }
}
