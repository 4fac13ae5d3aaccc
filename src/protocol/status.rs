//! # Print Status
//!
//! `get_print_status` replies with a fixed four-byte big-endian layout:
//! `page: u16, progress1: u8, progress2: u8`.

use serde::Serialize;

/// Progress of the current print job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PrintStatus {
    /// Pages finished so far
    pub page: u16,
    pub progress1: u8,
    pub progress2: u8,
}

/// Decode a `get_print_status` reply payload.
pub fn parse(data: &[u8]) -> Result<PrintStatus, String> {
    match *data {
        [p0, p1, progress1, progress2] => Ok(PrintStatus {
            page: u16::from_be_bytes([p0, p1]),
            progress1,
            progress2,
        }),
        _ => Err(format!("expected 4 bytes, got {}", data.len())),
    }
}
