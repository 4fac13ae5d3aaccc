//! # Row Encoder
//!
//! Each bitmap row becomes one `print_row` (0x85) packet:
//!
//! ```text
//! ┌──────────────┬────┬────┬────┬──────┬─────────────────────────┐
//! │ row u16 (BE) │ c0 │ c1 │ c2 │ 0x01 │ packed row, MSB first   │
//! └──────────────┴────┴────┴────┴──────┴─────────────────────────┘
//!   c0..c2 = number of set bits in each third of the packed row
//!   0x01   = draw mode
//! ```
//!
//! ## Segments
//!
//! The packed row is split into three contiguous byte segments of
//! `len / 3` bytes, with the last segment taking any remainder. For the
//! 96-dot printhead of D11-class printers this is three 4-byte segments.
//! Counts above 255 saturate.
//!
//! ## Example
//!
//! ```
//! use niimprint::raster::{Bitmap, encoder};
//!
//! let label = Bitmap::from_fn(96, 2, |x, _| x < 8);
//! let packets: Vec<_> = encoder::rows(&label)?.collect();
//!
//! assert_eq!(packets.len(), 2);
//! assert_eq!(packets[1].packet_type(), 0x85);
//! assert_eq!(&packets[1].data()[..6], &[0x00, 0x01, 8, 0, 0, 1]);
//! # Ok::<(), niimprint::NiimprintError>(())
//! ```

use super::bitmap::MonoBitmap;
use crate::error::{NiimprintError, Result};
use crate::protocol::Packet;
use crate::protocol::command::PRINT_ROW;
use crate::protocol::packet::MAX_DATA_LEN;

/// Bytes in the row header (index, three counts, draw mode).
pub const ROW_HEADER_LEN: usize = 6;

/// Widest row, in bytes, that fits in one packet.
pub const MAX_ROW_BYTES: usize = MAX_DATA_LEN - ROW_HEADER_LEN;

/// Draw mode byte; the only mode observed in practice.
pub const DRAW_MODE: u8 = 1;

/// Pack row `y` of `bitmap`, MSB first, `ceil(width / 8)` bytes.
pub fn pack_row<B: MonoBitmap + ?Sized>(bitmap: &B, y: usize) -> Vec<u8> {
    let width = bitmap.width();
    let mut bytes = vec![0u8; width.div_ceil(8)];
    for x in 0..width {
        if bitmap.pixel(x, y) {
            bytes[x / 8] |= 0x80 >> (x % 8);
        }
    }
    bytes
}

/// Set-bit counts of the three segments of a packed row.
pub fn segment_counts(row: &[u8]) -> [u8; 3] {
    let seg = row.len() / 3;
    let bounds = [(0, seg), (seg, 2 * seg), (2 * seg, row.len())];
    bounds.map(|(start, end)| {
        let ones: u32 = row[start..end].iter().map(|b| b.count_ones()).sum();
        ones.min(u8::MAX as u32) as u8
    })
}

/// Build the `print_row` packet for row `index` from its packed bytes.
pub fn row_packet(index: u16, packed: &[u8]) -> Result<Packet> {
    if packed.len() > MAX_ROW_BYTES {
        return Err(NiimprintError::PayloadTooLarge {
            len: packed.len() + ROW_HEADER_LEN,
        });
    }

    Ok(assemble(index, packed))
}

fn assemble(index: u16, packed: &[u8]) -> Packet {
    let [c0, c1, c2] = segment_counts(packed);
    let mut data = Vec::with_capacity(ROW_HEADER_LEN + packed.len());
    data.extend_from_slice(&index.to_be_bytes());
    data.extend_from_slice(&[c0, c1, c2, DRAW_MODE]);
    data.extend_from_slice(packed);
    Packet::from_parts(PRINT_ROW, data)
}

/// Encode a single row of `bitmap`.
pub fn encode_row<B: MonoBitmap + ?Sized>(bitmap: &B, y: usize) -> Result<Packet> {
    let index = u16::try_from(y)
        .map_err(|_| NiimprintError::Precondition(format!("row index {} exceeds 65535", y)))?;
    row_packet(index, &pack_row(bitmap, y))
}

/// Validate `bitmap` and return an iterator over its row packets.
pub fn rows<B: MonoBitmap + ?Sized>(bitmap: &B) -> Result<RowEncoder<'_, B>> {
    RowEncoder::new(bitmap)
}

/// Lazy sequence of `print_row` packets, top row first.
///
/// Holds no state besides the next row index, so cloning it or calling
/// [`rows`] again restarts from the top.
pub struct RowEncoder<'a, B: ?Sized> {
    bitmap: &'a B,
    next: usize,
}

impl<'a, B: MonoBitmap + ?Sized> RowEncoder<'a, B> {
    /// Check that every row fits in a packet and every index in a `u16`.
    pub fn new(bitmap: &'a B) -> Result<Self> {
        let row_bytes = bitmap.width().div_ceil(8);
        if row_bytes > MAX_ROW_BYTES {
            return Err(NiimprintError::Precondition(format!(
                "bitmap width {} px exceeds {} px per row",
                bitmap.width(),
                MAX_ROW_BYTES * 8
            )));
        }
        if bitmap.height() > u16::MAX as usize + 1 {
            return Err(NiimprintError::Precondition(format!(
                "bitmap height {} exceeds {} rows",
                bitmap.height(),
                u16::MAX as usize + 1
            )));
        }
        Ok(Self { bitmap, next: 0 })
    }
}

impl<B: ?Sized> Clone for RowEncoder<'_, B> {
    fn clone(&self) -> Self {
        Self {
            bitmap: self.bitmap,
            next: self.next,
        }
    }
}

impl<B: MonoBitmap + ?Sized> Iterator for RowEncoder<'_, B> {
    type Item = Packet;

    fn next(&mut self) -> Option<Packet> {
        if self.next >= self.bitmap.height() {
            return None;
        }
        let y = self.next;
        self.next += 1;

        // Width and height were checked in new()
        Some(assemble(y as u16, &pack_row(self.bitmap, y)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bitmap.height().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl<B: MonoBitmap + ?Sized> ExactSizeIterator for RowEncoder<'_, B> {}

// ============================================================================
// TESTS
// ============================================================================
