//! # Printer Configuration
//!
//! Hardware characteristics of supported label printers and the label
//! sizes callers describe in millimeters.
//!
//! ## Supported Printers
//!
//! | Model | Printhead (dots) | Resolution | Max label length |
//! |-------|------------------|------------|------------------|
//! | D11 | 96 | 203 DPI | 599 rows |
//! | D110 | 96 | 203 DPI | 599 rows |
//! | B21 | 384 | 203 DPI | 599 rows |
//!
//! ## Units
//!
//! Label sizes are given in millimeters and converted to dots by rounding
//! *up*, so a 12mm label is exactly one 96-dot printhead:
//!
//! ```text
//! px = ceil(mm / 25.4 * dpi)
//!
//! D11: ceil(12 / 25.4 * 203) = ceil(95.9) = 96
//!      ceil(40 / 25.4 * 203) = ceil(319.7) = 320
//! ```
//!
//! ## Usage
//!
//! ```
//! use niimprint::printer::{LabelSize, PrinterConfig};
//!
//! let config = PrinterConfig::D11;
//! let (width, length) = LabelSize::default().to_px(&config);
//! assert_eq!((width, length), (96, 320));
//! ```

use serde::Serialize;

/// Default label width across the printhead, in mm.
pub const DEFAULT_LABEL_WIDTH_MM: f64 = 12.0;

/// Default label length along the feed, in mm.
pub const DEFAULT_LABEL_LENGTH_MM: f64 = 40.0;

/// # Printer Configuration
///
/// - **dpi**: resolution in dots per inch, the same in both directions
/// - **printhead_px**: dots across the printhead; every row sent must be
///   exactly this wide
/// - **max_rows**: longest page, in rows, the image check accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrinterConfig {
    /// Printer model name
    pub name: &'static str,

    /// Resolution in dots per inch
    pub dpi: u16,

    /// Printhead width in dots
    pub printhead_px: usize,

    /// Page length limit in rows
    pub max_rows: usize,
}

impl PrinterConfig {
    /// # Niimbot D11
    ///
    /// 12-15mm handheld label maker. The printhead is 96 dots wide, which
    /// makes each packed row 12 bytes: three 4-byte segments.
    pub const D11: Self = Self {
        name: "D11",
        dpi: 203,
        printhead_px: 96,
        max_rows: 599,
    };

    /// # Niimbot D110
    ///
    /// Successor of the D11 with the same printhead.
    pub const D110: Self = Self {
        name: "D110",
        dpi: 203,
        printhead_px: 96,
        max_rows: 599,
    };

    /// # Niimbot B21
    ///
    /// 20-50mm desktop label printer, 48-byte rows.
    pub const B21: Self = Self {
        name: "B21",
        dpi: 203,
        printhead_px: 384,
        max_rows: 599,
    };

    /// Every built-in configuration.
    pub const ALL: [Self; 3] = [Self::D11, Self::D110, Self::B21];

    /// Look up a built-in configuration by model name, case-insensitively.
    pub fn by_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Dots per millimeter
    #[inline]
    pub fn dots_per_mm(&self) -> f64 {
        self.dpi as f64 / 25.4
    }

    /// Convert millimeters to dots, rounding up.
    #[inline]
    pub fn mm_to_px(&self, mm: f64) -> usize {
        (mm / 25.4 * self.dpi as f64).ceil() as usize
    }

    /// Convert dots to millimeters
    #[inline]
    pub fn px_to_mm(&self, px: usize) -> f64 {
        px as f64 / self.dots_per_mm()
    }

    /// Printhead width in millimeters
    #[inline]
    pub fn printhead_mm(&self) -> f64 {
        self.px_to_mm(self.printhead_px)
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self::D11
    }
}

/// Physical label size.
///
/// `width_mm` runs across the printhead, `length_mm` along the feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelSize {
    pub width_mm: f64,
    pub length_mm: f64,
}

impl LabelSize {
    pub fn new(width_mm: f64, length_mm: f64) -> Self {
        Self {
            width_mm,
            length_mm,
        }
    }

    /// `(width, length)` in dots for `config`.
    pub fn to_px(&self, config: &PrinterConfig) -> (usize, usize) {
        (config.mm_to_px(self.width_mm), config.mm_to_px(self.length_mm))
    }
}

impl Default for LabelSize {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL_WIDTH_MM, DEFAULT_LABEL_LENGTH_MM)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_d11_default_label_is_one_printhead() {
        let config = PrinterConfig::D11;
        assert_eq!(config.mm_to_px(12.0), config.printhead_px);
        assert_eq!(config.mm_to_px(40.0), 320);
    }

    #[test]
    fn test_mm_to_px_rounds_up() {
        let config = PrinterConfig::D11;
        assert_eq!(config.mm_to_px(0.0), 0);
        // 0.1mm is under one dot but still needs one
        assert_eq!(config.mm_to_px(0.1), 1);
        assert_eq!(config.mm_to_px(25.4), 203);
    }

    #[test]
    fn test_dots_per_mm() {
        let dpmm = PrinterConfig::D11.dots_per_mm();
        // 203 DPI ≈ 8 dots/mm
        assert!((dpmm - 8.0).abs() < 0.1);
    }

    #[test]
    fn test_printhead_mm() {
        // 96 dots / 8 dpmm = 12mm
        assert!((PrinterConfig::D11.printhead_mm() - 12.0).abs() < 0.1);
        assert!((PrinterConfig::B21.printhead_mm() - 48.0).abs() < 0.1);
    }

    #[test]
    fn test_rows_split_into_whole_segments() {
        for config in PrinterConfig::ALL {
            let row_bytes = config.printhead_px / 8;
            assert_eq!(config.printhead_px % 8, 0, "{}", config.name);
            assert_eq!(row_bytes % 3, 0, "{}", config.name);
        }
    }

    #[test]
    fn test_by_name() {
        assert_eq!(PrinterConfig::by_name("d11"), Some(PrinterConfig::D11));
        assert_eq!(PrinterConfig::by_name("B21"), Some(PrinterConfig::B21));
        assert_eq!(PrinterConfig::by_name("Q1"), None);
    }

    #[test]
    fn test_default_label_size() {
        let size = LabelSize::default();
        assert_eq!(size.to_px(&PrinterConfig::default()), (96, 320));
    }
}
