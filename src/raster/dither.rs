//! # Binarization
//!
//! Label printers print black or nothing. This module turns continuous-tone
//! intensities into on/off dots.
//!
//! ## Polarity
//!
//! Intensity here is *ink* intensity: 0.0 = white (no dot), 1.0 = black
//! (dot). Source images store luminance, where white is high, so callers
//! invert first:
//!
//! ```text
//! intensity = 1.0 - luma / 255
//! ```
//!
//! ## Algorithms
//!
//! | Method | Speed | Quality | Artifacts |
//! |--------|-------|---------|-----------|
//! | Threshold | Fastest | Text, line art | Banding on photos |
//! | Bayer | Fast | Good | Regular pattern |
//! | Floyd-Steinberg | Slower | Best for photos | Noise, worms |
//!
//! Floyd-Steinberg matches what common imaging libraries do when converting
//! to 1-bit, so it is the default for images.
//!
//! ## The Bayer Matrix
//!
//! ```text
//!     0   1   2   3   4   5   6   7   (x mod 8)
//!   ┌───┬───┬───┬───┬───┬───┬───┬───┐
//! 0 │ 0 │32 │ 8 │40 │ 2 │34 │10 │42 │
//! 1 │48 │16 │56 │24 │50 │18 │58 │26 │
//! 2 │12 │44 │ 4 │36 │14 │46 │ 6 │38 │
//! 3 │60 │28 │52 │20 │62 │30 │54 │22 │
//! 4 │ 3 │35 │11 │43 │ 1 │33 │ 9 │41 │
//! 5 │51 │19 │59 │27 │49 │17 │57 │25 │
//! 6 │15 │47 │ 7 │39 │13 │45 │ 5 │37 │
//! 7 │63 │31 │55 │23 │61 │29 │53 │21 │
//!   └───┴───┴───┴───┴───┴───┴───┴───┘
//! (y mod 8)
//! ```
//!
//! ## Usage Example
//!
//! ```
//! use niimprint::raster::dither::{self, Dithering};
//!
//! // A 2x1 field: full ink, no ink
//! let dots = dither::binarize(2, 1, &[1.0, 0.0], Dithering::Bayer);
//! assert_eq!(dots, vec![true, false]);
//! ```

/// Binarization method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dithering {
    /// Dot where intensity is at least one half
    Threshold,
    /// Bayer 8x8 ordered dithering
    Bayer,
    /// Floyd-Steinberg error diffusion
    #[default]
    FloydSteinberg,
}

/// Bayer 8x8 dithering matrix
///
/// Values range from 0-63. Low values activate first at low intensities.
pub const BAYER8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Get the Bayer threshold for a pixel position, in (0, 1).
///
/// ```text
/// threshold = (BAYER8[y mod 8][x mod 8] + 0.5) / 64.0
/// ```
#[inline]
pub fn threshold(x: usize, y: usize) -> f32 {
    let matrix_value = BAYER8[y & 7][x & 7];
    (matrix_value as f32 + 0.5) / 64.0
}

/// Bayer decision for one pixel.
///
/// Full black always prints and full white never does.
#[inline]
pub fn should_print(x: usize, y: usize, intensity: f32) -> bool {
    intensity > threshold(x, y)
}

/// Binarize a `width` x `height` intensity field, row-major.
///
/// `intensity` holds ink intensity in [0, 1]; the result is `true` where a
/// dot should be printed.
pub fn binarize(width: usize, height: usize, intensity: &[f32], method: Dithering) -> Vec<bool> {
    debug_assert_eq!(intensity.len(), width * height);

    match method {
        Dithering::Threshold => intensity.iter().map(|&v| v >= 0.5).collect(),
        Dithering::Bayer => intensity
            .iter()
            .enumerate()
            .map(|(i, &v)| should_print(i % width.max(1), i / width.max(1), v))
            .collect(),
        Dithering::FloydSteinberg => floyd_steinberg(width, height, intensity),
    }
}

/// Floyd-Steinberg error diffusion.
///
/// ```text
///          X   7/16
///   3/16  5/16  1/16
/// ```
fn floyd_steinberg(width: usize, height: usize, intensity: &[f32]) -> Vec<bool> {
    let mut work = intensity.to_vec();
    let mut out = vec![false; width * height];

    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            let old = work[i];
            let on = old >= 0.5;
            out[i] = on;
            let err = old - if on { 1.0 } else { 0.0 };

            if x + 1 < width {
                work[i + 1] += err * 7.0 / 16.0;
            }
            if y + 1 < height {
                let below = i + width;
                if x > 0 {
                    work[below - 1] += err * 3.0 / 16.0;
                }
                work[below] += err * 5.0 / 16.0;
                if x + 1 < width {
                    work[below + 1] += err * 1.0 / 16.0;
                }
            }
        }
    }

    out
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bayer_matrix_values() {
        let mut seen = [false; 64];
        for row in &BAYER8 {
            for &val in row {
                assert!(val < 64, "Matrix value {} out of range", val);
                assert!(!seen[val as usize], "Duplicate value {}", val);
                seen[val as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s), "Not all values 0-63 present");
    }

    #[test]
    fn test_threshold_range() {
        for y in 0..8 {
            for x in 0..8 {
                let t = threshold(x, y);
                assert!(t > 0.0 && t < 1.0, "Threshold at ({},{}) = {}", x, y, t);
            }
        }
    }

    #[test]
    fn test_extremes_for_every_method() {
        for method in [Dithering::Threshold, Dithering::Bayer, Dithering::FloydSteinberg] {
            let black = binarize(16, 4, &[1.0; 64], method);
            assert!(black.iter().all(|&b| b), "{:?} black", method);
            let white = binarize(16, 4, &[0.0; 64], method);
            assert!(white.iter().all(|&b| !b), "{:?} white", method);
        }
    }

    #[test]
    fn test_threshold_midpoint() {
        assert_eq!(
            binarize(4, 1, &[0.49, 0.5, 0.51, 0.0], Dithering::Threshold),
            vec![false, true, true, false]
        );
    }

    #[test]
    fn test_floyd_steinberg_preserves_mean() {
        let field = vec![0.25f32; 32 * 32];
        let dots = binarize(32, 32, &field, Dithering::FloydSteinberg)
            .iter()
            .filter(|&&b| b)
            .count();
        // A quarter of 1024 pixels, give or take the edge error
        assert!((215..=297).contains(&dots), "got {} dots", dots);
    }

    #[test]
    fn test_bayer_gray_distribution() {
        let field = vec![0.5f32; 64];
        let count = binarize(8, 8, &field, Dithering::Bayer)
            .iter()
            .filter(|&&b| b)
            .count();
        assert_eq!(count, 32);
    }
}
