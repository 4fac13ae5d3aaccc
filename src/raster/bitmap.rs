//! # Monochrome Bitmaps
//!
//! The encoder reads pixels through the [`MonoBitmap`] trait, where `true`
//! means "print a dot here". [`Bitmap`] is the owned implementation; it can
//! be built from a closure or from an image.
//!
//! ## Orientation
//!
//! The printer feeds labels lengthwise: each row runs across the printhead
//! and row 0 prints first. A landscape image is therefore turned 90°
//! clockwise by [`Bitmap::from_image`], so its left edge prints first.

use image::{DynamicImage, GrayImage};

use super::dither::{self, Dithering};

/// Read-only 1-bit image. `pixel(x, y) == true` is a printed (dark) dot.
pub trait MonoBitmap {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn pixel(&self, x: usize, y: usize) -> bool;
}

/// Owned row-major 1-bit image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl Bitmap {
    /// Blank (all white) bitmap.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width * height],
        }
    }

    /// Bitmap with every pixel given by `f(x, y)`.
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> bool,
    {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Binarize a greyscale image.
    ///
    /// Luminance is inverted before binarizing: light pixels become white
    /// (no dot) and dark pixels become dots.
    pub fn from_luma(image: &GrayImage, method: Dithering) -> Self {
        let width = image.width() as usize;
        let height = image.height() as usize;
        let intensity: Vec<f32> = image
            .pixels()
            .map(|p| 1.0 - p.0[0] as f32 / 255.0)
            .collect();

        Self {
            width,
            height,
            pixels: dither::binarize(width, height, &intensity, method),
        }
    }

    /// Binarize any image, rotating landscape images into print
    /// orientation first.
    pub fn from_image(image: &DynamicImage, method: Dithering) -> Self {
        let luma = if image.width() > image.height() {
            image.rotate90().to_luma8()
        } else {
            image.to_luma8()
        };
        Self::from_luma(&luma, method)
    }

    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        let i = y * self.width + x;
        self.pixels[i] = on;
    }

    /// One row of pixels.
    pub fn row(&self, y: usize) -> &[bool] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }
}

impl MonoBitmap for Bitmap {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y * self.width + x]
    }
}
