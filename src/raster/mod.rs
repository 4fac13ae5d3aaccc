//! # Raster Module
//!
//! Turns images into the row packets a label printer streams.
//!
//! ## Modules
//!
//! - [`bitmap`]: 1-bit images and the [`MonoBitmap`] trait
//! - [`dither`]: greyscale to 1-bit conversion
//! - [`encoder`]: bitmap rows to `print_row` packets
//! - [`text`]: text labels in a bitmap font
//!
//! ## Usage Example
//!
//! ```
//! use niimprint::raster::{self, Bitmap};
//!
//! // A 96x16 label with a 2-dot border
//! let label = Bitmap::from_fn(96, 16, |x, y| x < 2 || x >= 94 || y < 2 || y >= 14);
//!
//! let packets: Vec<_> = raster::encoder::rows(&label)?.collect();
//! assert_eq!(packets.len(), 16);
//! assert_eq!(packets[0].data().len(), 6 + 12);
//! # Ok::<(), niimprint::NiimprintError>(())
//! ```

pub mod bitmap;
pub mod dither;
pub mod encoder;
pub mod text;

pub use bitmap::{Bitmap, MonoBitmap};
pub use dither::Dithering;
pub use encoder::RowEncoder;
