//! # Niimprint - Niimbot Label Printer Library
//!
//! Niimprint is a Rust library for printing on Niimbot label printers over
//! Bluetooth. It provides:
//!
//! - **Protocol implementation**: packet framing, stream reassembly, reply
//!   decoding
//! - **Client**: request/response exchanges with bounded retries
//! - **Raster**: image binarization and per-row packet encoding
//! - **Print jobs**: the command sequence that prints a page
//! - **Transport**: Bluetooth RFCOMM communication
//!
//! ## Quick Start
//!
//! ```no_run
//! use niimprint::{
//!     Niimprinter,
//!     job::JobOptions,
//!     raster::{Bitmap, Dithering},
//! };
//!
//! // Open connection to printer
//! let mut printer = Niimprinter::open("/dev/rfcomm0")?;
//!
//! // Load an image and turn it into dots
//! let image = image::open("label.png").map_err(|e| niimprint::NiimprintError::Image(e.to_string()))?;
//! let bitmap = Bitmap::from_image(&image, Dithering::FloydSteinberg);
//!
//! // Make sure it fits the printhead, then print it
//! printer.check_bitmap(&bitmap)?;
//! printer.print_bitmap(&bitmap, JobOptions::default())?;
//!
//! # Ok::<(), niimprint::NiimprintError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | Packet framing and reply layouts |
//! | [`client`] | Transceiver and device operations |
//! | [`raster`] | Bitmaps, dithering, row encoding |
//! | [`job`] | Print job sequence |
//! | [`transport`] | Communication backends |
//! | [`printer`] | Printer configurations |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! Currently tested with:
//! - Niimbot D11 (12mm labels, 203 DPI, Bluetooth)
//!
//! Other Niimbot printers speaking the same protocol should work with an
//! appropriate [`PrinterConfig`].

pub mod client;
pub mod error;
pub mod job;
pub mod niimprinter;
pub mod printer;
pub mod protocol;
pub mod raster;
pub mod transport;

// Re-exports for convenience
pub use client::PrinterClient;
pub use error::NiimprintError;
pub use niimprinter::{DeviceInfo, Niimprinter};
pub use printer::PrinterConfig;
pub use protocol::Packet;
pub use transport::SerialTransport;
