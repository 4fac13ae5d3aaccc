//! # Printer Module
//!
//! Printer-specific configuration.
//!
//! ## Modules
//!
//! - [`config`]: Printhead width, resolution, label sizes
//! - [`models`]: `DEVICETYPE` id to model name

pub mod config;
pub mod models;

pub use config::{LabelSize, PrinterConfig};
