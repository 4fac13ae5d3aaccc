//! # Printer Transport Layer
//!
//! This module provides the byte-stream backends used to talk to printers.
//!
//! ## Available Transports
//!
//! - [`rfcomm`]: Bluetooth RFCOMM socket addressed by MAC (Linux)
//! - [`bluetooth`]: Pre-bound `/dev/rfcommN` TTY device (Unix)
//! - [`mock`]: Scripted in-memory transport for tests
//!
//! ## Receive Semantics
//!
//! [`Transport::recv`] must not block for long. It returns `Ok(0)` when
//! nothing arrived within the backend's short read window, and an error when
//! the peer has closed the connection. The transceiver relies on this to
//! poll with a bounded budget.

pub mod bluetooth;
pub mod mock;
pub mod rfcomm;

pub use bluetooth::SerialTransport;
pub use mock::MockTransport;
pub use rfcomm::BdAddr;
#[cfg(target_os = "linux")]
pub use rfcomm::RfcommSocket;

use crate::error::Result;

/// A bidirectional byte stream to one printer.
pub trait Transport {
    /// Write all of `data`.
    fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Read whatever is available into `buf`.
    ///
    /// Returns `Ok(0)` if nothing arrived within the read window.
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        (**self).send(data)
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).recv(buf)
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        (**self).send(data)
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).recv(buf)
    }
}
