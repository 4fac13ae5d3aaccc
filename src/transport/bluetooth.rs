//! # Bound RFCOMM TTY Transport
//!
//! This module talks to a printer through an RFCOMM device node that has
//! already been bound with `rfcomm bind`. It is the alternative to
//! [`RfcommSocket`](super::RfcommSocket) on systems where the process may
//! not open Bluetooth sockets directly.
//!
//! ## Bluetooth Setup (Linux)
//!
//! ```bash
//! # 1. Find the printer's Bluetooth address
//! $ bluetoothctl
//! [bluetooth]# scan on
//! # Look for "D11-..." or "B21-..."
//!
//! # 2. Pair with the printer
//! [bluetooth]# pair XX:XX:XX:XX:XX:XX
//!
//! # 3. Bind to RFCOMM device (channel 1)
//! $ sudo rfcomm bind 0 XX:XX:XX:XX:XX:XX 1
//! # This creates /dev/rfcomm0
//! ```
//!
//! ## TTY Configuration
//!
//! The device is opened in raw mode so binary frames pass unmodified:
//!
//! - **No input processing**: Disable IGNBRK, BRKINT, PARMRK, ISTRIP, etc.
//! - **No output processing**: Disable OPOST (no CR/LF translation)
//! - **8-bit characters**: CS8 (8 data bits, no parity)
//! - **No echo**: Disable ECHO, ECHONL
//! - **Non-canonical mode**: Disable ICANON, with `VMIN=0`/`VTIME=1` so a
//!   read returns after at most 100ms

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::io::AsRawFd;
use std::path::Path;

use tracing::debug;

use super::Transport;
use crate::error::{NiimprintError, Result};

/// Default RFCOMM device path
pub const DEFAULT_DEVICE: &str = "/dev/rfcomm0";

/// # RFCOMM TTY Transport
///
/// ## Example
///
/// ```no_run
/// use niimprint::client::PrinterClient;
/// use niimprint::transport::SerialTransport;
///
/// let transport = SerialTransport::open("/dev/rfcomm0")?;
/// let mut client = PrinterClient::new(transport);
/// let battery = client.get_info(niimprint::protocol::InfoKey::Battery)?;
/// # Ok::<(), niimprint::NiimprintError>(())
/// ```
pub struct SerialTransport {
    file: File,
}

impl SerialTransport {
    /// Open a bound RFCOMM device.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - The device doesn't exist
    /// - Permission denied (may need root or dialout group)
    /// - TTY configuration fails
    pub fn open<P: AsRef<Path>>(device: P) -> Result<Self> {
        let path = device.as_ref();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| {
                NiimprintError::Transport(format!("Failed to open {}: {}", path.display(), e))
            })?;

        configure_tty_raw(file.as_raw_fd())?;
        debug!(device = %path.display(), "opened rfcomm tty");

        Ok(Self { file })
    }
}

impl Transport for SerialTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.file
            .write_all(data)
            .map_err(|e| NiimprintError::Transport(format!("Write failed: {}", e)))?;
        self.file
            .flush()
            .map_err(|e| NiimprintError::Transport(format!("Flush failed: {}", e)))
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        // With VMIN=0 a zero-length read is the VTIME expiry, not a hangup;
        // a dropped link surfaces as EIO instead.
        match self.file.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if is_retryable(&e) => Ok(0),
            Err(e) => Err(NiimprintError::Transport(format!("Read failed: {}", e))),
        }
    }
}

fn is_retryable(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    )
}

/// Configure a file descriptor for raw TTY mode.
///
/// ## What Gets Disabled
///
/// - **Input flags**: IGNBRK, BRKINT, PARMRK, ISTRIP, INLCR, IGNCR, ICRNL, IXON, IXOFF, IXANY
/// - **Output flags**: OPOST
/// - **Local flags**: ECHO, ECHONL, ICANON, ISIG, IEXTEN
/// - **Control flags**: CSIZE, PARENB (then CS8 is set)
///
/// Note: IXON/IXOFF/IXANY disable XON/XOFF software flow control. 0x11 and
/// 0x13 appear in packed raster rows and checksums.
#[cfg(unix)]
fn configure_tty_raw(fd: i32) -> Result<()> {
    use std::mem::MaybeUninit;

    let mut termios = MaybeUninit::uninit();
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(NiimprintError::Transport(format!(
            "tcgetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);

    termios.c_oflag &= !libc::OPOST;

    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);

    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8;

    // Return immediately with what is there, or after 100ms of silence
    termios.c_cc[libc::VMIN] = 0;
    termios.c_cc[libc::VTIME] = 1;

    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(NiimprintError::Transport(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(())
}

#[cfg(not(unix))]
fn configure_tty_raw(_fd: i32) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_device_path() {
        assert_eq!(DEFAULT_DEVICE, "/dev/rfcomm0");
    }

    #[test]
    fn test_open_missing_device_is_transport_error() {
        let err = SerialTransport::open("/dev/rfcomm-does-not-exist").err().unwrap();
        assert!(matches!(err, NiimprintError::Transport(_)));
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(is_retryable(&io::Error::from(io::ErrorKind::WouldBlock)));
        assert!(is_retryable(&io::Error::from(io::ErrorKind::TimedOut)));
        assert!(!is_retryable(&io::Error::from(io::ErrorKind::BrokenPipe)));
    }
}
