//! # RFCOMM Socket Transport
//!
//! Connects straight to a printer by Bluetooth address, without binding a
//! `/dev/rfcommN` node first. Niimbot printers expose their serial port on
//! RFCOMM channel 1.
//!
//! The socket gets a 100ms receive timeout so [`Transport::recv`] never
//! blocks the transceiver's polling loop for long. The descriptor is owned
//! and closed when the transport is dropped, on every exit path.

use std::fmt;
use std::str::FromStr;

use crate::error::NiimprintError;

/// RFCOMM channel of the printer's serial port profile.
pub const DEFAULT_CHANNEL: u8 = 1;

/// A Bluetooth device address.
///
/// Stored most-significant byte first, in the order it is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BdAddr([u8; 6]);

impl BdAddr {
    pub fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Little-endian byte order used by `bdaddr_t`.
    pub fn to_wire(&self) -> [u8; 6] {
        let mut wire = self.0;
        wire.reverse();
        wire
    }
}

impl FromStr for BdAddr {
    type Err = NiimprintError;

    /// Parse `XX:XX:XX:XX:XX:XX` (colons or dashes).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            NiimprintError::Precondition(format!(
                "invalid MAC address {:?}, expected XX:XX:XX:XX:XX:XX",
                s
            ))
        };

        let parts: Vec<&str> = s.split([':', '-']).collect();
        if parts.len() != 6 {
            return Err(invalid());
        }

        let mut bytes = [0u8; 6];
        for (byte, part) in bytes.iter_mut().zip(&parts) {
            if part.len() != 2 || !part.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            *byte = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for BdAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

#[cfg(target_os = "linux")]
pub use linux::RfcommSocket;

#[cfg(target_os = "linux")]
mod linux {
    use std::fs::File;
    use std::io::{self, Read, Write};
    use std::mem;
    use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
    use std::time::Duration;

    use tracing::{debug, info};

    use super::BdAddr;
    use crate::error::{NiimprintError, Result};
    use crate::transport::Transport;

    const BTPROTO_RFCOMM: libc::c_int = 3;

    /// Receive window for one `recv` call.
    const RECV_TIMEOUT: Duration = Duration::from_millis(100);

    /// `struct sockaddr_rc` from `<bluetooth/rfcomm.h>`.
    #[repr(C)]
    struct SockaddrRc {
        rc_family: libc::sa_family_t,
        rc_bdaddr: [u8; 6],
        rc_channel: u8,
    }

    /// A connected RFCOMM stream socket.
    pub struct RfcommSocket {
        file: File,
        addr: BdAddr,
    }

    impl RfcommSocket {
        /// Connect to `addr` on `channel`.
        pub fn connect(addr: BdAddr, channel: u8) -> Result<Self> {
            info!(%addr, channel, "connecting");

            let raw = unsafe {
                libc::socket(
                    libc::AF_BLUETOOTH,
                    libc::SOCK_STREAM | libc::SOCK_CLOEXEC,
                    BTPROTO_RFCOMM,
                )
            };
            if raw < 0 {
                return Err(os_error("socket"));
            }
            // From here on the descriptor is closed on drop, including on
            // the error returns below.
            let fd = unsafe { OwnedFd::from_raw_fd(raw) };

            let sockaddr = SockaddrRc {
                rc_family: libc::AF_BLUETOOTH as libc::sa_family_t,
                rc_bdaddr: addr.to_wire(),
                rc_channel: channel,
            };
            let result = unsafe {
                libc::connect(
                    fd.as_raw_fd(),
                    &sockaddr as *const SockaddrRc as *const libc::sockaddr,
                    mem::size_of::<SockaddrRc>() as libc::socklen_t,
                )
            };
            if result != 0 {
                return Err(NiimprintError::Transport(format!(
                    "connect to {} failed: {}",
                    addr,
                    io::Error::last_os_error()
                )));
            }

            set_recv_timeout(fd.as_raw_fd(), RECV_TIMEOUT)?;
            debug!(%addr, "connected");

            Ok(Self {
                file: File::from(fd),
                addr,
            })
        }

        /// Address of the connected printer.
        pub fn peer(&self) -> BdAddr {
            self.addr
        }
    }

    impl Transport for RfcommSocket {
        fn send(&mut self, data: &[u8]) -> Result<()> {
            self.file
                .write_all(data)
                .map_err(|e| NiimprintError::Transport(format!("Write failed: {}", e)))
        }

        fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
            if buf.is_empty() {
                return Ok(0);
            }
            match self.file.read(buf) {
                Ok(0) => Err(NiimprintError::Transport(format!(
                    "connection to {} closed",
                    self.addr
                ))),
                Ok(n) => Ok(n),
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::WouldBlock
                            | io::ErrorKind::TimedOut
                            | io::ErrorKind::Interrupted
                    ) =>
                {
                    Ok(0)
                }
                Err(e) => Err(NiimprintError::Transport(format!("Read failed: {}", e))),
            }
        }
    }

    fn set_recv_timeout(fd: RawFd, timeout: Duration) -> Result<()> {
        let tv = libc::timeval {
            tv_sec: timeout.as_secs() as libc::time_t,
            tv_usec: timeout.subsec_micros() as libc::suseconds_t,
        };
        let result = unsafe {
            libc::setsockopt(
                fd,
                libc::SOL_SOCKET,
                libc::SO_RCVTIMEO,
                &tv as *const libc::timeval as *const libc::c_void,
                mem::size_of::<libc::timeval>() as libc::socklen_t,
            )
        };
        if result != 0 {
            return Err(os_error("setsockopt(SO_RCVTIMEO)"));
        }
        Ok(())
    }

    fn os_error(call: &str) -> NiimprintError {
        NiimprintError::Transport(format!("{} failed: {}", call, io::Error::last_os_error()))
    }

}

// ============================================================================
// TESTS
// ============================================================================
