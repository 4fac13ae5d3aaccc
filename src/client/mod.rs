//! # Printer Client
//!
//! [`PrinterClient`] owns one connection to one printer: the transport, the
//! reassembly buffer, and the retry policy. Every device operation is a
//! method on it, so there is never more than one request in flight and no
//! connection state outside the client.
//!
//! ## Module Structure
//!
//! - [`transceiver`]: send one request, poll for the correlated reply
//! - [`operations`]: named device operations and their reply decoding
//!
//! ## Usage Example
//!
//! ```no_run
//! use niimprint::client::PrinterClient;
//! use niimprint::protocol::InfoKey;
//! use niimprint::transport::RfcommSocket;
//!
//! let addr = "01:23:45:67:89:AB".parse()?;
//! let transport = RfcommSocket::connect(addr, 1)?;
//! let mut client = PrinterClient::new(transport);
//!
//! if let Some(version) = client.get_info(InfoKey::SoftVersion)? {
//!     println!("firmware {}", version);
//! }
//! # Ok::<(), niimprint::NiimprintError>(())
//! ```

pub mod operations;
pub mod transceiver;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::error::{NiimprintError, Result};
use crate::protocol::FrameBuffer;
use crate::transport::Transport;

/// Attempts the transceiver makes before giving up on a reply.
pub const DEFAULT_ATTEMPTS: u32 = 6;

/// Pause between receive attempts.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// Bytes requested from the transport per read.
pub const DEFAULT_READ_CHUNK: usize = 1024;

/// Retry policy for request/response exchanges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    pub attempts: u32,
    pub retry_interval: Duration,
    pub read_chunk: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            read_chunk: DEFAULT_READ_CHUNK,
        }
    }
}

/// Cooperative cancellation flag.
///
/// Cloning shares the flag. Cancelling does not interrupt a read in
/// progress; the next retry or status poll returns
/// [`NiimprintError::Cancelled`] instead of starting.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once [`cancel`](Self::cancel) has been called.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(NiimprintError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// A session with one printer.
pub struct PrinterClient<T> {
    transport: T,
    frames: FrameBuffer,
    config: ClientConfig,
    cancel: CancelToken,
}

impl<T: Transport> PrinterClient<T> {
    /// Wrap a connected transport with the default retry policy.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            frames: FrameBuffer::new(),
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Replace the cancellation token, e.g. with one shared with a signal
    /// handler.
    pub fn set_cancel_token(&mut self, cancel: CancelToken) {
        self.cancel = cancel;
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Release the transport. Unprocessed received bytes are dropped.
    pub fn into_inner(self) -> T {
        self.transport
    }
}
