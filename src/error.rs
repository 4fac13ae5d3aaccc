//! # Error Types
//!
//! This module defines error types used throughout the niimprint library.
//!
//! Operation-scoped variants carry the [`Command`] that failed, so a caller
//! sees `set_label_type: rejected by printer` rather than a bare failure.

use thiserror::Error;

use crate::protocol::command::Command;

/// Main error type for niimprint operations
#[derive(Debug, Error)]
pub enum NiimprintError {
    /// Malformed or truncated frame
    #[error("Frame error: {0}")]
    Frame(String),

    /// Packet payload does not fit the single-byte length field
    #[error("Payload too large: {len} bytes (max 255)")]
    PayloadTooLarge { len: usize },

    /// The printer answered with a NAK
    #[error("{command}: rejected by printer")]
    Rejected { command: Command },

    /// The printer firmware does not implement the command
    #[error("{command}: not supported by printer firmware")]
    Unsupported { command: Command },

    /// No correlated reply within the retry budget
    #[error("{command}: no response from printer")]
    Timeout { command: Command },

    /// A correlated reply arrived but its payload has an unexpected shape
    #[error("{command}: malformed reply ({reason})")]
    MalformedReply { command: Command, reason: String },

    /// Caller supplied an out-of-range argument
    #[error("Invalid argument: {0}")]
    Precondition(String),

    /// The printer never reported the requested number of pages
    #[error("Print job incomplete: {printed} of {requested} pages reported")]
    JobIncomplete { printed: u16, requested: u16 },

    /// Cooperative cancellation was requested
    #[error("Operation cancelled")]
    Cancelled,

    /// Transport-level errors (connection, I/O)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Image processing error
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for niimprint operations.
pub type Result<T> = std::result::Result<T, NiimprintError>;
