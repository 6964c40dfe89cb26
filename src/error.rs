//! Error types for jablotron6x
//!
//! Provides a unified error type for all operations. Unknown key, mode and
//! display codes are not errors: they are logged and recovered locally.

use thiserror::Error;

/// Result type alias using JablotronError
pub type Result<T> = std::result::Result<T, JablotronError>;

/// Unified error type for jablotron6x operations
#[derive(Debug, Error)]
pub enum JablotronError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("Transport not connected")]
    NotConnected,

    // -------------------------------------------------------------------------
    // Command Errors
    // -------------------------------------------------------------------------
    #[error("Invalid keys: {keys:?} (first invalid character {invalid:?})")]
    InvalidKeys { keys: String, invalid: char },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Bridge Errors
    // -------------------------------------------------------------------------
    #[error("Bridge error: {0}")]
    Bridge(String),
}
