//! Transport Module
//!
//! Byte source/sink the engine drives.
//!
//! ## Contract
//! - `read_byte` never blocks longer than a short timeout and returns
//!   `Ok(None)` when nothing arrived
//! - Errors are surfaced to the caller; the engine never retries

mod memory;
mod serial;

pub use memory::{MemoryHandle, MemoryTransport};
pub use serial::SerialTransport;

use crate::error::Result;

/// A byte-oriented link to the keypad bus
pub trait Transport {
    /// Acquire the underlying device
    fn open(&mut self) -> Result<()>;

    /// Release the underlying device
    fn close(&mut self) -> Result<()>;

    fn is_open(&self) -> bool;

    /// Read one byte, or `None` if none arrived within the read timeout
    fn read_byte(&mut self) -> Result<Option<u8>>;

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    fn flush(&mut self) -> Result<()>;
}
