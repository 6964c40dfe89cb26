//! Frame definitions
//!
//! A frame is everything received up to and including the terminator.

use std::fmt;

use bytes::Bytes;

/// Byte that ends every frame
pub const TERMINATOR: u8 = 0xFF;

/// Leading byte of a status frame
pub const STATUS_MARKER: u8 = 0xE0;

/// Length of a status frame: marker, mode, LEDs, display, checksum, terminator
pub const STATUS_FRAME_LEN: usize = 6;

/// A complete frame, terminator included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Bytes,
}

impl Frame {
    /// Wrap already-delimited bytes
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Raw frame bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Byte at position `index`, if present
    pub fn get(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).copied()
    }

    /// Leading byte
    pub fn first(&self) -> Option<u8> {
        self.get(0)
    }

    /// Whether this frame carries keypad status (mode, LEDs, display)
    pub fn is_status(&self) -> bool {
        self.first() == Some(STATUS_MARKER)
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Space-separated lowercase hex pairs
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
