//! Frame assembler
//!
//! Accumulates an unbuffered byte stream into terminator-delimited frames.
//! No shape validation happens here: anything before a terminator is a frame,
//! and handlers reject what they don't understand.

use bytes::BytesMut;

use super::frame::{Frame, TERMINATOR};

/// Accumulates bytes until the terminator arrives
///
/// Holds at most one in-flight frame. A partial frame survives across empty
/// reads and resumes on the next byte.
pub struct FrameAssembler {
    /// In-flight frame bytes
    buffer: BytesMut,

    /// Drop the partial frame after this many bytes without a terminator (0 = unbounded)
    max_len: usize,
}

impl FrameAssembler {
    /// Create an assembler with the given in-flight bound
    pub fn new(max_len: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(if max_len > 0 { max_len } else { 32 }),
            max_len,
        }
    }

    /// Create an assembler that never drops a partial frame
    pub fn unbounded() -> Self {
        Self::new(0)
    }

    /// Append one byte; returns the frame it completes, if any
    pub fn feed(&mut self, byte: u8) -> Option<Frame> {
        if byte != TERMINATOR && self.max_len > 0 && self.buffer.len() + 1 >= self.max_len {
            tracing::warn!(
                "No terminator within {} bytes, dropping partial frame",
                self.max_len
            );
            self.buffer.clear();
        }

        self.buffer.extend_from_slice(&[byte]);

        if byte == TERMINATOR {
            let frame = Frame::new(self.buffer.split().freeze());
            tracing::trace!("Frame complete: {}", frame);
            return Some(frame);
        }

        None
    }

    /// Append a chunk; returns every frame it completes, in order
    pub fn push(&mut self, bytes: &[u8]) -> Vec<Frame> {
        bytes.iter().filter_map(|&b| self.feed(b)).collect()
    }

    /// Discard the in-flight frame
    pub fn reset(&mut self) {
        if !self.buffer.is_empty() {
            tracing::debug!("Discarding {} buffered bytes", self.buffer.len());
        }
        self.buffer.clear();
    }

    /// Number of bytes of the in-flight frame
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::unbounded()
    }
}
