//! Utility handlers
//!
//! Ready-made registrations for the handler chain. None of them is special:
//! their effect depends entirely on where they are registered.

use crate::chain::{FrameHandler, Verdict};
use crate::protocol::Frame;

/// Logs every frame it sees as hex; never consumes
///
/// Usually registered last with an empty mask.
#[derive(Default)]
pub struct RawFrameLogger {
    sink: Option<Box<dyn FnMut(&str) + Send>>,
}

impl RawFrameLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also hand each formatted line to `sink`
    pub fn with_sink<F>(sink: F) -> Self
    where
        F: FnMut(&str) + Send + 'static,
    {
        Self {
            sink: Some(Box::new(sink)),
        }
    }
}

impl FrameHandler for RawFrameLogger {
    fn handle(&mut self, frame: &Frame) -> Verdict {
        let line = frame.to_string();
        tracing::info!(target: "jablotron6x::raw", "{}", line);
        if let Some(sink) = self.sink.as_mut() {
            sink(&line);
        }
        Verdict::NotConsumed
    }
}

/// Consumes every frame it sees
///
/// Cuts the chain short for whatever mask it is registered with.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsumeAll;

impl FrameHandler for ConsumeAll {
    fn handle(&mut self, _frame: &Frame) -> Verdict {
        Verdict::Consumed
    }
}

/// Swallows retransmitted status frames
///
/// The panel repeats identical status frames. A frame is treated as a repeat
/// when its second-to-last byte (the checksum) equals the one seen last time.
/// Distinct frames sharing a checksum are swallowed too.
#[derive(Debug, Default)]
pub struct DuplicateSuppressor {
    last_checksum: u8,
}

impl DuplicateSuppressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checksum remembered from the previous frame
    pub fn last_checksum(&self) -> u8 {
        self.last_checksum
    }
}

impl FrameHandler for DuplicateSuppressor {
    fn handle(&mut self, frame: &Frame) -> Verdict {
        let Some(checksum) = frame.len().checked_sub(2).and_then(|i| frame.get(i)) else {
            return Verdict::NotConsumed;
        };

        if checksum == self.last_checksum {
            tracing::trace!("Suppressing repeated frame {}", frame);
            return Verdict::Consumed;
        }

        self.last_checksum = checksum;
        Verdict::NotConsumed
    }
}
