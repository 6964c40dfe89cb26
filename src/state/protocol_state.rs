//! Protocol state
//!
//! Last-seen keypad status and the diffing that turns status frames into events.

use crate::protocol::{display_fallback, display_label, mode_fallback, mode_label, Frame};

use super::{Event, LedChanges};

/// Position of the mode byte in a status frame
const MODE_INDEX: usize = 1;
/// Position of the LED bitmask in a status frame
const LEDS_INDEX: usize = 2;
/// Position of the display code in a status frame
const DISPLAY_INDEX: usize = 3;

/// Keypad status as of the last status frame
///
/// Each field changes only when a status frame carries a different value,
/// so replaying the same frame yields no events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtocolState {
    mode: Option<u8>,
    leds: u8,
    display: Option<u8>,
}

impl ProtocolState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw mode byte, unset until the first status frame
    pub fn mode(&self) -> Option<u8> {
        self.mode
    }

    /// LED bitmask, 0 until the first status frame lights something
    pub fn leds(&self) -> u8 {
        self.leds
    }

    /// Raw display code, unset until the first status frame
    pub fn display(&self) -> Option<u8> {
        self.display
    }

    /// Diff a status frame against the stored state
    ///
    /// Mode, LEDs and display are checked independently, in that order, and
    /// each produces at most one event. Frames too short to hold all three
    /// fields are ignored.
    pub fn apply_status(&mut self, frame: &Frame) -> Vec<Event> {
        let (Some(mode), Some(leds), Some(code)) = (
            frame.get(MODE_INDEX),
            frame.get(LEDS_INDEX),
            frame.get(DISPLAY_INDEX),
        ) else {
            tracing::debug!("Status frame too short, ignoring: {}", frame);
            return Vec::new();
        };

        let mut events = Vec::with_capacity(3);

        if self.mode != Some(mode) {
            self.mode = Some(mode);
            let label = match mode_label(mode) {
                Some(label) => label.to_string(),
                None => {
                    tracing::error!("No mode label for {:02x}", mode);
                    mode_fallback(mode)
                }
            };
            tracing::debug!("Mode changed: {}", label);
            events.push(Event::ModeChanged(label));
        }

        if self.leds != leds {
            let changes = LedChanges::between(self.leds, leds);
            self.leds = leds;
            tracing::debug!("LEDs changed: {:?}", changes);
            events.push(Event::LedsChanged(changes));
        }

        if self.display != Some(code) {
            self.display = Some(code);
            let text = match display_label(code) {
                Some(text) => text.to_string(),
                None => {
                    tracing::error!("No display label for {:02x}", code);
                    display_fallback(code)
                }
            };
            tracing::debug!("Display changed: {:?}", text);
            events.push(Event::DisplayChanged(text));
        }

        events
    }
}
