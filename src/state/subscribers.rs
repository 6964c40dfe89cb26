//! Event subscribers
//!
//! One optional slot per event kind. Setting a slot replaces its previous
//! subscriber; events for an empty slot are dropped.

use crate::protocol::Key;

use super::{Event, LedChanges};

type KeySlot = Option<Box<dyn FnMut(Key) + Send>>;
type TextSlot = Option<Box<dyn FnMut(&str) + Send>>;
type LedSlot = Option<Box<dyn FnMut(&LedChanges) + Send>>;

/// Single-subscriber slots for key, mode, LED and display events
#[derive(Default)]
pub struct Subscribers {
    key_press: KeySlot,
    mode_change: TextSlot,
    led_change: LedSlot,
    display_change: TextSlot,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_on_key_press<F>(&mut self, f: F)
    where
        F: FnMut(Key) + Send + 'static,
    {
        self.key_press = Some(Box::new(f));
    }

    pub fn set_on_mode_change<F>(&mut self, f: F)
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.mode_change = Some(Box::new(f));
    }

    pub fn set_on_led_change<F>(&mut self, f: F)
    where
        F: FnMut(&LedChanges) + Send + 'static,
    {
        self.led_change = Some(Box::new(f));
    }

    pub fn set_on_display_change<F>(&mut self, f: F)
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.display_change = Some(Box::new(f));
    }

    pub fn clear_on_key_press(&mut self) {
        self.key_press = None;
    }

    pub fn clear_on_mode_change(&mut self) {
        self.mode_change = None;
    }

    pub fn clear_on_led_change(&mut self) {
        self.led_change = None;
    }

    pub fn clear_on_display_change(&mut self) {
        self.display_change = None;
    }

    /// Deliver an event to its slot; returns whether anyone received it
    pub fn emit(&mut self, event: &Event) -> bool {
        match event {
            Event::KeyPressed(key) => self.key_press.as_mut().map(|f| f(*key)).is_some(),
            Event::ModeChanged(mode) => {
                self.mode_change.as_mut().map(|f| f(mode.as_str())).is_some()
            }
            Event::LedsChanged(changes) => {
                self.led_change.as_mut().map(|f| f(changes)).is_some()
            }
            Event::DisplayChanged(text) => {
                self.display_change.as_mut().map(|f| f(text.as_str())).is_some()
            }
        }
    }
}
