//! Event definitions
//!
//! Transient notifications derived from frames. Nothing buffers them.

use serde::{Deserialize, Serialize};

use crate::protocol::{Key, Led};

/// A semantic change observed on the keypad bus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A key was pressed on the keypad
    KeyPressed(Key),

    /// Operating mode changed; carries the mode label
    ModeChanged(String),

    /// Some LEDs switched; carries only the ones that changed
    LedsChanged(LedChanges),

    /// Display text changed
    DisplayChanged(String),
}

/// LEDs whose state changed between two status frames, in bit order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedChanges {
    changes: Vec<(Led, bool)>,
}

impl LedChanges {
    /// Compare two LED bitmasks; bits outside the LED table are ignored
    pub fn between(old: u8, new: u8) -> Self {
        let changes = Led::ALL
            .iter()
            .filter(|led| led.is_set(old) != led.is_set(new))
            .map(|&led| (led, led.is_set(new)))
            .collect();
        Self { changes }
    }

    /// New state of `led`, if it changed
    pub fn get(&self, led: Led) -> Option<bool> {
        self.changes
            .iter()
            .find(|(l, _)| *l == led)
            .map(|&(_, on)| on)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Led, bool)> + '_ {
        self.changes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl FromIterator<(Led, bool)> for LedChanges {
    fn from_iter<I: IntoIterator<Item = (Led, bool)>>(iter: I) -> Self {
        let mut changes: Vec<(Led, bool)> = iter.into_iter().collect();
        changes.sort_by_key(|(led, _)| *led);
        Self { changes }
    }
}
