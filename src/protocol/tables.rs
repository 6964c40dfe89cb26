//! Lookup tables
//!
//! Static mappings between wire codes and their meaning on the keypad.
//! Every lookup returns an explicit `Option`; misses are the caller's to handle.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Keys
// =============================================================================

/// A key on the keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
    /// `N`: cancel
    Cancel,
    /// `F`: function / confirm
    Function,
}

impl Key {
    /// All keys in code order
    pub const ALL: [Key; 12] = [
        Key::Digit0,
        Key::Digit1,
        Key::Digit2,
        Key::Digit3,
        Key::Digit4,
        Key::Digit5,
        Key::Digit6,
        Key::Digit7,
        Key::Digit8,
        Key::Digit9,
        Key::Cancel,
        Key::Function,
    ];

    /// Wire code sent and received for this key
    pub fn code(self) -> u8 {
        match self {
            Key::Digit0 => 0x80,
            Key::Digit1 => 0x81,
            Key::Digit2 => 0x82,
            Key::Digit3 => 0x83,
            Key::Digit4 => 0x84,
            Key::Digit5 => 0x85,
            Key::Digit6 => 0x86,
            Key::Digit7 => 0x87,
            Key::Digit8 => 0x88,
            Key::Digit9 => 0x89,
            Key::Cancel => 0x8E,
            Key::Function => 0x8F,
        }
    }

    pub fn from_code(code: u8) -> Option<Key> {
        match code {
            0x80..=0x89 => Some(Key::ALL[(code - 0x80) as usize]),
            0x8E => Some(Key::Cancel),
            0x8F => Some(Key::Function),
            _ => None,
        }
    }

    pub fn from_char(c: char) -> Option<Key> {
        match c {
            '0'..='9' => Some(Key::ALL[c as usize - '0' as usize]),
            'N' => Some(Key::Cancel),
            'F' => Some(Key::Function),
            _ => None,
        }
    }

    /// Character printed on the key
    pub fn as_char(self) -> char {
        match self {
            Key::Cancel => 'N',
            Key::Function => 'F',
            // Digit codes are contiguous from 0x80
            digit => char::from(b'0' + (digit.code() - 0x80)),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

// =============================================================================
// LEDs
// =============================================================================

/// An indicator in the status frame LED bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Led {
    Power,
    Alarm,
    Tamper,
    Lock,
    BlinkingLock,
    Wireless,
}

impl Led {
    /// All LEDs in bit order
    pub const ALL: [Led; 6] = [
        Led::Power,
        Led::Alarm,
        Led::Tamper,
        Led::Lock,
        Led::BlinkingLock,
        Led::Wireless,
    ];

    pub fn bit(self) -> u8 {
        match self {
            Led::Power => 0x01,
            Led::Alarm => 0x02,
            Led::Tamper => 0x04,
            // 0x08 is unassigned
            Led::Lock => 0x10,
            Led::BlinkingLock => 0x20,
            Led::Wireless => 0x40,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Led::Power => "power",
            Led::Alarm => "alarm",
            Led::Tamper => "tamper",
            Led::Lock => "lock",
            Led::BlinkingLock => "blinking_lock",
            Led::Wireless => "wireless",
        }
    }

    /// Whether this LED is lit in `mask`
    pub fn is_set(self, mask: u8) -> bool {
        mask & self.bit() != 0
    }
}

impl fmt::Display for Led {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Modes
// =============================================================================

/// Label for an operating mode byte
///
/// The A/B variants are reported by the panel as distinct bytes; what the
/// suffix stands for is not known.
pub fn mode_label(mode: u8) -> Option<&'static str> {
    match mode {
        0x00 => Some("service mode"),
        0x20 => Some("user mode"),
        0x40 => Some("disarmed"),
        0x41 => Some("armed"),
        0x44 => Some("tamper alarm"),
        0x51 => Some("arming"),
        0x61 => Some("armedA"),
        0x63 => Some("armedB"),
        0x71 => Some("armingA"),
        0x73 => Some("armingB"),
        _ => None,
    }
}

/// Label used for a mode byte missing from the table
pub fn mode_fallback(mode: u8) -> String {
    format!("Mode {:02x}", mode)
}

// =============================================================================
// Display
// =============================================================================

/// Two-character text shown on the keypad display for a display code
pub fn display_label(code: u8) -> Option<&'static str> {
    let text = match code {
        0x01 => " 1",
        0x02 => " 2",
        0x03 => " 3",
        0x04 => " 4",
        0x05 => " 5",
        0x06 => " 6",
        0x07 => " 7",
        0x08 => " 8",
        0x09 => " 9",
        0x0A => "10",
        0x0B => "11",
        0x0C => "12",
        0x0D => "13",
        0x0E => "14",
        0x0F => "15",
        0x10 => "16",
        0x11 => " A",
        0x13 => " C",
        0x14 => " d",
        0x17 => " U",
        0x1A => " P",
        0x1C => " L",
        0x1D => " J",
        0x21 => "c1",
        0x22 => "c2",
        0x23 => "c3",
        0x24 => "c4",
        0x25 => "c5",
        0x26 => "c6",
        0x27 => "c7",
        0x28 => "c8",
        0x59 => "  ",
        0x5B => " -",
        0x5E => "| ",
        0x5F => " |",
        _ => return None,
    };
    Some(text)
}

/// Label used for a display code missing from the table
pub fn display_fallback(code: u8) -> String {
    format!("{:02x}", code)
}
