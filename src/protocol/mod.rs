//! Protocol Module
//!
//! Wire format of the Jablotron 6x keypad bus (JA-80T cable).
//!
//! ## Frame Format
//! ```text
//! ┌──────────────────────────────┬──────────┐
//! │        Body (0..n)           │ FF (1)   │
//! └──────────────────────────────┴──────────┘
//! ```
//!
//! ### Known Frames
//! - `8x FF`: key press, `x` selects the key (0-9, E = N, F = F)
//! - `E0 mode leds display .. FF`: keypad status; the byte before the
//!   terminator is a checksum
//!
//! Everything else is passed through to registered handlers as-is.

mod assembler;
mod frame;
mod tables;

pub use assembler::FrameAssembler;
pub use frame::{Frame, STATUS_FRAME_LEN, STATUS_MARKER, TERMINATOR};
pub use tables::{display_fallback, display_label, mode_fallback, mode_label, Key, Led};
