//! State Module
//!
//! Derived keypad state and the events raised when it changes.
//!
//! ## Responsibilities
//! - Remember the last mode byte, LED bitmask and display code
//! - Diff status frames and raise an event per changed field
//! - Deliver events to single-slot subscribers

mod events;
mod protocol_state;
mod subscribers;

pub use events::{Event, LedChanges};
pub use protocol_state::ProtocolState;
pub use subscribers::Subscribers;
