//! Chain Module
//!
//! The callback chain every completed frame is dispatched through.
//!
//! ## Dispatch Rules
//! - Registrations run in the order they were added
//! - A registration runs only if its mask matches the frame prefix
//! - The first handler reporting `Consumed` ends dispatch
//!
//! Built-in decoders, loggers and the duplicate suppressor are ordinary
//! registrations, so registration order decides what each of them sees.

mod mask;
mod registry;

pub use mask::Mask;
pub use registry::{DispatchOutcome, FrameHandler, HandlerChain, Verdict};
