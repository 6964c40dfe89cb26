//! # jablotron6x
//!
//! Protocol engine for Jablotron 6x alarm keypads (JA-80T serial cable):
//! - Terminator-delimited framing of an unbuffered byte stream
//! - Ordered, mask-filtered, short-circuiting handler chain
//! - Stateful diffing of status frames into key/mode/LED/display events
//! - Paced key transmission
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Transport (serial / memory)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ bytes
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Frame Assembler                           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ frames
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Handler Chain                             │
//! │          (registration order, first consumer wins)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Decoders   │          │    User     │
//!   │ (key/status)│          │  handlers   │
//!   └──────┬──────┘          └─────────────┘
//!          │ events
//!          ▼
//!   ┌─────────────┐
//!   │ Subscribers │ ──▶ Bridge
//!   └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use jablotron6x::{Config, Engine, SerialTransport};
//!
//! # fn main() -> jablotron6x::Result<()> {
//! let config = Config::builder().device("/dev/ttyUSB0").build()?;
//! let mut engine = Engine::new(SerialTransport::from_config(&config), config);
//! engine.on_mode_change(|mode| println!("mode: {}", mode));
//! engine.connect()?;
//! engine.send_keys("F06060")?;
//! loop {
//!     engine.poll()?;
//! }
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod chain;
pub mod handlers;
pub mod state;
pub mod transport;
pub mod engine;
pub mod bridge;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{JablotronError, Result};
pub use config::Config;
pub use engine::{Engine, Step};
pub use chain::{FrameHandler, Mask, Verdict};
pub use protocol::{Frame, Key, Led};
pub use state::{Event, LedChanges};
pub use transport::{MemoryTransport, SerialTransport, Transport};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of jablotron6x
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
