//! Bridge Module
//!
//! Translation between engine events and a home-automation message bus.
//! No bus client lives here: publications are handed to a channel and the
//! host decides where they go.
//!
//! ## Topics (under the configured prefix)
//! - `key`: pressed key, or `Error: invalid key`
//! - `mode` (retained): panel state (`armed_home`, `armed_away`, `pending`,
//!   `triggered`, `disarmed`)
//! - `leds/<name>` (retained): `1` / `0`, one per changed LED
//! - `display` (retained): display text
//! - `raw`: hex dump of frames, when enabled
//! - `online` (retained): `1` / `0`
//! - `key/press` (inbound): keys to press

mod command;
mod publication;
mod translator;

pub use command::{Command, KEY_PRESS_TOPIC};
pub use publication::{panel_state, Publication};
pub use translator::Bridge;
