//! Command definitions
//!
//! Inbound requests from the home-automation bus.

use crate::error::{JablotronError, Result};

/// Topic suffix for key press requests
pub const KEY_PRESS_TOPIC: &str = "key/press";

/// A parsed inbound command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Press a sequence of keys, e.g. `F06060`
    KeyPress { keys: String },
}

impl Command {
    /// Parse a message received on `topic` under `prefix`
    pub fn parse(prefix: &str, topic: &str, payload: &str) -> Result<Command> {
        let suffix = topic
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| {
                JablotronError::Bridge(format!("topic {:?} is not under {:?}", topic, prefix))
            })?;

        match suffix {
            KEY_PRESS_TOPIC => Ok(Command::KeyPress {
                keys: payload.trim().to_string(),
            }),
            _ => Err(JablotronError::Bridge(format!("unknown command topic: {}", topic))),
        }
    }

    /// Topics a bridge under `prefix` should listen on
    pub fn topics(prefix: &str) -> Vec<String> {
        vec![format!("{}/{}", prefix, KEY_PRESS_TOPIC)]
    }
}
