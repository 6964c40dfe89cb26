//! Publication definitions
//!
//! Outbound messages produced from engine events.

use serde::{Deserialize, Serialize};

/// A message for the home-automation bus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    /// Full topic, prefix included
    pub topic: String,

    /// Text payload
    pub payload: String,

    /// Whether the bus should keep it as the topic's last value
    pub retain: bool,
}

impl Publication {
    /// Create a transient publication
    pub fn new(topic: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
            retain: false,
        }
    }

    /// Create a retained publication
    pub fn retained(topic: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            retain: true,
            ..Self::new(topic, payload)
        }
    }
}

/// Alarm panel state understood by home-automation panels
///
/// First matching rule wins.
pub fn panel_state(mode: &str) -> &'static str {
    if mode == "armedA" {
        "armed_home"
    } else if mode.starts_with("armed") {
        "armed_away"
    } else if mode.starts_with("arming") {
        "pending"
    } else if mode.contains("alarm") {
        "triggered"
    } else {
        "disarmed"
    }
}
