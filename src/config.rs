//! Configuration for jablotron6x
//!
//! Centralized configuration with sensible defaults.

use crate::error::{JablotronError, Result};
use crate::protocol::STATUS_FRAME_LEN;

/// Main configuration for an engine instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Serial Configuration
    // -------------------------------------------------------------------------
    /// Serial device where the JA-80T cable is connected
    pub device: String,

    /// Line speed (the keypad bus runs at 9600 8N1)
    pub baud_rate: u32,

    /// Read timeout (milliseconds); bounds every non-blocking read attempt
    pub read_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Keypad Configuration
    // -------------------------------------------------------------------------
    /// Delay between transmitted key codes (milliseconds)
    pub key_delay_ms: u64,

    // -------------------------------------------------------------------------
    // Framing Configuration
    // -------------------------------------------------------------------------
    /// Max in-flight frame length before the partial frame is dropped.
    /// 0 disables the bound.
    pub max_frame_len: usize,

    // -------------------------------------------------------------------------
    // Bridge Configuration
    // -------------------------------------------------------------------------
    /// Topic prefix for bridge publications and commands
    pub topic: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: "/dev/ttyUSB0".to_string(),
            baud_rate: 9600,
            read_timeout_ms: 100,
            key_delay_ms: 100,
            max_frame_len: 64,
            topic: "alarm".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the values can drive a real link
    pub fn validate(&self) -> Result<()> {
        if self.baud_rate == 0 {
            return Err(JablotronError::Config("baud rate must be non-zero".to_string()));
        }
        if self.read_timeout_ms == 0 {
            return Err(JablotronError::Config(
                "read timeout must be non-zero".to_string(),
            ));
        }
        // A smaller bound would drop every status frame before its terminator
        if self.max_frame_len != 0 && self.max_frame_len < STATUS_FRAME_LEN {
            return Err(JablotronError::Config(format!(
                "max frame length must be 0 or at least {}, got {}",
                STATUS_FRAME_LEN, self.max_frame_len
            )));
        }
        if self.topic.is_empty() || self.topic.ends_with('/') {
            return Err(JablotronError::Config(format!(
                "invalid topic prefix: {:?}",
                self.topic
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the serial device path
    pub fn device(mut self, device: impl Into<String>) -> Self {
        self.config.device = device.into();
        self
    }

    /// Set the line speed
    pub fn baud_rate(mut self, baud: u32) -> Self {
        self.config.baud_rate = baud;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the pacing between transmitted keys (in milliseconds)
    pub fn key_delay_ms(mut self, ms: u64) -> Self {
        self.config.key_delay_ms = ms;
        self
    }

    /// Set the in-flight frame bound (0 disables it)
    pub fn max_frame_len(mut self, len: usize) -> Self {
        self.config.max_frame_len = len;
        self
    }

    /// Set the bridge topic prefix
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.config.topic = topic.into();
        self
    }

    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
