//! Serial transport
//!
//! Talks to the JA-80T cable through a local serial port.

use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::config::Config;
use crate::error::{JablotronError, Result};

use super::Transport;

/// Serial port link, 8N1 at the configured baud rate
pub struct SerialTransport {
    /// Device path, e.g. `/dev/ttyUSB0`
    device: String,

    baud_rate: u32,

    /// Bound on every read attempt
    read_timeout: Duration,

    /// Open port, if connected
    port: Option<Box<dyn SerialPort>>,
}

impl SerialTransport {
    /// Create an unopened transport
    pub fn new(device: impl Into<String>, baud_rate: u32, read_timeout: Duration) -> Self {
        Self {
            device: device.into(),
            baud_rate,
            read_timeout,
            port: None,
        }
    }

    /// Create an unopened transport from the serial section of `config`
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.device.clone(),
            config.baud_rate,
            Duration::from_millis(config.read_timeout_ms),
        )
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    fn port_mut(&mut self) -> Result<&mut Box<dyn SerialPort>> {
        self.port.as_mut().ok_or(JablotronError::NotConnected)
    }
}

impl Transport for SerialTransport {
    fn open(&mut self) -> Result<()> {
        if self.port.is_some() {
            return Ok(());
        }

        let mut port = serialport::new(&self.device, self.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(self.read_timeout)
            .open()?;

        // JA-80T expects DTR asserted
        port.write_data_terminal_ready(true)?;

        tracing::info!("Opened {} at {} baud", self.device, self.baud_rate);
        self.port = Some(port);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.port.take().is_some() {
            tracing::info!("Closed {}", self.device);
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let port = self.port_mut()?;
        let mut buf = [0u8; 1];

        match port.read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(ref e) if e.kind() == ErrorKind::TimedOut => Ok(None),
            // Some platforms report an empty non-blocking read as WouldBlock
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(ref e) if e.kind() == ErrorKind::Interrupted => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let port = self.port_mut()?;
        port.write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let port = self.port_mut()?;
        port.flush()?;
        Ok(())
    }
}
