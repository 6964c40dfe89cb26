//! In-memory transport
//!
//! Scripted byte source/sink for tests and replaying captured traffic.

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{JablotronError, Result};

use super::Transport;

#[derive(Default)]
struct Shared {
    inbound: VecDeque<u8>,
    writes: Vec<Vec<u8>>,
    flushes: usize,
    open: bool,
    read_error: Option<io::ErrorKind>,
}

/// Transport backed by in-memory buffers
///
/// Keep a [`MemoryHandle`] to feed inbound bytes and inspect what was written
/// after the transport has been moved into an engine.
pub struct MemoryTransport {
    shared: Arc<Mutex<Shared>>,
}

/// Test-side view of a [`MemoryTransport`]
#[derive(Clone)]
pub struct MemoryHandle {
    shared: Arc<Mutex<Shared>>,
}

impl MemoryTransport {
    pub fn new() -> (Self, MemoryHandle) {
        let shared = Arc::new(Mutex::new(Shared::default()));
        (
            Self {
                shared: Arc::clone(&shared),
            },
            MemoryHandle { shared },
        )
    }
}

impl Transport for MemoryTransport {
    fn open(&mut self) -> Result<()> {
        self.shared.lock().open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.shared.lock().open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.shared.lock().open
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut shared = self.shared.lock();
        if !shared.open {
            return Err(JablotronError::NotConnected);
        }
        if let Some(kind) = shared.read_error.take() {
            return Err(io::Error::new(kind, "injected read failure").into());
        }
        Ok(shared.inbound.pop_front())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let mut shared = self.shared.lock();
        if !shared.open {
            return Err(JablotronError::NotConnected);
        }
        shared.writes.push(bytes.to_vec());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let mut shared = self.shared.lock();
        if !shared.open {
            return Err(JablotronError::NotConnected);
        }
        shared.flushes += 1;
        Ok(())
    }
}

impl MemoryHandle {
    /// Queue bytes for the engine to read
    pub fn push_inbound(&self, bytes: &[u8]) {
        self.shared.lock().inbound.extend(bytes.iter().copied());
    }

    /// Bytes queued but not yet read
    pub fn inbound_len(&self) -> usize {
        self.shared.lock().inbound.len()
    }

    /// Every write call, in order
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.shared.lock().writes.clone()
    }

    /// All written bytes, concatenated
    pub fn written(&self) -> Vec<u8> {
        self.shared.lock().writes.concat()
    }

    pub fn flush_count(&self) -> usize {
        self.shared.lock().flushes
    }

    pub fn is_open(&self) -> bool {
        self.shared.lock().open
    }

    /// Make the next read fail with `kind`
    pub fn fail_next_read(&self, kind: io::ErrorKind) {
        self.shared.lock().read_error = Some(kind);
    }
}
