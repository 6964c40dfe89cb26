//! Engine Module
//!
//! The protocol engine that ties transport, framing, dispatch and state together.
//!
//! ## Responsibilities
//! - Drain bytes from the transport and assemble frames
//! - Dispatch every frame through the handler chain
//! - Decode key presses and status frames into events
//! - Transmit key sequences with hardware pacing
//!
//! ## Lifecycle
//! ```text
//! disconnected ──connect()──▶ connected ──poll()/run()──▶ running
//!      ▲                                                    │
//!      └────────────── disconnect() / I/O error ────────────┘
//! ```
//! Connection state lives in the transport; the engine only delegates.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::chain::{DispatchOutcome, FrameHandler, HandlerChain, Mask, Verdict};
use crate::config::Config;
use crate::error::{JablotronError, Result};
use crate::protocol::{Frame, FrameAssembler, Key, STATUS_MARKER};
use crate::state::{Event, LedChanges, ProtocolState, Subscribers};
use crate::transport::Transport;

/// Decoders the engine registers on itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Builtin {
    KeyPress,
    Status,
}

/// State touched by the built-in decoders
///
/// Kept apart from the chain so dispatch can borrow both at once.
#[derive(Default)]
struct Decoder {
    state: ProtocolState,
    subscribers: Subscribers,
}

impl Decoder {
    fn handle(&mut self, builtin: Builtin, frame: &Frame) -> Verdict {
        match builtin {
            Builtin::KeyPress => self.decode_key(frame),
            Builtin::Status => self.decode_status(frame),
        }
    }

    /// Unknown codes are ignored; the frame is never consumed
    fn decode_key(&mut self, frame: &Frame) -> Verdict {
        if let Some(key) = frame.first().and_then(Key::from_code) {
            tracing::debug!("Key pressed: {}", key);
            self.subscribers.emit(&Event::KeyPressed(key));
        }
        Verdict::NotConsumed
    }

    fn decode_status(&mut self, frame: &Frame) -> Verdict {
        for event in self.state.apply_status(frame) {
            self.subscribers.emit(&event);
        }
        Verdict::NotConsumed
    }
}

/// Result of a single [`Engine::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// No byte arrived within the read timeout
    Idle,
    /// A byte was buffered; the frame is still incomplete
    Pending,
    /// A frame completed and was dispatched
    Dispatched(DispatchOutcome),
}

/// Protocol engine for one keypad bus
///
/// ## Concurrency Model: Single Owner
///
/// Everything runs synchronously on the caller's thread: reads are bounded
/// by the transport timeout and handlers run in-line during dispatch. The
/// engine has no internal locking; hosts sharing it across threads must
/// serialize access themselves.
pub struct Engine<T: Transport> {
    /// Engine configuration
    config: Config,

    /// Byte source/sink
    transport: T,

    /// In-flight frame
    assembler: FrameAssembler,

    /// Ordered handler registrations
    chain: HandlerChain<Builtin>,

    /// Protocol state and event subscribers
    decoder: Decoder,
}

impl<T: Transport> Engine<T> {
    /// Create an engine over an unopened transport
    ///
    /// Registers the built-in decoders: one key-press registration per keypad
    /// code, then the status decoder for frames starting with `0xE0`.
    pub fn new(transport: T, config: Config) -> Self {
        let mut engine = Self::without_builtins(transport, config);
        engine.register_key_decoder().register_status_decoder();
        engine
    }

    /// Create an engine with an empty chain
    ///
    /// Use this to place the built-in decoders at a chosen position, e.g.
    /// after a duplicate suppressor.
    pub fn without_builtins(transport: T, config: Config) -> Self {
        Self {
            assembler: FrameAssembler::new(config.max_frame_len),
            config,
            transport,
            chain: HandlerChain::new(),
            decoder: Decoder::default(),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Open the transport
    pub fn connect(&mut self) -> Result<&mut Self> {
        self.transport.open()?;
        tracing::debug!("Engine connected");
        Ok(self)
    }

    /// Flush and close the transport; any partial frame is discarded
    pub fn disconnect(&mut self) -> Result<&mut Self> {
        self.assembler.reset();
        if self.transport.is_open() {
            self.transport.flush()?;
            self.transport.close()?;
            tracing::debug!("Engine disconnected");
        }
        Ok(self)
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_open()
    }

    // =========================================================================
    // Handler Registration
    // =========================================================================

    /// Append a handler to the chain
    ///
    /// It sees every frame whose prefix matches `mask` and that no earlier
    /// handler consumed.
    pub fn register_handler<H>(&mut self, handler: H, mask: impl Into<Mask>) -> &mut Self
    where
        H: FrameHandler + Send + 'static,
    {
        let index = self.chain.register(handler, mask);
        tracing::debug!("Registered handler #{}", index);
        self
    }

    /// Append the key-press decoder, one registration per keypad code
    pub fn register_key_decoder(&mut self) -> &mut Self {
        for key in Key::ALL {
            self.chain.register_builtin(Builtin::KeyPress, [key.code()]);
        }
        self
    }

    /// Append the status decoder for frames starting with `0xE0`
    pub fn register_status_decoder(&mut self) -> &mut Self {
        self.chain.register_builtin(Builtin::Status, [STATUS_MARKER]);
        self
    }

    /// Number of registrations, built-ins included
    pub fn handler_count(&self) -> usize {
        self.chain.len()
    }

    // =========================================================================
    // Event Subscription
    // =========================================================================

    pub fn subscribers_mut(&mut self) -> &mut Subscribers {
        &mut self.decoder.subscribers
    }

    /// Replace the key-press subscriber
    pub fn on_key_press<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(Key) + Send + 'static,
    {
        self.decoder.subscribers.set_on_key_press(f);
        self
    }

    /// Replace the mode-change subscriber
    pub fn on_mode_change<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.decoder.subscribers.set_on_mode_change(f);
        self
    }

    /// Replace the LED-change subscriber
    pub fn on_led_change<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(&LedChanges) + Send + 'static,
    {
        self.decoder.subscribers.set_on_led_change(f);
        self
    }

    /// Replace the display-change subscriber
    pub fn on_display_change<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.decoder.subscribers.set_on_display_change(f);
        self
    }

    // =========================================================================
    // Receiving
    // =========================================================================

    /// Read at most one byte and dispatch the frame it completes
    pub fn step(&mut self) -> Result<Step> {
        let Some(byte) = self.transport.read_byte()? else {
            return Ok(Step::Idle);
        };

        match self.assembler.feed(byte) {
            Some(frame) => Ok(Step::Dispatched(self.dispatch(&frame))),
            None => Ok(Step::Pending),
        }
    }

    /// Process every byte currently available
    ///
    /// Returns the number of frames dispatched. Stops when a read times out
    /// or the transport is closed.
    pub fn poll(&mut self) -> Result<usize> {
        let mut dispatched = 0;

        while self.transport.is_open() {
            match self.step()? {
                Step::Idle => break,
                Step::Pending => {}
                Step::Dispatched(_) => dispatched += 1,
            }
        }

        Ok(dispatched)
    }

    /// Process bytes until `stop` is set
    ///
    /// The flag is checked between reads. Transport errors end the loop and
    /// are returned; reconnecting is up to the caller.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<()> {
        while !stop.load(Ordering::Relaxed) {
            if !self.transport.is_open() {
                return Err(JablotronError::NotConnected);
            }
            self.step()?;
        }
        Ok(())
    }

    /// Process bytes that did not come through the transport
    ///
    /// Returns the number of frames dispatched.
    pub fn feed(&mut self, bytes: &[u8]) -> usize {
        let frames = self.assembler.push(bytes);
        for frame in &frames {
            self.dispatch(frame);
        }
        frames.len()
    }

    /// Run one complete frame through the handler chain
    pub fn dispatch(&mut self, frame: &Frame) -> DispatchOutcome {
        let decoder = &mut self.decoder;
        let outcome = self
            .chain
            .dispatch(frame, |builtin, frame| decoder.handle(*builtin, frame));
        tracing::trace!(
            "Dispatched {} to {} handler(s), consumed_by={:?}",
            frame,
            outcome.invoked,
            outcome.consumed_by
        );
        outcome
    }

    // =========================================================================
    // Sending
    // =========================================================================

    /// Write raw bytes and flush
    pub fn send(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        self.transport.write_bytes(bytes)?;
        self.transport.flush()?;
        Ok(self)
    }

    /// Press keys on the keypad
    ///
    /// `keys` may contain `0`-`9`, `N` and `F`. The whole sequence is checked
    /// before anything is sent, so an invalid character transmits nothing.
    /// Each key is followed by the configured pacing delay.
    pub fn send_keys(&mut self, keys: &str) -> Result<&mut Self> {
        let codes = keys
            .chars()
            .map(|c| {
                Key::from_char(c).map(Key::code).ok_or_else(|| JablotronError::InvalidKeys {
                    keys: keys.to_string(),
                    invalid: c,
                })
            })
            .collect::<Result<Vec<u8>>>()?;

        tracing::debug!("Sending keys: {}", keys);
        let delay = Duration::from_millis(self.config.key_delay_ms);
        for code in codes {
            self.send(&[code])?;
            if !delay.is_zero() {
                thread::sleep(delay);
            }
        }

        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Last mode byte seen in a status frame
    pub fn mode(&self) -> Option<u8> {
        self.decoder.state.mode()
    }

    /// Last LED bitmask seen in a status frame
    pub fn leds(&self) -> u8 {
        self.decoder.state.leds()
    }

    /// Last display code seen in a status frame
    pub fn display(&self) -> Option<u8> {
        self.decoder.state.display()
    }

    pub fn state(&self) -> &ProtocolState {
        &self.decoder.state
    }

    /// Bytes of the frame currently being assembled
    pub fn pending_bytes(&self) -> usize {
        self.assembler.pending()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> Drop for Engine<T> {
    fn drop(&mut self) {
        if let Err(e) = self.disconnect() {
            tracing::warn!("Error closing transport: {}", e);
        }
    }
}
