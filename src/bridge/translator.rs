//! Bridge
//!
//! Turns engine events into publications and inbound commands into key presses.

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam::channel::{Receiver, Sender};

use crate::chain::Mask;
use crate::engine::{Engine, Step};
use crate::error::{JablotronError, Result};
use crate::handlers::RawFrameLogger;
use crate::transport::Transport;

use super::{panel_state, Command, Publication};

/// Sends publications for one topic prefix over a channel
#[derive(Clone)]
pub struct Bridge {
    /// Topic prefix, without trailing `/`
    prefix: String,

    /// Where publications go
    tx: Sender<Publication>,
}

impl Bridge {
    pub fn new(prefix: impl Into<String>, tx: Sender<Publication>) -> Self {
        Self {
            prefix: prefix.into(),
            tx,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn topic(&self, suffix: &str) -> String {
        format!("{}/{}", self.prefix, suffix)
    }

    /// Queue a publication
    pub fn publish(&self, publication: Publication) -> Result<()> {
        self.tx
            .send(publication)
            .map_err(|e| JablotronError::Bridge(format!("publication channel closed: {}", e)))
    }

    /// Queue a publication from inside an engine callback, where errors can't propagate
    fn publish_or_warn(&self, publication: Publication) {
        if let Err(e) = self.publish(publication) {
            tracing::warn!("{}", e);
        }
    }

    /// Subscribe to all four engine events
    ///
    /// Replaces any subscribers already set on the engine.
    pub fn attach<T: Transport>(&self, engine: &mut Engine<T>) {
        let bridge = self.clone();
        engine.on_key_press(move |key| {
            tracing::debug!("Alarm registered key press: {}", key);
            bridge.publish_or_warn(Publication::new(bridge.topic("key"), key.to_string()));
        });

        let bridge = self.clone();
        engine.on_mode_change(move |mode| {
            let state = panel_state(mode);
            tracing::debug!("Jablotron mode {} translated to panel state {}", mode, state);
            bridge.publish_or_warn(Publication::retained(bridge.topic("mode"), state));
        });

        let bridge = self.clone();
        engine.on_led_change(move |changes| {
            for (led, on) in changes.iter() {
                tracing::debug!("Alarm led {} changed to: {}", led, if on { "on" } else { "off" });
                let topic = bridge.topic(&format!("leds/{}", led.name()));
                bridge.publish_or_warn(Publication::retained(topic, if on { "1" } else { "0" }));
            }
        });

        let bridge = self.clone();
        engine.on_display_change(move |text| {
            bridge.publish_or_warn(Publication::retained(bridge.topic("display"), text));
        });
    }

    /// Register a raw-frame publisher for every frame that reaches it
    ///
    /// Register after any duplicate suppressor to keep repeats off the bus.
    pub fn attach_raw<T: Transport>(&self, engine: &mut Engine<T>) {
        let bridge = self.clone();
        let logger = RawFrameLogger::with_sink(move |line| {
            bridge.publish_or_warn(Publication::new(bridge.topic("raw"), line));
        });
        engine.register_handler(logger, Mask::any());
    }

    /// Carry out an inbound command
    ///
    /// An invalid key sequence is reported on the `key` topic instead of
    /// failing; transport errors propagate.
    pub fn execute<T: Transport>(&self, engine: &mut Engine<T>, command: &Command) -> Result<()> {
        match command {
            Command::KeyPress { keys } => match engine.send_keys(keys) {
                Ok(_) => Ok(()),
                Err(JablotronError::InvalidKeys { keys, invalid }) => {
                    tracing::warn!("Rejected keys {:?} (invalid {:?})", keys, invalid);
                    self.publish(Publication::new(self.topic("key"), "Error: invalid key"))
                }
                Err(e) => Err(e),
            },
        }
    }

    /// Parse and carry out a message received on `topic`
    pub fn handle_message<T: Transport>(
        &self,
        engine: &mut Engine<T>,
        topic: &str,
        payload: &str,
    ) -> Result<()> {
        tracing::debug!("Message received {}: {}", topic, payload);
        let command = Command::parse(&self.prefix, topic, payload)?;
        self.execute(engine, &command)
    }

    /// Run the bus and inbound commands until `stop` is set
    ///
    /// Publishes `online 1` first and `online 0` on every exit, including
    /// transport errors. Queued commands are handled whenever a read comes
    /// back empty; commands on unknown topics are logged and skipped.
    pub fn serve<T: Transport>(
        &self,
        engine: &mut Engine<T>,
        commands: &Receiver<(String, String)>,
        stop: &AtomicBool,
    ) -> Result<()> {
        self.announce_online()?;
        let result = self.pump(engine, commands, stop);

        if let Err(e) = self.announce_offline() {
            tracing::warn!("Could not announce offline: {}", e);
        }
        result
    }

    fn pump<T: Transport>(
        &self,
        engine: &mut Engine<T>,
        commands: &Receiver<(String, String)>,
        stop: &AtomicBool,
    ) -> Result<()> {
        while !stop.load(Ordering::Relaxed) {
            if let Step::Idle = engine.step()? {
                while let Ok((topic, payload)) = commands.try_recv() {
                    match self.handle_message(engine, &topic, &payload) {
                        Ok(()) => {}
                        Err(e @ JablotronError::Bridge(_)) => tracing::warn!("{}", e),
                        Err(e) => return Err(e),
                    }
                }
            }
        }
        tracing::info!("Bridge stopped");
        Ok(())
    }

    /// Mark the bridge as online (retained)
    pub fn announce_online(&self) -> Result<()> {
        self.publish(Publication::retained(self.topic("online"), "1"))
    }

    /// Mark the bridge as offline (retained)
    pub fn announce_offline(&self) -> Result<()> {
        self.publish(Publication::retained(self.topic("online"), "0"))
    }
}
