//! jablotron-monitor
//!
//! Watches a Jablotron 6x keypad bus and prints bridge publications.
//! Lines of the form `<topic> <payload>` on stdin are handled as inbound
//! commands, e.g. `alarm/key/press F06060`.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use clap::Parser;
use crossbeam::channel::{self, Receiver, Sender};
use jablotron6x::bridge::{Bridge, Publication, KEY_PRESS_TOPIC};
use jablotron6x::handlers::DuplicateSuppressor;
use jablotron6x::protocol::STATUS_MARKER;
use jablotron6x::{Config, Engine, SerialTransport};
use tracing_subscriber::{fmt, EnvFilter};

/// Jablotron 6x keypad monitor
#[derive(Parser, Debug)]
#[command(name = "jablotron-monitor")]
#[command(about = "Decode a Jablotron 6x keypad bus and print events as topic/payload lines")]
#[command(version)]
struct Args {
    /// Serial port where the JA-80T is connected
    #[arg(short = 'p', long)]
    serial_port: String,

    /// Topic prefix for publications and commands
    #[arg(short, long, default_value = "alarm")]
    topic: String,

    /// Drop retransmitted status frames before decoding
    #[arg(long)]
    dedupe: bool,

    /// Publish every frame as hex on `<topic>/raw`
    #[arg(long)]
    raw: bool,

    /// Keys to press once connected
    #[arg(long)]
    send_keys: Option<String>,

    /// Verbose output
    #[arg(short = 'v')]
    verbose: bool,

    /// Debug output
    #[arg(short = 'd')]
    debug: bool,

    /// Quiet mode
    #[arg(short = 'q')]
    quiet: bool,
}

impl Args {
    fn default_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

fn main() {
    let args = Args::parse();

    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.default_filter()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("jablotron-monitor v{}", jablotron6x::VERSION);
    tracing::info!("Serial port: {}", args.serial_port);

    let config = match Config::builder()
        .device(&args.serial_port)
        .topic(&args.topic)
        .build()
    {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(2);
        }
    };

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::info!("Received Ctrl+C, shutting down...");
        flag.store(true, Ordering::Relaxed);
    }) {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(args, config, &stop) {
        tracing::error!("Monitor stopped: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args, config: Config, stop: &AtomicBool) -> jablotron6x::Result<()> {
    let (pub_tx, pub_rx) = channel::unbounded::<Publication>();
    let bridge = Bridge::new(config.topic.clone(), pub_tx);
    let printer = spawn_printer(pub_rx);

    let (cmd_tx, cmd_rx) = channel::unbounded();
    if let Some(keys) = args.send_keys {
        let topic = format!("{}/{}", bridge.prefix(), KEY_PRESS_TOPIC);
        if cmd_tx.send((topic, keys)).is_err() {
            tracing::warn!("Command queue closed, not sending keys");
        }
    }
    spawn_stdin_reader(cmd_tx);

    let mut engine = Engine::new(SerialTransport::from_config(&config), config);

    if args.dedupe {
        engine.register_handler(DuplicateSuppressor::new(), [STATUS_MARKER]);
    }
    if args.raw {
        bridge.attach_raw(&mut engine);
    }
    bridge.attach(&mut engine);

    engine.connect()?;
    let result = bridge.serve(&mut engine, &cmd_rx, stop);
    if let Err(e) = engine.disconnect() {
        tracing::warn!("Error closing transport: {}", e);
    }

    // The engine's subscribers hold bridge clones; drop both so the printer drains and exits
    drop(engine);
    drop(bridge);
    if printer.join().is_err() {
        tracing::warn!("Publication printer panicked");
    }

    result
}

fn spawn_printer(rx: Receiver<Publication>) -> JoinHandle<()> {
    thread::spawn(move || {
        for publication in rx {
            let marker = if publication.retain { " (retained)" } else { "" };
            println!("{} {}{}", publication.topic, publication.payload, marker);
        }
    })
}

fn spawn_stdin_reader(tx: Sender<(String, String)>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let Some((topic, payload)) = line.trim().split_once(' ') else {
                tracing::warn!("Expected `<topic> <payload>`, got {:?}", line);
                continue;
            };
            if tx.send((topic.to_string(), payload.to_string())).is_err() {
                break;
            }
        }
    });
}
