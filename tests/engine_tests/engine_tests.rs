//! Tests for Engine
//!
//! These tests verify:
//! - Key press and status decoding through the transport
//! - Idempotent status diffing and LED deltas
//! - Key transmission and invalid key handling
//! - Lifecycle (connect/poll/disconnect) and error propagation
//! - Cooperative cancellation of the run loop

use std::io::ErrorKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use jablotron6x::handlers::{ConsumeAll, DuplicateSuppressor};
use jablotron6x::protocol::STATUS_FRAME_LEN;
use jablotron6x::transport::{MemoryHandle, MemoryTransport};
use jablotron6x::{Config, Engine, Frame, JablotronError, Key, Led, Mask, Step, Verdict};
use parking_lot::Mutex;

// =============================================================================
// Helper Functions
// =============================================================================

type Events = Arc<Mutex<Vec<String>>>;

fn setup_engine() -> (Engine<MemoryTransport>, MemoryHandle) {
    let (transport, handle) = MemoryTransport::new();
    let config = Config::builder().key_delay_ms(0).build().unwrap();
    let mut engine = Engine::new(transport, config);
    engine.connect().unwrap();
    (engine, handle)
}

/// Record every event as a string
fn record_events(engine: &mut Engine<MemoryTransport>) -> Events {
    let events: Events = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&events);
    engine.on_key_press(move |key| sink.lock().push(format!("key:{}", key)));
    let sink = Arc::clone(&events);
    engine.on_mode_change(move |mode| sink.lock().push(format!("mode:{}", mode)));
    let sink = Arc::clone(&events);
    engine.on_led_change(move |changes| {
        let parts: Vec<String> = changes
            .iter()
            .map(|(led, on)| format!("{}={}", led, on))
            .collect();
        sink.lock().push(format!("leds:{}", parts.join(",")));
    });
    let sink = Arc::clone(&events);
    engine.on_display_change(move |text| sink.lock().push(format!("display:{:?}", text)));

    events
}

fn status(mode: u8, leds: u8, display: u8, checksum: u8) -> [u8; 6] {
    [0xE0, mode, leds, display, checksum, 0xFF]
}

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_key_press_event() {
    let (mut engine, handle) = setup_engine();
    let events = record_events(&mut engine);

    handle.push_inbound(&[0x87, 0xFF]);
    assert_eq!(engine.poll().unwrap(), 1);

    assert_eq!(*events.lock(), vec!["key:7".to_string()]);
}

#[test]
fn test_all_keys_decode() {
    let (mut engine, handle) = setup_engine();
    let events = record_events(&mut engine);

    for key in Key::ALL {
        handle.push_inbound(&[key.code(), 0xFF]);
    }
    engine.poll().unwrap();

    let expected: Vec<String> = "0123456789NF".chars().map(|c| format!("key:{}", c)).collect();
    assert_eq!(*events.lock(), expected);
}

#[test]
fn test_unknown_key_code_ignored() {
    let (mut engine, handle) = setup_engine();
    let events = record_events(&mut engine);

    handle.push_inbound(&[0x8A, 0xFF, 0x8C, 0xFF]);
    assert_eq!(engine.poll().unwrap(), 2);

    assert!(events.lock().is_empty());
}

#[test]
fn test_status_frame_scenario() {
    let (mut engine, handle) = setup_engine();
    let events = record_events(&mut engine);

    handle.push_inbound(&status(0x41, 0x05, 0x59, 0x3C));
    engine.poll().unwrap();

    assert_eq!(
        *events.lock(),
        vec![
            "mode:armed".to_string(),
            "leds:power=true,tamper=true".to_string(),
            "display:\"  \"".to_string(),
        ]
    );
    assert_eq!(engine.mode(), Some(0x41));
    assert_eq!(engine.leds(), 0x05);
    assert_eq!(engine.display(), Some(0x59));
}

#[test]
fn test_status_diffing_is_idempotent() {
    let (mut engine, handle) = setup_engine();
    let events = record_events(&mut engine);

    handle.push_inbound(&status(0x41, 0x05, 0x59, 0x3C));
    engine.poll().unwrap();
    let after_first = events.lock().len();

    handle.push_inbound(&status(0x41, 0x05, 0x59, 0x3C));
    engine.poll().unwrap();

    assert_eq!(after_first, 3);
    assert_eq!(events.lock().len(), 3);
}

#[test]
fn test_led_event_reports_only_changes() {
    let (mut engine, handle) = setup_engine();
    let events = record_events(&mut engine);

    handle.push_inbound(&status(0x40, 0x11, 0x59, 0x01));
    handle.push_inbound(&status(0x40, 0x13, 0x59, 0x02));
    handle.push_inbound(&status(0x40, 0x03, 0x59, 0x03));
    engine.poll().unwrap();

    let events = events.lock();
    assert_eq!(events[0], "mode:disarmed");
    assert_eq!(events[1], "leds:power=true,lock=true");
    assert_eq!(events[2], "display:\"  \"");
    assert_eq!(events[3], "leds:alarm=true");
    assert_eq!(events[4], "leds:lock=false");
    assert_eq!(events.len(), 5);
}

#[test]
fn test_each_field_diffs_independently() {
    let (mut engine, handle) = setup_engine();
    let events = record_events(&mut engine);

    handle.push_inbound(&status(0x40, 0x01, 0x59, 0x01));
    engine.poll().unwrap();
    events.lock().clear();

    handle.push_inbound(&status(0x51, 0x01, 0x59, 0x02));
    handle.push_inbound(&status(0x51, 0x01, 0x5B, 0x03));
    engine.poll().unwrap();

    assert_eq!(
        *events.lock(),
        vec!["mode:arming".to_string(), "display:\" -\"".to_string()]
    );
}

#[test]
fn test_unmapped_mode_and_display_fall_back() {
    let (mut engine, handle) = setup_engine();
    let events = record_events(&mut engine);

    handle.push_inbound(&status(0x2A, 0x00, 0x99, 0x01));
    engine.poll().unwrap();

    assert_eq!(
        *events.lock(),
        vec!["mode:Mode 2a".to_string(), "display:\"99\"".to_string()]
    );
}

#[test]
fn test_status_frame_decodes_at_smallest_frame_bound() {
    let (transport, handle) = MemoryTransport::new();
    let config = Config::builder()
        .key_delay_ms(0)
        .max_frame_len(STATUS_FRAME_LEN)
        .build()
        .unwrap();
    let mut engine = Engine::new(transport, config);
    engine.connect().unwrap();

    handle.push_inbound(&status(0x41, 0x05, 0x59, 0x3C));
    assert_eq!(engine.poll().unwrap(), 1);

    assert_eq!(engine.mode(), Some(0x41));
    assert_eq!(engine.leds(), 0x05);
    assert_eq!(engine.display(), Some(0x59));
}

#[test]
fn test_events_without_subscribers_are_dropped() {
    let (mut engine, handle) = setup_engine();

    handle.push_inbound(&[0x87, 0xFF]);
    handle.push_inbound(&status(0x41, 0x05, 0x59, 0x3C));
    assert_eq!(engine.poll().unwrap(), 2);
    assert_eq!(engine.mode(), Some(0x41));
}

#[test]
fn test_replacing_subscriber() {
    let (mut engine, handle) = setup_engine();
    let first = Arc::new(Mutex::new(0));
    let second = Arc::new(Mutex::new(0));

    let counter = Arc::clone(&first);
    engine.on_key_press(move |_| *counter.lock() += 1);
    let counter = Arc::clone(&second);
    engine.on_key_press(move |_| *counter.lock() += 1);

    handle.push_inbound(&[0x81, 0xFF]);
    engine.poll().unwrap();

    assert_eq!(*first.lock(), 0);
    assert_eq!(*second.lock(), 1);
}

// =============================================================================
// Handler Registration Tests
// =============================================================================

#[test]
fn test_suppressor_hides_repeat_from_status_decoder() {
    let (transport, handle) = MemoryTransport::new();
    let config = Config::builder().key_delay_ms(0).build().unwrap();
    let mut engine = Engine::without_builtins(transport, config);
    engine.connect().unwrap();
    engine
        .register_handler(DuplicateSuppressor::new(), [0xE0])
        .register_status_decoder();
    let events = record_events(&mut engine);

    let frame = Frame::new(status(0x41, 0x05, 0x59, 0x3C).to_vec());
    let first = engine.dispatch(&frame);
    let second = engine.dispatch(&frame);

    assert_eq!(first.invoked, 2);
    assert_eq!(first.consumed_by, None);
    assert_eq!(second.invoked, 1);
    assert_eq!(second.consumed_by, Some(0));
    assert_eq!(events.lock().len(), 3);

    // a changed checksum gets through again
    handle.push_inbound(&status(0x40, 0x05, 0x59, 0x3D));
    engine.poll().unwrap();
    assert_eq!(events.lock().last().map(String::as_str), Some("mode:disarmed"));
}

#[test]
fn test_handler_between_suppressor_and_decoder_is_hidden_too() {
    let (transport, handle) = MemoryTransport::new();
    let config = Config::builder().key_delay_ms(0).build().unwrap();
    let mut engine = Engine::without_builtins(transport, config);
    engine.connect().unwrap();

    let reached = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&reached);
    engine.register_handler(DuplicateSuppressor::new(), [0xE0]);
    engine.register_handler(
        move |_: &Frame| {
            *counter.lock() += 1;
            Verdict::NotConsumed
        },
        [0xE0],
    );
    engine.register_key_decoder().register_status_decoder();

    handle.push_inbound(&status(0x41, 0x05, 0x59, 0x3C));
    handle.push_inbound(&status(0x41, 0x05, 0x59, 0x3C));
    engine.poll().unwrap();

    assert_eq!(*reached.lock(), 1);
    assert_eq!(engine.handler_count(), 2 + 12 + 1);
}

#[test]
fn test_user_handler_sees_unknown_frames() {
    let (mut engine, handle) = setup_engine();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    engine.register_handler(move |f: &Frame| sink.lock().push(f.to_string()), Mask::any());

    handle.push_inbound(&[0xA1, 0x02, 0xFF]);
    engine.poll().unwrap();

    assert_eq!(*seen.lock(), vec!["a1 02 ff".to_string()]);
}

#[test]
fn test_user_consumer_after_builtins_does_not_block_decoding() {
    let (mut engine, handle) = setup_engine();
    let events = record_events(&mut engine);
    engine.register_handler(ConsumeAll, Mask::any());

    handle.push_inbound(&[0x85, 0xFF]);
    engine.poll().unwrap();

    assert_eq!(*events.lock(), vec!["key:5".to_string()]);
}

#[test]
fn test_dispatch_outcome_for_status() {
    let (mut engine, _handle) = setup_engine();
    engine.register_handler(ConsumeAll, [0xE0]);

    let outcome = engine.dispatch(&Frame::new(status(0x41, 0x05, 0x59, 0x3C).to_vec()));

    // status decoder, then the consumer
    assert_eq!(outcome.invoked, 2);
    assert_eq!(outcome.consumed_by, Some(engine.handler_count() - 1));
}

// =============================================================================
// Sending Tests
// =============================================================================

#[test]
fn test_send_keys_codes() {
    let (mut engine, handle) = setup_engine();

    engine.send_keys("F06060").unwrap();

    assert_eq!(
        handle.writes(),
        vec![vec![0x8F], vec![0x80], vec![0x86], vec![0x80], vec![0x86], vec![0x80]]
    );
    assert_eq!(handle.flush_count(), 6);
}

#[test]
fn test_send_keys_rejects_invalid_without_transmitting() {
    let (mut engine, handle) = setup_engine();

    let result = engine.send_keys("X");
    assert!(matches!(
        result,
        Err(JablotronError::InvalidKeys { invalid: 'X', .. })
    ));

    let result = engine.send_keys("12X4");
    assert!(matches!(
        result,
        Err(JablotronError::InvalidKeys { invalid: 'X', .. })
    ));

    assert!(handle.written().is_empty());
}

#[test]
fn test_send_keys_lowercase_rejected() {
    let (mut engine, handle) = setup_engine();
    assert!(engine.send_keys("f").is_err());
    assert!(handle.written().is_empty());
}

#[test]
fn test_send_keys_paced() {
    let (transport, handle) = MemoryTransport::new();
    let config = Config::builder().key_delay_ms(20).build().unwrap();
    let mut engine = Engine::new(transport, config);
    engine.connect().unwrap();

    let started = std::time::Instant::now();
    engine.send_keys("123").unwrap();

    assert!(started.elapsed() >= std::time::Duration::from_millis(40));
    assert_eq!(handle.written(), vec![0x81, 0x82, 0x83]);
}

#[test]
fn test_send_raw() {
    let (mut engine, handle) = setup_engine();
    engine.send(&[0x8E, 0x8E]).unwrap();
    assert_eq!(handle.writes(), vec![vec![0x8E, 0x8E]]);
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_send_while_disconnected_fails() {
    let (transport, _handle) = MemoryTransport::new();
    let mut engine = Engine::new(transport, Config::default());

    assert!(matches!(
        engine.send_keys("1"),
        Err(JablotronError::NotConnected)
    ));
}

#[test]
fn test_poll_while_disconnected_is_noop() {
    let (transport, handle) = MemoryTransport::new();
    let mut engine = Engine::new(transport, Config::default());
    handle.push_inbound(&[0x87, 0xFF]);

    assert_eq!(engine.poll().unwrap(), 0);
    assert_eq!(handle.inbound_len(), 2);
}

#[test]
fn test_disconnect_discards_partial_frame() {
    let (mut engine, handle) = setup_engine();
    let events = record_events(&mut engine);

    handle.push_inbound(&[0xE0, 0x41, 0x05]);
    engine.poll().unwrap();
    assert_eq!(engine.pending_bytes(), 3);

    engine.disconnect().unwrap();
    assert!(!handle.is_open());
    assert_eq!(engine.pending_bytes(), 0);

    engine.connect().unwrap();
    handle.push_inbound(&[0x59, 0x3C, 0xFF]);
    engine.poll().unwrap();

    assert!(events.lock().is_empty());
}

#[test]
fn test_partial_frame_survives_idle_reads() {
    let (mut engine, handle) = setup_engine();
    let events = record_events(&mut engine);

    handle.push_inbound(&[0x87]);
    assert_eq!(engine.step().unwrap(), Step::Pending);
    assert_eq!(engine.step().unwrap(), Step::Idle);
    assert_eq!(engine.step().unwrap(), Step::Idle);

    handle.push_inbound(&[0xFF]);
    assert!(matches!(engine.step().unwrap(), Step::Dispatched(_)));
    assert_eq!(*events.lock(), vec!["key:7".to_string()]);
}

#[test]
fn test_read_error_propagates() {
    let (mut engine, handle) = setup_engine();
    handle.fail_next_read(ErrorKind::BrokenPipe);

    assert!(matches!(engine.poll(), Err(JablotronError::Io(_))));
}

#[test]
fn test_run_stops_on_flag() {
    let (mut engine, handle) = setup_engine();
    let stop = Arc::new(AtomicBool::new(false));

    let flag = Arc::clone(&stop);
    engine.on_display_change(move |_| flag.store(true, Ordering::Relaxed));

    handle.push_inbound(&[0x87, 0xFF]);
    handle.push_inbound(&status(0x41, 0x05, 0x59, 0x3C));
    handle.push_inbound(&[0x88, 0xFF]);

    engine.run(&stop).unwrap();

    // stopped right after the status frame
    assert_eq!(handle.inbound_len(), 2);
}

#[test]
fn test_run_requires_connection() {
    let (transport, _handle) = MemoryTransport::new();
    let mut engine = Engine::new(transport, Config::default());
    let stop = AtomicBool::new(false);

    assert!(matches!(engine.run(&stop), Err(JablotronError::NotConnected)));
}

#[test]
fn test_engines_do_not_share_state() {
    let (mut first, first_handle) = setup_engine();
    let (second, _second_handle) = setup_engine();

    first_handle.push_inbound(&status(0x41, 0x05, 0x59, 0x3C));
    first.poll().unwrap();

    assert_eq!(first.mode(), Some(0x41));
    assert_eq!(second.mode(), None);
    assert_eq!(second.leds(), 0);
    assert!(Led::ALL.iter().all(|led| !led.is_set(second.leds())));
}
