//! Framing Tests
//!
//! These tests verify:
//! - Terminator handling, including a lone terminator
//! - Chunk-size independence of frame assembly
//! - Partial frames across empty reads
//! - Table lookups used by the decoders

use jablotron6x::protocol::{
    display_label, mode_label, Frame, FrameAssembler, Key, Led, TERMINATOR,
};
use proptest::prelude::*;

// =============================================================================
// Helper Functions
// =============================================================================

fn frames_bytewise(asm: &mut FrameAssembler, bytes: &[u8]) -> Vec<Frame> {
    bytes.iter().filter_map(|&b| asm.feed(b)).collect()
}

// =============================================================================
// Terminator Tests
// =============================================================================

#[test]
fn test_lone_terminator() {
    let mut asm = FrameAssembler::unbounded();
    let frames = asm.push(&[0xFF, 0xFF]);
    assert_eq!(frames.len(), 2);
    assert!(frames.iter().all(|f| f.as_bytes() == [0xFF]));
}

#[test]
fn test_terminator_included() {
    let mut asm = FrameAssembler::unbounded();
    let frames = asm.push(&[0x87, 0xFF]);
    assert_eq!(frames, vec![Frame::new(vec![0x87, 0xFF])]);
    assert_eq!(frames[0].get(frames[0].len() - 1), Some(TERMINATOR));
}

#[test]
fn test_multiple_frames_in_one_chunk() {
    let mut asm = FrameAssembler::unbounded();
    let frames = asm.push(&[0x87, 0xFF, 0xE0, 0x41, 0x11, 0x59, 0x2A, 0xFF, 0x80]);
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].as_bytes(), &[0x87, 0xFF]);
    assert_eq!(frames[1].as_bytes(), &[0xE0, 0x41, 0x11, 0x59, 0x2A, 0xFF]);
    assert_eq!(asm.pending(), 1);
}

#[test]
fn test_no_shape_validation() {
    // Anything before a terminator is a frame, even if no handler knows it
    let mut asm = FrameAssembler::unbounded();
    let frames = asm.push(&[0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0xFF]);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].len(), 8);
}

#[test]
fn test_partial_frame_resumes() {
    let mut asm = FrameAssembler::unbounded();
    assert!(asm.push(&[0xE0, 0x41]).is_empty());
    // an empty read in between
    assert!(asm.push(&[]).is_empty());
    let frames = asm.push(&[0x11, 0x59, 0x2A, 0xFF]);
    assert_eq!(frames[0].as_bytes(), &[0xE0, 0x41, 0x11, 0x59, 0x2A, 0xFF]);
}

#[test]
fn test_bounded_assembler_recovers_from_runaway_line() {
    let mut asm = FrameAssembler::new(8);
    let mut noise = vec![0x55; 20];
    noise.extend_from_slice(&[0x87, 0xFF]);
    let frames = asm.push(&noise);
    assert_eq!(frames.len(), 1);
    assert!(frames[0].len() <= 8);
    assert_eq!(&frames[0].as_bytes()[frames[0].len() - 2..], &[0x87, 0xFF]);
}

// =============================================================================
// Chunking Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_chunking_does_not_change_frames(
        bytes in proptest::collection::vec(
            prop_oneof![Just(0xFFu8), Just(0xE0u8), any::<u8>()],
            0..256,
        ),
        chunk in 1usize..32,
    ) {
        let mut single = FrameAssembler::unbounded();
        let expected = frames_bytewise(&mut single, &bytes);

        let mut chunked = FrameAssembler::unbounded();
        let mut actual = Vec::new();
        for part in bytes.chunks(chunk) {
            actual.extend(chunked.push(part));
        }

        prop_assert_eq!(&actual, &expected);
        prop_assert_eq!(chunked.pending(), single.pending());
    }

    #[test]
    fn prop_every_frame_ends_with_single_terminator(
        bytes in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        let mut asm = FrameAssembler::unbounded();
        for frame in asm.push(&bytes) {
            let body = &frame.as_bytes()[..frame.len() - 1];
            prop_assert_eq!(frame.as_bytes().last(), Some(&TERMINATOR));
            prop_assert!(!body.contains(&TERMINATOR));
        }
    }
}

// =============================================================================
// Table Tests
// =============================================================================

#[test]
fn test_keypad_alphabet() {
    let alphabet: String = Key::ALL.iter().map(|k| k.as_char()).collect();
    assert_eq!(alphabet, "0123456789NF");
}

#[test]
fn test_send_codes_for_sample_sequence() {
    let codes: Vec<u8> = "F06060"
        .chars()
        .map(|c| Key::from_char(c).unwrap().code())
        .collect();
    assert_eq!(codes, vec![0x8F, 0x80, 0x86, 0x80, 0x86, 0x80]);
}

#[test]
fn test_led_names() {
    let names: Vec<&str> = Led::ALL.iter().map(|l| l.name()).collect();
    assert_eq!(
        names,
        vec!["power", "alarm", "tamper", "lock", "blinking_lock", "wireless"]
    );
}

#[test]
fn test_mode_table_keeps_ab_variants() {
    assert_eq!(mode_label(0x61), Some("armedA"));
    assert_eq!(mode_label(0x63), Some("armedB"));
    assert_eq!(mode_label(0x71), Some("armingA"));
    assert_eq!(mode_label(0x73), Some("armingB"));
}

#[test]
fn test_display_table_samples() {
    assert_eq!(display_label(0x0A), Some("10"));
    assert_eq!(display_label(0x1C), Some(" L"));
    assert_eq!(display_label(0x28), Some("c8"));
    assert_eq!(display_label(0x5F), Some(" |"));
}
