//! Fuzz target: `NecDecoder::decode`
//!
//! Decodes arbitrary tick sequences from both polarities and checks the
//! outcome stays inside the available window.
//!
//! cargo fuzz run fuzz_nec_decoder

#![no_main]

use irinput::decode::{DecodeOutcome, Decoder, SliceView};
use irinput::{Fine, NecDecoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let ticks: Vec<u16> = data
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();

    for first_is_mark in [true, false] {
        let view = SliceView::<Fine>::new(&ticks, first_is_mark);
        match Decoder::<Fine>::decode(&NecDecoder, &view, ticks.len()) {
            DecodeOutcome::Decoded(frame) => assert!(frame.consumed <= ticks.len()),
            DecodeOutcome::ParseError { at } => assert!(at < ticks.len()),
            DecodeOutcome::InsufficientData { min_needed } => assert!(min_needed > ticks.len()),
            DecodeOutcome::Empty => {}
        }
    }
});
