//! Shared data types for the polyvoice synthesizer.
//!
//! Everything here is plain `Copy` data that crosses a layer boundary:
//! decoded MIDI records, the commands handed to the audio context, the
//! per-voice parameter block and the control snapshot read once per block.
//!
//! Designed to be `no_std` compatible.

#![cfg_attr(not(feature = "std"), no_std)]

mod controls;
mod event;
mod params;
mod tuning;
mod waveform;

pub use controls::{ControlRanges, ControlSnapshot, ParamRange, NUM_CVS, NUM_KNOBS, NUM_SWITCHES};
pub use event::{MidiEvent, MidiKind, VoiceCommand};
pub use params::VoiceParams;
pub use tuning::Tuning;
pub use waveform::Waveform;
