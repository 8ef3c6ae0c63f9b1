//! Real-time polyphonic voice engine for polyvoice.
//!
//! A fixed pool of voices (oscillator → envelope → filter) driven by MIDI note
//! commands and control-rate parameter updates. Nothing on the render path
//! allocates, blocks or logs.

#![cfg_attr(not(feature = "std"), no_std)]

mod callback;
mod config;
mod dispatch;
mod envelope;
mod filter;
mod frame;
mod frequency;
mod link;
mod oscillator;
mod voice;
mod voice_manager;

pub use callback::AudioCallback;
pub use config::EngineConfig;
pub use dispatch::{MidiDispatcher, MidiSource, NoteSink, MIDI_CHANNEL};
pub use envelope::{Envelope, EnvelopeStage};
pub use filter::{FilterOutputs, Svf};
pub use frame::Frame;
pub use frequency::{mtof, note_to_freq};
pub use link::{CommandSender, Disconnected, EdgeDetector, Receiver, Sender};
pub use oscillator::Oscillator;
pub use voice::Voice;
pub use voice_manager::VoiceManager;

pub use pv_ir::{
    ControlRanges, ControlSnapshot, MidiEvent, MidiKind, ParamRange, Tuning, VoiceCommand, VoiceParams, Waveform, NUM_CVS,
    NUM_KNOBS, NUM_SWITCHES,
};

/// Number of voices in the pool.
pub const MAX_VOICES: usize = 24;

/// Gain applied to the voice sum before it reaches the output.
pub const OUTPUT_GAIN: f32 = 0.5;

/// Capacity of the MIDI → audio command queue.
pub const COMMAND_QUEUE_LEN: usize = 64;

/// Capacity of the control snapshot queue.
pub const CONTROL_QUEUE_LEN: usize = 8;

/// `value` if finite, otherwise `fallback`.
#[inline]
pub(crate) fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
