//! MIDI event dispatcher: decoded MIDI in, note calls out.

use heapless::spsc::Consumer;
use pv_ir::{MidiEvent, MidiKind};

/// Zero-based channel the dispatcher listens on (MIDI channel 1).
pub const MIDI_CHANNEL: u8 = 0;

/// Something that can start and release notes.
///
/// Implemented by the voice manager itself and by the command queue that
/// forwards note calls to the audio context.
pub trait NoteSink {
    fn note_on(&mut self, note: f32, velocity: f32);
    fn note_off(&mut self, note: f32, velocity: f32);
}

/// A queue of decoded MIDI events.
pub trait MidiSource {
    fn has_events(&self) -> bool;
    fn pop_event(&mut self) -> Option<MidiEvent>;
}

impl<const N: usize> MidiSource for Consumer<'_, MidiEvent, N> {
    fn has_events(&self) -> bool {
        self.ready()
    }

    fn pop_event(&mut self) -> Option<MidiEvent> {
        self.dequeue()
    }
}

/// Translates note messages on one channel into `NoteSink` calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MidiDispatcher {
    channel: u8,
}

impl MidiDispatcher {
    pub const fn new() -> Self {
        Self { channel: MIDI_CHANNEL }
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Route one event. Returns true if it turned into a note call.
    ///
    /// Note-on with velocity 0 is a note-off. Other channels and message
    /// kinds are ignored.
    pub fn handle<S: NoteSink + ?Sized>(&self, event: &MidiEvent, sink: &mut S) -> bool {
        if event.channel != self.channel {
            return false;
        }
        match event.kind {
            MidiKind::NoteOn { note, velocity: 0 } => sink.note_off(note as f32, 0.0),
            MidiKind::NoteOn { note, velocity } => sink.note_on(note as f32, velocity as f32),
            MidiKind::NoteOff { note, velocity } => sink.note_off(note as f32, velocity as f32),
            MidiKind::ControlChange { .. } | MidiKind::PitchBend { .. } | MidiKind::ProgramChange { .. } => {
                return false
            }
        }
        true
    }

    /// Pop every pending event from `source` and route it. Returns the number of
    /// events consumed, including ignored ones.
    pub fn drain<M, S>(&self, source: &mut M, sink: &mut S) -> usize
    where
        M: MidiSource + ?Sized,
        S: NoteSink + ?Sized,
    {
        let mut count = 0;
        while source.has_events() {
            let Some(event) = source.pop_event() else { break };
            self.handle(&event, sink);
            count += 1;
        }
        count
    }
}

impl Default for MidiDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
