//! Scripted MIDI: timed events for demos and offline renders.

use pv_engine::{MidiEvent, MIDI_CHANNEL};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::midi::MidiInputHandle;

/// MIDI events stamped with the output frame they should land on.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Phrase {
    events: Vec<(u64, MidiEvent)>,
}

impl Phrase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event. Events at the same frame keep insertion order.
    pub fn push(&mut self, frame: u64, event: MidiEvent) {
        let at = self.events.partition_point(|(f, _)| *f <= frame);
        self.events.insert(at, (frame, event));
    }

    /// A held note on the engine's channel: note-on at `start`, note-off `length` frames later.
    pub fn note(&mut self, start: u64, length: u64, note: u8, velocity: u8) -> &mut Self {
        self.push(start, MidiEvent::note_on(MIDI_CHANNEL, note, velocity));
        self.push(start + length, MidiEvent::note_off(MIDI_CHANNEL, note, 0));
        self
    }

    pub fn events(&self) -> &[(u64, MidiEvent)] {
        &self.events
    }

    /// Frame of the last event.
    pub fn end_frame(&self) -> u64 {
        self.events.last().map_or(0, |(f, _)| *f)
    }

    /// A short arpeggio over a C minor seventh chord, then the chord held.
    pub fn demo(sample_rate: u32) -> Self {
        let beat = sample_rate as u64 / 4;
        let mut phrase = Phrase::new();
        for (i, note) in [48u8, 51, 55, 58, 60, 58, 55, 51].into_iter().enumerate() {
            phrase.note(i as u64 * beat, beat - beat / 8, note, 100);
        }
        let chord_at = 8 * beat;
        for note in [48u8, 55, 58, 63] {
            phrase.note(chord_at, 6 * beat, note, 90);
        }
        phrase
    }

    /// Send each event to `input` at its wall-clock time, starting now.
    /// Returns early (false) if `stop` is raised.
    pub fn perform(&self, input: &mut MidiInputHandle, sample_rate: u32, stop: &AtomicBool) -> bool {
        let start = Instant::now();
        let sample_rate = sample_rate.max(1) as f64;
        for (frame, event) in &self.events {
            let due = start + Duration::from_secs_f64(*frame as f64 / sample_rate);
            loop {
                if stop.load(Ordering::Relaxed) {
                    return false;
                }
                let now = Instant::now();
                if now >= due {
                    break;
                }
                std::thread::sleep((due - now).min(Duration::from_millis(5)));
            }
            input.send(*event);
        }
        true
    }
}
