//! Host-side MIDI input queue.
//!
//! Whatever decodes MIDI (a port reader, a scripted phrase, a test) holds the
//! [`MidiInputHandle`] and pushes events; the MIDI loop holds the
//! [`MidiInput`] and drains it through the dispatcher.

use log::trace;
use pv_engine::{MidiEvent, MidiSource};
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};

/// Default number of events the input queue holds.
pub const MIDI_QUEUE_LEN: usize = 256;

/// Consumer end, drained by the MIDI loop.
pub struct MidiInput {
    consumer: HeapCons<MidiEvent>,
}

/// Producer end, fed by whatever decodes MIDI.
pub struct MidiInputHandle {
    producer: HeapProd<MidiEvent>,
    dropped: usize,
}

impl MidiInput {
    pub fn new(capacity: usize) -> (MidiInput, MidiInputHandle) {
        let (producer, consumer) = HeapRb::<MidiEvent>::new(capacity.max(1)).split();
        (MidiInput { consumer }, MidiInputHandle { producer, dropped: 0 })
    }

    pub fn pending(&self) -> usize {
        self.consumer.occupied_len()
    }
}

impl MidiSource for MidiInput {
    fn has_events(&self) -> bool {
        !self.consumer.is_empty()
    }

    fn pop_event(&mut self) -> Option<MidiEvent> {
        self.consumer.try_pop()
    }
}

impl MidiInputHandle {
    /// Queue an event. A full queue drops it and returns false.
    pub fn send(&mut self, event: MidiEvent) -> bool {
        trace!("midi in: {:?}", event);
        if self.producer.try_push(event).is_ok() {
            true
        } else {
            self.dropped += 1;
            false
        }
    }

    pub fn note_on(&mut self, channel: u8, note: u8, velocity: u8) -> bool {
        self.send(MidiEvent::note_on(channel, note, velocity))
    }

    pub fn note_off(&mut self, channel: u8, note: u8) -> bool {
        self.send(MidiEvent::note_off(channel, note, 0))
    }

    /// Events lost to a full queue.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}
