//! Lock-free handoff between the MIDI/control contexts and the audio context.
//!
//! Everything the audio callback learns from the outside world arrives
//! through a single-producer/single-consumer queue: voice commands from the
//! MIDI loop and control snapshots from the control scanner. Neither end
//! ever blocks. A full queue rejects the newest item.

use heapless::spsc::{Consumer, Producer};
use pv_ir::VoiceCommand;

use crate::dispatch::NoteSink;

/// Producer end of an SPSC queue.
pub trait Sender<T> {
    /// Enqueue `item`, handing it back if the queue is full.
    fn try_send(&mut self, item: T) -> Result<(), T>;
}

/// Consumer end of an SPSC queue.
pub trait Receiver<T> {
    fn try_recv(&mut self) -> Option<T>;
}

impl<T, const N: usize> Sender<T> for Producer<'_, T, N> {
    fn try_send(&mut self, item: T) -> Result<(), T> {
        self.enqueue(item)
    }
}

impl<T, const N: usize> Receiver<T> for Consumer<'_, T, N> {
    fn try_recv(&mut self) -> Option<T> {
        self.dequeue()
    }
}

/// A receiver with no sender attached. Never yields anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct Disconnected;

impl<T> Receiver<T> for Disconnected {
    fn try_recv(&mut self) -> Option<T> {
        None
    }
}

/// Note calls turned into queued `VoiceCommand`s.
///
/// Sits on the MIDI side of the command queue so the dispatcher can drive
/// the audio context without touching the voice pool.
#[derive(Debug)]
pub struct CommandSender<S> {
    inner: S,
    dropped: usize,
}

impl<S: Sender<VoiceCommand>> CommandSender<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, dropped: 0 }
    }

    /// Queue a command. Returns false (and counts the drop) when the queue is full.
    pub fn send(&mut self, command: VoiceCommand) -> bool {
        match self.inner.try_send(command) {
            Ok(()) => true,
            Err(_) => {
                self.dropped += 1;
                false
            }
        }
    }

    /// Queue a release of every voice.
    pub fn free_all(&mut self) -> bool {
        self.send(VoiceCommand::FreeAll)
    }

    /// Commands rejected so far because the queue was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl<S: Sender<VoiceCommand>> NoteSink for CommandSender<S> {
    fn note_on(&mut self, note: f32, velocity: f32) {
        self.send(VoiceCommand::NoteOn { note, velocity });
    }

    fn note_off(&mut self, note: f32, velocity: f32) {
        self.send(VoiceCommand::NoteOff { note, velocity });
    }
}

/// Detects pressed → released transitions of a momentary switch.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeDetector {
    last: bool,
}

impl EdgeDetector {
    pub const fn new() -> Self {
        Self { last: false }
    }

    /// Feed the current switch state. True exactly once per release.
    pub fn falling(&mut self, pressed: bool) -> bool {
        let edge = self.last && !pressed;
        self.last = pressed;
        edge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::spsc::Queue;

    #[test]
    fn command_sender_counts_drops_when_full() {
        // heapless queues hold N - 1 items
        let mut queue: Queue<VoiceCommand, 4> = Queue::new();
        let (producer, mut consumer) = queue.split();
        let mut tx = CommandSender::new(producer);

        for n in 0..5 {
            tx.note_on(60.0 + n as f32, 100.0);
        }
        assert_eq!(tx.dropped(), 2);

        let received: Vec<VoiceCommand> = core::iter::from_fn(|| consumer.try_recv()).collect();
        assert_eq!(received.len(), 3);
        assert_eq!(received[0], VoiceCommand::NoteOn { note: 60.0, velocity: 100.0 });
        assert_eq!(received[2], VoiceCommand::NoteOn { note: 62.0, velocity: 100.0 });
    }

    #[test]
    fn command_sender_forwards_note_off_and_free_all() {
        let mut queue: Queue<VoiceCommand, 8> = Queue::new();
        let (producer, mut consumer) = queue.split();
        let mut tx = CommandSender::new(producer);

        tx.note_off(64.0, 0.0);
        assert!(tx.free_all());

        assert_eq!(consumer.try_recv(), Some(VoiceCommand::NoteOff { note: 64.0, velocity: 0.0 }));
        assert_eq!(consumer.try_recv(), Some(VoiceCommand::FreeAll));
        assert_eq!(consumer.try_recv(), None);
    }

    #[test]
    fn disconnected_never_yields() {
        let mut rx = Disconnected;
        assert_eq!(Receiver::<VoiceCommand>::try_recv(&mut rx), None);
    }

    #[test]
    fn edge_detector_fires_on_release_only() {
        let mut edge = EdgeDetector::new();
        assert!(!edge.falling(false));
        assert!(!edge.falling(true));
        assert!(!edge.falling(true));
        assert!(edge.falling(false));
        assert!(!edge.falling(false));
    }
}
