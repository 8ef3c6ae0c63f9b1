//! MIDI event records and the voice commands derived from them.

/// A decoded MIDI message.
///
/// Byte parsing happens upstream; by the time an event reaches the engine
/// it is already split into channel and message kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MidiEvent {
    /// Zero-based channel index (0 = MIDI channel 1).
    pub channel: u8,
    /// What the message says.
    pub kind: MidiKind,
}

impl MidiEvent {
    /// Create a new event.
    pub const fn new(channel: u8, kind: MidiKind) -> Self {
        Self { channel, kind }
    }

    /// Note-on on the given channel.
    pub const fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(channel, MidiKind::NoteOn { note, velocity })
    }

    /// Note-off on the given channel.
    pub const fn note_off(channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(channel, MidiKind::NoteOff { note, velocity })
    }
}

/// Message type of a decoded MIDI event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MidiKind {
    // === Note events ===
    /// Key pressed. Velocity 0 means key released.
    NoteOn { note: u8, velocity: u8 },
    /// Key released.
    NoteOff { note: u8, velocity: u8 },

    // === Ignored by the voice engine ===
    ControlChange { controller: u8, value: u8 },
    PitchBend { value: i16 },
    ProgramChange { program: u8 },
}

/// A command for the voice manager, queued from the MIDI context to the
/// audio context.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VoiceCommand {
    /// Start a note on the first free voice.
    NoteOn { note: f32, velocity: f32 },
    /// Release every voice sounding `note`.
    NoteOff { note: f32, velocity: f32 },
    /// Release every voice.
    FreeAll,
}
