//! Parameter block shared by every voice in the pool.

use crate::waveform::Waveform;

/// Global voice parameters.
///
/// The voice manager keeps one of these and pushes it into each voice, so a
/// voice activated after a parameter change already reflects it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoiceParams {
    /// Filter cutoff in Hz.
    pub cutoff_hz: f32,
    /// Filter resonance (0-1).
    pub resonance: f32,
    /// Filter input drive (0-1).
    pub drive: f32,
    /// Attack time in seconds.
    pub attack: f32,
    /// Decay time in seconds.
    pub decay: f32,
    /// Sustain level (0-1).
    pub sustain: f32,
    /// Release time in seconds.
    pub release: f32,
    /// Oscillator waveform.
    pub waveform: Waveform,
}

impl VoiceParams {
    pub const DEFAULT: Self = Self {
        cutoff_hz: 6000.0,
        resonance: 0.6,
        drive: 0.8,
        attack: 0.005,
        decay: 0.005,
        sustain: 0.5,
        release: 0.2,
        waveform: Waveform::Sine,
    };
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}
