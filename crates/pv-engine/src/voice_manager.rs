//! VoiceManager: fixed voice pool, first-fit allocation and parameter broadcast.

use pv_ir::{Tuning, VoiceParams};

use crate::config::EngineConfig;
use crate::dispatch::NoteSink;
use crate::voice::Voice;
use crate::MAX_VOICES;

/// Fixed pool of `N` voices.
///
/// Every voice is built up front and never freed. A note-on takes the
/// lowest-indexed inactive voice; when none is free the note is dropped.
/// There is no stealing.
///
/// The manager keeps one [`VoiceParams`] block. Each global setter updates
/// it and pushes it into every voice, active or not, so a voice picked up
/// right after a change already reflects it.
#[derive(Clone, Debug)]
pub struct VoiceManager<const N: usize = MAX_VOICES> {
    voices: [Voice; N],
    params: VoiceParams,
}

impl<const N: usize> VoiceManager<N> {
    /// Create a pool of idle voices at `sample_rate` with default parameters.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            voices: core::array::from_fn(|_| Voice::new(sample_rate)),
            params: VoiceParams::DEFAULT,
        }
    }

    /// Build a pool at the configured sample rate and tuning.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut manager = Self::new(config.sample_rate);
        manager.set_tuning(config.tuning);
        manager
    }

    /// Re-initialize every voice at `sample_rate` and restore default parameters.
    pub fn init(&mut self, sample_rate: f32) {
        for voice in &mut self.voices {
            voice.init(sample_rate);
        }
        self.params = VoiceParams::DEFAULT;
    }

    /// Sum of every voice's next sample.
    #[inline]
    pub fn produce_sample(&mut self) -> f32 {
        let mut sum = 0.0;
        for voice in &mut self.voices {
            sum += voice.produce_sample();
        }
        sum
    }

    /// Start `note` on the first inactive voice. Returns its slot, or `None`
    /// if the pool is full and the note was dropped.
    pub fn note_on(&mut self, note: f32, velocity: f32) -> Option<usize> {
        let slot = self.voices.iter().position(|v| !v.is_active())?;
        let voice = &mut self.voices[slot];
        voice.apply_params(&self.params);
        voice.note_on(note, velocity);
        Some(slot)
    }

    /// Release every active voice sounding exactly `note`.
    pub fn note_off(&mut self, note: f32, _velocity: f32) {
        for voice in &mut self.voices {
            if voice.is_active() && voice.note() == note {
                voice.note_off();
            }
        }
    }

    /// Release every voice. Idle voices ignore it.
    pub fn free_all_voices(&mut self) {
        for voice in &mut self.voices {
            voice.note_off();
        }
    }

    // === Global parameters ===

    /// Set the filter cutoff (Hz) on every voice.
    pub fn set_cutoff(&mut self, hz: f32) {
        self.params.cutoff_hz = hz;
        self.for_each_voice(|v| v.set_cutoff(hz));
    }

    /// Set the filter resonance on every voice.
    pub fn set_resonance(&mut self, resonance: f32) {
        self.params.resonance = resonance;
        self.for_each_voice(|v| v.set_resonance(resonance));
    }

    /// Set the resonance drive on every voice.
    pub fn set_res_drive(&mut self, drive: f32) {
        self.params.drive = drive;
        self.for_each_voice(|v| v.set_res_drive(drive));
    }

    /// Set the envelope attack (seconds) on every voice.
    pub fn set_env_attack(&mut self, seconds: f32) {
        self.params.attack = seconds;
        self.for_each_voice(|v| v.set_env_attack(seconds));
    }

    /// Set the envelope decay (seconds) on every voice.
    pub fn set_env_decay(&mut self, seconds: f32) {
        self.params.decay = seconds;
        self.for_each_voice(|v| v.set_env_decay(seconds));
    }

    /// Set the envelope sustain level on every voice.
    pub fn set_env_sustain(&mut self, level: f32) {
        self.params.sustain = level;
        self.for_each_voice(|v| v.set_env_sustain(level));
    }

    /// Set the envelope release (seconds) on every voice.
    pub fn set_env_release(&mut self, seconds: f32) {
        self.params.release = seconds;
        self.for_each_voice(|v| v.set_env_release(seconds));
    }

    /// Step every voice to the next waveform.
    pub fn increment_waveform(&mut self) {
        self.params.waveform = self.params.waveform.next();
        let waveform = self.params.waveform;
        self.for_each_voice(|v| v.set_waveform(waveform));
    }

    /// Replace the whole parameter block and push it to every voice.
    pub fn apply_params(&mut self, params: &VoiceParams) {
        self.params = *params;
        for voice in &mut self.voices {
            voice.apply_params(params);
        }
    }

    /// Set the reference pitch used by later note-ons.
    pub fn set_tuning(&mut self, tuning: Tuning) {
        self.for_each_voice(|v| v.set_tuning(tuning));
    }

    // === Observers ===

    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn params(&self) -> &VoiceParams {
        &self.params
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline]
    fn for_each_voice(&mut self, mut f: impl FnMut(&mut Voice)) {
        for voice in &mut self.voices {
            f(voice);
        }
    }
}

impl<const N: usize> NoteSink for VoiceManager<N> {
    fn note_on(&mut self, note: f32, velocity: f32) {
        VoiceManager::note_on(self, note, velocity);
    }

    fn note_off(&mut self, note: f32, velocity: f32) {
        VoiceManager::note_off(self, note, velocity);
    }
}
