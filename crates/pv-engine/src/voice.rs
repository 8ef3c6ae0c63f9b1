//! Voice: one monophonic signal path (oscillator → filter, shaped by the envelope).

use pv_ir::{Tuning, VoiceParams, Waveform};

use crate::envelope::Envelope;
use crate::filter::Svf;
use crate::frequency::note_to_freq;
use crate::oscillator::Oscillator;

/// Oscillator amplitude before filtering.
const OSC_AMPLITUDE: f32 = 0.75;

/// A single voice of the pool.
///
/// Voices are built once and reused. "Allocating" one means calling
/// [`note_on`](Voice::note_on) on an inactive voice.
#[derive(Clone, Debug)]
pub struct Voice {
    active: bool,
    gate: bool,
    /// Semitone note number; fractional values allowed.
    note: f32,
    /// 0-127.
    velocity: f32,
    tuning: Tuning,

    osc: Oscillator,
    env: Envelope,
    filter: Svf,
}

impl Voice {
    /// Create an inactive voice with default parameters at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        let mut voice = Self {
            active: false,
            gate: false,
            note: 0.0,
            velocity: 0.0,
            tuning: Tuning::CONCERT,
            osc: Oscillator::new(sample_rate),
            env: Envelope::new(sample_rate),
            filter: Svf::new(sample_rate),
        };
        voice.init(sample_rate);
        voice
    }

    /// Reset to power-on defaults at `sample_rate`. The voice ends up inactive.
    pub fn init(&mut self, sample_rate: f32) {
        let p = VoiceParams::DEFAULT;

        self.osc.configure(sample_rate, OSC_AMPLITUDE, p.waveform);
        self.env = Envelope::new(sample_rate);
        self.env.configure(p.attack, p.decay, p.sustain, p.release);
        self.filter.configure(sample_rate);
        self.filter.set_cutoff_hz(p.cutoff_hz);
        self.filter.set_resonance(p.resonance);
        self.filter.set_drive(p.drive);

        self.active = false;
        self.gate = false;
        self.note = 0.0;
        self.velocity = 0.0;
    }

    /// Render one sample. An inactive voice returns silence without touching its state.
    #[inline]
    pub fn produce_sample(&mut self) -> f32 {
        if !self.active {
            return 0.0;
        }

        let amplitude = self.env.advance(self.gate);
        if !self.env.is_running() {
            // The sample rendered below is this voice's last one.
            self.active = false;
        }

        let out = self.filter.process(self.osc.produce_sample());
        out.low * (self.velocity / 127.0) * amplitude
    }

    /// Start (or retrigger) a note. The envelope picks up from its current level.
    pub fn note_on(&mut self, note: f32, velocity: f32) {
        self.note = note;
        self.velocity = if velocity.is_finite() { velocity.clamp(0.0, 127.0) } else { 0.0 };
        self.osc.set_frequency(note_to_freq(note, &self.tuning));
        self.active = true;
        self.gate = true;
    }

    /// Close the gate. The voice stays active until its release finishes.
    pub fn note_off(&mut self) {
        self.gate = false;
    }

    // === Per-voice parameters (take effect mid-note) ===

    /// Envelope attack time in seconds.
    pub fn set_env_attack(&mut self, seconds: f32) {
        self.env.set_attack(seconds);
    }

    /// Envelope decay time in seconds.
    pub fn set_env_decay(&mut self, seconds: f32) {
        self.env.set_decay(seconds);
    }

    /// Envelope sustain level, 0-1.
    pub fn set_env_sustain(&mut self, level: f32) {
        self.env.set_sustain(level);
    }

    /// Envelope release time in seconds.
    pub fn set_env_release(&mut self, seconds: f32) {
        self.env.set_release(seconds);
    }

    /// Filter cutoff in Hz.
    pub fn set_cutoff(&mut self, hz: f32) {
        self.filter.set_cutoff_hz(hz);
    }

    /// Filter resonance, 0-1.
    pub fn set_resonance(&mut self, resonance: f32) {
        self.filter.set_resonance(resonance);
    }

    /// Resonance drive, 0-1.
    pub fn set_res_drive(&mut self, drive: f32) {
        self.filter.set_drive(drive);
    }

    /// Select the oscillator waveform.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.osc.set_waveform(waveform);
    }

    /// Step to the next waveform, wrapping after the last.
    pub fn increment_waveform(&mut self) {
        self.osc.set_waveform(self.osc.waveform().next());
    }

    /// Reference pitch used by the next `note_on`.
    pub fn set_tuning(&mut self, tuning: Tuning) {
        self.tuning = tuning;
    }

    /// Push a whole parameter block into the voice.
    pub fn apply_params(&mut self, params: &VoiceParams) {
        self.env
            .configure(params.attack, params.decay, params.sustain, params.release);
        self.filter.set_cutoff_hz(params.cutoff_hz);
        self.filter.set_resonance(params.resonance);
        self.filter.set_drive(params.drive);
        self.osc.set_waveform(params.waveform);
    }

    // === Observers ===

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn note(&self) -> f32 {
        self.note
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn is_gate_open(&self) -> bool {
        self.gate
    }

    pub fn waveform(&self) -> Waveform {
        self.osc.waveform()
    }

    pub fn frequency(&self) -> f32 {
        self.osc.frequency()
    }

    pub fn cutoff_hz(&self) -> f32 {
        self.filter.cutoff_hz()
    }

    pub fn envelope(&self) -> &Envelope {
        &self.env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::EnvelopeStage;

    const SR: f32 = 48_000.0;

    fn run(voice: &mut Voice, samples: usize) -> Vec<f32> {
        (0..samples).map(|_| voice.produce_sample()).collect()
    }

    #[test]
    fn new_voice_is_silent_and_inactive() {
        let mut v = Voice::new(SR);
        assert!(!v.is_active());
        assert!(run(&mut v, 64).iter().all(|&s| s == 0.0));
        assert_eq!(v.envelope().stage(), EnvelopeStage::Idle);
    }

    #[test]
    fn init_applies_defaults() {
        let v = Voice::new(SR);
        assert_eq!(v.waveform(), Waveform::Sine);
        assert_eq!(v.cutoff_hz(), 6000.0);
        assert!(!v.is_gate_open());
    }

    #[test]
    fn note_on_activates_and_tunes() {
        let mut v = Voice::new(SR);
        v.note_on(69.0, 100.0);
        assert!(v.is_active());
        assert!(v.is_gate_open());
        assert_eq!(v.note(), 69.0);
        assert_eq!(v.velocity(), 100.0);
        assert!((v.frequency() - 440.0).abs() < 0.01);
    }

    #[test]
    fn note_on_produces_sound_within_attack() {
        let mut v = Voice::new(SR);
        v.note_on(60.0, 100.0);
        // 5 ms attack at 48 kHz = 240 samples
        let out = run(&mut v, 240);
        assert!(out.iter().any(|s| s.abs() > 1e-4));
        assert!(out.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn note_off_only_closes_gate() {
        let mut v = Voice::new(SR);
        v.note_on(60.0, 100.0);
        run(&mut v, 100);
        v.note_off();
        assert!(!v.is_gate_open());
        assert!(v.is_active());
    }

    #[test]
    fn released_voice_goes_silent_after_release_time() {
        let mut v = Voice::new(SR);
        v.note_on(60.0, 127.0);
        run(&mut v, 2_000);
        v.note_off();
        // release 200 ms = 9600 samples, plus one for the final step
        run(&mut v, 9_601);
        assert!(!v.is_active());
        assert_eq!(v.produce_sample(), 0.0);
    }

    #[test]
    fn deactivating_sample_is_still_rendered() {
        let mut v = Voice::new(SR);
        v.set_env_release(0.0);
        v.note_on(60.0, 127.0);
        run(&mut v, 2_000);
        let sustained = v.produce_sample();
        assert!(sustained != 0.0);

        v.note_off();
        // Zero release: the next call ends the envelope and deactivates.
        let last = v.produce_sample();
        assert!(!v.is_active());
        assert_eq!(v.envelope().stage(), EnvelopeStage::Idle);
        assert_eq!(last, 0.0);
        assert_eq!(v.envelope().level(), 0.0);
    }

    #[test]
    fn output_scales_with_velocity() {
        let mut loud = Voice::new(SR);
        let mut soft = Voice::new(SR);
        loud.note_on(57.0, 127.0);
        soft.note_on(57.0, 63.5);

        let a = run(&mut loud, 2_000);
        let b = run(&mut soft, 2_000);
        assert!(a.iter().any(|s| s.abs() > 1e-3));
        for (i, (a, b)) in a.iter().zip(&b).enumerate() {
            assert!((b - 0.5 * a).abs() <= 1e-6, "sample {i}: {b} vs {a}");
        }
    }

    #[test]
    fn zero_velocity_voice_is_silent_but_active() {
        let mut v = Voice::new(SR);
        v.note_on(60.0, 0.0);
        assert!(run(&mut v, 500).iter().all(|&s| s == 0.0));
        assert!(v.is_active());
    }

    #[test]
    fn retrigger_does_not_restart_envelope() {
        let mut v = Voice::new(SR);
        v.note_on(60.0, 100.0);
        run(&mut v, 2_000);
        v.note_off();
        run(&mut v, 960);
        let level = v.envelope().level();
        assert!(level > 0.0);

        v.note_on(62.0, 100.0);
        v.produce_sample();
        assert!(v.envelope().level() >= level);
        assert_eq!(v.note(), 62.0);
    }

    #[test]
    fn increment_waveform_wraps() {
        let mut v = Voice::new(SR);
        for expected in Waveform::CYCLE.iter().skip(1) {
            v.increment_waveform();
            assert_eq!(v.waveform(), *expected);
        }
        v.increment_waveform();
        assert_eq!(v.waveform(), Waveform::Sine);
    }

    #[test]
    fn apply_params_reaches_an_inactive_voice() {
        let mut v = Voice::new(SR);
        let params = VoiceParams {
            cutoff_hz: 1234.0,
            waveform: Waveform::PolyBlepSaw,
            ..VoiceParams::DEFAULT
        };
        v.apply_params(&params);
        assert_eq!(v.cutoff_hz(), 1234.0);
        assert_eq!(v.waveform(), Waveform::PolyBlepSaw);
        assert!(!v.is_active());
    }

    #[test]
    fn tuning_changes_note_frequency() {
        let mut v = Voice::new(SR);
        v.set_tuning(Tuning { reference_hz: 432.0, reference_note: 69.0 });
        v.note_on(69.0, 100.0);
        assert!((v.frequency() - 432.0).abs() < 0.01);
    }

    #[test]
    fn fractional_notes_are_allowed() {
        let mut v = Voice::new(SR);
        v.note_on(69.5, 100.0);
        assert!(v.frequency() > 440.0 && v.frequency() < 466.17);
    }
}
