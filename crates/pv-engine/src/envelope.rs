//! Gate-driven ADSR envelope generator.
//!
//! The envelope watches the gate it is fed each sample: a rising edge enters
//! Attack and a falling edge enters Release, both starting from the current
//! level. Retriggering a releasing envelope therefore ramps up from wherever
//! it is instead of snapping back to zero.
//!
//! Ramps are linear with a slope of full scale per stage time, so a release
//! from any level completes within `release` seconds.

use crate::finite_or;

/// Envelope state machine stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvelopeStage {
    /// Not triggered, or release finished. Level is 0.
    Idle,
    /// Ramping up to 1.0.
    Attack,
    /// Ramping down to the sustain level.
    Decay,
    /// Holding the sustain level while the gate is open.
    Sustain,
    /// Gate closed, ramping down to 0.
    Release,
}

#[derive(Clone, Debug)]
pub struct Envelope {
    sample_rate: f32,
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,

    stage: EnvelopeStage,
    level: f32,
    /// Gate seen on the previous `advance` (for edge detection).
    gate: bool,
}

impl Envelope {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate: finite_or(sample_rate, 48_000.0).max(1.0),
            attack: 0.01,
            decay: 0.1,
            sustain: 0.7,
            release: 0.3,
            stage: EnvelopeStage::Idle,
            level: 0.0,
            gate: false,
        }
    }

    /// Set all four parameters at once. Times in seconds.
    pub fn configure(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.set_attack(attack);
        self.set_decay(decay);
        self.set_sustain(sustain);
        self.set_release(release);
    }

    pub fn set_attack(&mut self, seconds: f32) {
        self.attack = sanitize_time(seconds);
    }

    pub fn set_decay(&mut self, seconds: f32) {
        self.decay = sanitize_time(seconds);
    }

    pub fn set_sustain(&mut self, level: f32) {
        self.sustain = finite_or(level, 0.0).clamp(0.0, 1.0);
    }

    pub fn set_release(&mut self, seconds: f32) {
        self.release = sanitize_time(seconds);
    }

    /// Advance one sample with the current gate state and return the level.
    pub fn advance(&mut self, gate: bool) -> f32 {
        if gate && !self.gate {
            self.stage = EnvelopeStage::Attack;
        } else if !gate && self.gate && self.stage != EnvelopeStage::Idle {
            self.stage = EnvelopeStage::Release;
        }
        self.gate = gate;

        match self.stage {
            EnvelopeStage::Idle => {
                self.level = 0.0;
            }
            EnvelopeStage::Attack => {
                self.level += self.step(self.attack);
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }
            EnvelopeStage::Decay => {
                if self.level > self.sustain {
                    self.level -= self.step(self.decay);
                }
                if self.level <= self.sustain {
                    self.level = self.sustain;
                    self.stage = EnvelopeStage::Sustain;
                }
            }
            EnvelopeStage::Sustain => {
                self.level = self.sustain;
            }
            EnvelopeStage::Release => {
                self.level -= self.step(self.release);
                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }

        self.level
    }

    /// False when never triggered or once the release has reached zero.
    pub fn is_running(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    /// Per-sample level change for a full-scale ramp lasting `seconds`.
    /// Anything shorter than one sample completes in one sample.
    #[inline]
    fn step(&self, seconds: f32) -> f32 {
        let samples = seconds * self.sample_rate;
        if samples <= 1.0 {
            1.0
        } else {
            1.0 / samples
        }
    }
}

fn sanitize_time(seconds: f32) -> f32 {
    finite_or(seconds, 0.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    fn env(attack: f32, decay: f32, sustain: f32, release: f32) -> Envelope {
        let mut e = Envelope::new(SAMPLE_RATE);
        e.configure(attack, decay, sustain, release);
        e
    }

    fn run(e: &mut Envelope, gate: bool, samples: usize) -> f32 {
        let mut level = e.level();
        for _ in 0..samples {
            level = e.advance(gate);
        }
        level
    }

    #[test]
    fn never_triggered_is_not_running() {
        let mut e = env(0.01, 0.01, 0.5, 0.1);
        assert!(!e.is_running());
        assert_eq!(e.advance(false), 0.0);
        assert!(!e.is_running());
    }

    #[test]
    fn attack_reaches_full_level() {
        let mut e = env(0.01, 0.1, 0.5, 0.1);
        run(&mut e, true, 11);
        assert!(e.level() > 0.98);
        assert_eq!(e.stage(), EnvelopeStage::Decay);
    }

    #[test]
    fn decay_settles_on_sustain() {
        let mut e = env(0.01, 0.02, 0.4, 0.1);
        run(&mut e, true, 10 + 20 + 2);
        assert_eq!(e.stage(), EnvelopeStage::Sustain);
        assert_eq!(e.level(), 0.4);
        assert!(e.is_running());
    }

    #[test]
    fn sustain_holds_while_gate_open() {
        let mut e = env(0.001, 0.001, 0.6, 0.1);
        let level = run(&mut e, true, 1000);
        assert_eq!(level, 0.6);
        assert!(e.is_running());
    }

    #[test]
    fn release_finishes_within_release_time() {
        let mut e = env(0.001, 0.001, 1.0, 0.05);
        run(&mut e, true, 10);
        run(&mut e, false, 50 + 1);
        assert_eq!(e.level(), 0.0);
        assert!(!e.is_running());
    }

    #[test]
    fn release_starts_from_current_level_during_attack() {
        let mut e = env(0.1, 0.1, 0.5, 0.1);
        run(&mut e, true, 20);
        let before = e.level();
        assert!(before > 0.1 && before < 0.3);
        let after = e.advance(false);
        assert_eq!(e.stage(), EnvelopeStage::Release);
        assert!(after < before && after > before - 0.02);
    }

    #[test]
    fn retrigger_continues_from_current_level() {
        let mut e = env(0.01, 0.01, 0.8, 0.5);
        run(&mut e, true, 100);
        run(&mut e, false, 100);
        let released = e.level();
        assert!(released > 0.2 && released < 0.8);

        let retriggered = e.advance(true);
        assert_eq!(e.stage(), EnvelopeStage::Attack);
        assert!(retriggered > released, "attack should ramp up from {released}");
        assert!(retriggered - released < 0.2, "no jump back to zero");
    }

    #[test]
    fn zero_times_complete_in_one_sample() {
        let mut e = env(0.0, 0.0, 0.5, 0.0);
        assert_eq!(e.advance(true), 1.0);
        assert_eq!(e.advance(true), 0.5);
        assert_eq!(e.advance(false), 0.0);
        assert!(!e.is_running());
    }

    #[test]
    fn zero_sustain_keeps_running_while_gate_held() {
        let mut e = env(0.001, 0.001, 0.0, 0.1);
        let level = run(&mut e, true, 100);
        assert_eq!(level, 0.0);
        assert!(e.is_running());
        e.advance(false);
        assert!(!e.is_running());
    }

    #[test]
    fn release_time_change_applies_mid_release() {
        let mut e = env(0.001, 0.001, 1.0, 10.0);
        run(&mut e, true, 5);
        run(&mut e, false, 10);
        assert!(e.is_running());
        e.set_release(0.01);
        run(&mut e, false, 11);
        assert!(!e.is_running());
    }

    #[test]
    fn nan_parameters_are_ignored_safely() {
        let mut e = env(f32::NAN, f32::NAN, f32::NAN, f32::NAN);
        for _ in 0..10 {
            assert!(e.advance(true).is_finite());
        }
        for _ in 0..10 {
            assert!(e.advance(false).is_finite());
        }
    }
}
