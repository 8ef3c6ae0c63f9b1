//! Control-rate inputs: knob/CV snapshot and knob-to-parameter ranges.

use crate::params::VoiceParams;

/// Number of continuous knobs.
pub const NUM_KNOBS: usize = 8;
/// Number of CV inputs.
pub const NUM_CVS: usize = 4;
/// Number of momentary switches.
pub const NUM_SWITCHES: usize = 2;

/// Control readings taken once per audio block.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlSnapshot {
    /// Knob positions, normalized to 0-1.
    pub knobs: [f32; NUM_KNOBS],
    /// CV inputs in their raw range. Read but not mapped to anything yet.
    pub cvs: [f32; NUM_CVS],
    /// Momentary switches, true while held.
    /// Switch 0 frees all voices, switch 1 cycles the waveform (on release).
    pub switches: [bool; NUM_SWITCHES],
}

impl ControlSnapshot {
    pub const SWITCH_FREE_ALL: usize = 0;
    pub const SWITCH_WAVEFORM: usize = 1;

    /// Snapshot with the given knob positions, CVs at zero, switches open.
    pub fn with_knobs(knobs: [f32; NUM_KNOBS]) -> Self {
        Self { knobs, ..Self::default() }
    }
}

/// A linear mapping from a normalized knob position to a parameter value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Map `x` linearly into the range. Input is clamped to 0-1 and NaN reads as 0.
    pub fn map(&self, x: f32) -> f32 {
        let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };
        self.min + x * (self.max - self.min)
    }

    /// Knob position that maps to `value`, clamped to 0-1. A degenerate range reads as 0.
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.max - self.min;
        if span == 0.0 || !span.is_finite() || value.is_nan() {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

/// Knob assignments: knob 0..=6 drive cutoff, resonance, drive, attack,
/// decay, sustain and release. Knob 7 is unassigned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlRanges {
    pub cutoff_hz: ParamRange,
    pub resonance: ParamRange,
    pub drive: ParamRange,
    pub attack: ParamRange,
    pub decay: ParamRange,
    pub sustain: ParamRange,
    pub release: ParamRange,
}

impl ControlRanges {
    pub const DEFAULT: Self = Self {
        cutoff_hz: ParamRange::new(250.0, 8250.0),
        resonance: ParamRange::new(0.0, 1.0),
        drive: ParamRange::new(0.0, 1.0),
        attack: ParamRange::new(0.0, 0.5),
        decay: ParamRange::new(0.0, 3.0),
        sustain: ParamRange::new(0.0, 0.5),
        release: ParamRange::new(0.0, 1.0),
    };

    /// Write the knob-derived parameters into `params`, leaving the waveform alone.
    pub fn apply(&self, knobs: &[f32; NUM_KNOBS], params: &mut VoiceParams) {
        params.cutoff_hz = self.cutoff_hz.map(knobs[0]);
        params.resonance = self.resonance.map(knobs[1]);
        params.drive = self.drive.map(knobs[2]);
        params.attack = self.attack.map(knobs[3]);
        params.decay = self.decay.map(knobs[4]);
        params.sustain = self.sustain.map(knobs[5]);
        params.release = self.release.map(knobs[6]);
    }

    /// Knob positions that reproduce `params`. Knob 7 stays at 0.
    pub fn knobs_for(&self, params: &VoiceParams) -> [f32; NUM_KNOBS] {
        let mut knobs = [0.0; NUM_KNOBS];
        knobs[0] = self.cutoff_hz.normalize(params.cutoff_hz);
        knobs[1] = self.resonance.normalize(params.resonance);
        knobs[2] = self.drive.normalize(params.drive);
        knobs[3] = self.attack.normalize(params.attack);
        knobs[4] = self.decay.normalize(params.decay);
        knobs[5] = self.sustain.normalize(params.sustain);
        knobs[6] = self.release.normalize(params.release);
        knobs
    }
}

impl Default for ControlRanges {
    fn default() -> Self {
        Self::DEFAULT
    }
}
