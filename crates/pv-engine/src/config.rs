//! Engine configuration.

use pv_ir::{ControlRanges, Tuning};

use crate::OUTPUT_GAIN;

/// Settings fixed at startup. Everything here is plain data so it can be
/// built on the host side and handed to the audio context.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Output sample rate in Hz.
    pub sample_rate: f32,
    /// Reference pitch for note-to-frequency conversion.
    pub tuning: Tuning,
    /// Knob-to-parameter mapping.
    pub ranges: ControlRanges,
    /// Gain applied to the voice sum before it is written to the output.
    pub output_gain: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            tuning: Tuning::CONCERT,
            ranges: ControlRanges::DEFAULT,
            output_gain: OUTPUT_GAIN,
        }
    }
}
