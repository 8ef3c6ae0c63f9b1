//! Note-to-frequency conversion (12-tone equal temperament).

use pv_ir::Tuning;

/// Convert a (possibly fractional) note number to Hz under `tuning`.
pub fn note_to_freq(note: f32, tuning: &Tuning) -> f32 {
    tuning.reference_hz * libm::exp2f((note - tuning.reference_note) / 12.0)
}

/// Note number to Hz at concert pitch (A4 = 440 Hz = note 69).
pub fn mtof(note: f32) -> f32 {
    note_to_freq(note, &Tuning::CONCERT)
}
