//! Equal-temperament tuning reference.

/// Reference pitch for note-to-frequency conversion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    /// Frequency of `reference_note` in Hz.
    pub reference_hz: f32,
    /// Note number that sounds at `reference_hz`.
    pub reference_note: f32,
}

impl Tuning {
    /// A4 = 440 Hz = note 69.
    pub const CONCERT: Self = Self { reference_hz: 440.0, reference_note: 69.0 };
}

impl Default for Tuning {
    fn default() -> Self {
        Self::CONCERT
    }
}
