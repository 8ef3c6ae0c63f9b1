//! Oscillator waveform selection.

/// Oscillator waveform.
///
/// The order of `CYCLE` is the order the waveform switch steps through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Waveform {
    #[default]
    Sine,
    /// Naive triangle.
    Triangle,
    /// Band-limited triangle (integrated PolyBLEP square).
    PolyBlepTriangle,
    /// Band-limited sawtooth.
    PolyBlepSaw,
    /// Band-limited square.
    PolyBlepSquare,
}

impl Waveform {
    /// Waveforms in switch order.
    pub const CYCLE: [Waveform; 5] = [
        Waveform::Sine,
        Waveform::Triangle,
        Waveform::PolyBlepTriangle,
        Waveform::PolyBlepSaw,
        Waveform::PolyBlepSquare,
    ];

    /// Position in `CYCLE`.
    pub fn index(self) -> usize {
        match self {
            Waveform::Sine => 0,
            Waveform::Triangle => 1,
            Waveform::PolyBlepTriangle => 2,
            Waveform::PolyBlepSaw => 3,
            Waveform::PolyBlepSquare => 4,
        }
    }

    /// Waveform at `index`, wrapping.
    pub fn from_index(index: usize) -> Self {
        Self::CYCLE[index % Self::CYCLE.len()]
    }

    /// The waveform after this one, wrapping back to `Sine`.
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "Sine",
            Waveform::Triangle => "Triangle",
            Waveform::PolyBlepTriangle => "BL Triangle",
            Waveform::PolyBlepSaw => "BL Saw",
            Waveform::PolyBlepSquare => "BL Square",
        }
    }
}
