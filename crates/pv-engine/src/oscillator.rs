//! Phase-accumulator oscillator with PolyBLEP band-limiting.

use core::f32::consts::TAU;

use pv_ir::Waveform;

use crate::finite_or;

#[derive(Clone, Debug)]
pub struct Oscillator {
    sample_rate: f32,
    amplitude: f32,
    waveform: Waveform,
    frequency: f32,
    /// Normalized phase in [0, 1).
    phase: f32,
    /// Phase advance per sample.
    phase_inc: f32,
    /// Leaky integrator state for the band-limited triangle.
    tri_state: f32,
}

impl Oscillator {
    pub fn new(sample_rate: f32) -> Self {
        let mut osc = Self {
            sample_rate: 48_000.0,
            amplitude: 1.0,
            waveform: Waveform::Sine,
            frequency: 440.0,
            phase: 0.0,
            phase_inc: 0.0,
            tri_state: 0.0,
        };
        osc.configure(sample_rate, 1.0, Waveform::Sine);
        osc
    }

    pub fn configure(&mut self, sample_rate: f32, amplitude: f32, waveform: Waveform) {
        self.sample_rate = finite_or(sample_rate, 48_000.0).max(1.0);
        self.set_amplitude(amplitude);
        self.waveform = waveform;
        self.phase = 0.0;
        self.tri_state = 0.0;
        self.set_frequency(self.frequency);
    }

    /// Frequency in Hz, clamped below Nyquist.
    pub fn set_frequency(&mut self, hz: f32) {
        let nyquist = self.sample_rate * 0.5;
        self.frequency = finite_or(hz, 0.0).clamp(0.0, nyquist * 0.999);
        self.phase_inc = self.frequency / self.sample_rate;
    }

    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = finite_or(amplitude, 0.0);
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Generate the next sample and advance the phase.
    pub fn produce_sample(&mut self) -> f32 {
        let t = self.phase;
        let dt = self.phase_inc;

        let out = match self.waveform {
            Waveform::Sine => libm::sinf(TAU * t),
            Waveform::Triangle => 2.0 * libm::fabsf(2.0 * t - 1.0) - 1.0,
            Waveform::PolyBlepTriangle => {
                // Leaky integration of the band-limited square; x4 restores unit amplitude.
                let square = polyblep_square(t, dt);
                self.tri_state = dt * square + (1.0 - dt) * self.tri_state;
                self.tri_state * 4.0
            }
            Waveform::PolyBlepSaw => (2.0 * t - 1.0) - polyblep(t, dt),
            Waveform::PolyBlepSquare => polyblep_square(t, dt),
        };

        self.phase += dt;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        out * self.amplitude
    }
}

fn polyblep_square(t: f32, dt: f32) -> f32 {
    let naive = if t < 0.5 { 1.0 } else { -1.0 };
    let mut half = t + 0.5;
    if half >= 1.0 {
        half -= 1.0;
    }
    naive + polyblep(t, dt) - polyblep(half, dt)
}

/// Second-order polynomial correction around a unit step at t = 0 (mod 1).
fn polyblep(t: f32, dt: f32) -> f32 {
    if t < dt {
        let t = t / dt;
        2.0 * t - t * t - 1.0
    } else if t > 1.0 - dt {
        let t = (t - 1.0) / dt;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}
