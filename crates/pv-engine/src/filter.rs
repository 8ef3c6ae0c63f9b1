//! State-variable filter (topology-preserving transform).
//!
//! Low, band and high outputs come out of the same two integrators. The
//! voice only listens to the low-pass output.

use core::f32::consts::PI;

use crate::finite_or;

/// Lowest cutoff the filter accepts.
const MIN_CUTOFF_HZ: f32 = 20.0;
/// Highest cutoff as a fraction of the sample rate. Keeps `tan` well away from its pole.
const MAX_CUTOFF_RATIO: f32 = 0.45;
/// Damping at full resonance. Never zero, so the filter never self-oscillates without bound.
const MIN_DAMPING: f32 = 0.04;

/// Simultaneous filter responses for one input sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FilterOutputs {
    pub low: f32,
    pub band: f32,
    pub high: f32,
}

#[derive(Clone, Debug)]
pub struct Svf {
    sample_rate: f32,
    cutoff_hz: f32,
    resonance: f32,
    drive: f32,

    // Coefficients, refreshed on every setter call
    g: f32,
    k: f32,
    h: f32,

    ic1eq: f32, // first integrator
    ic2eq: f32, // second integrator
}

impl Svf {
    pub fn new(sample_rate: f32) -> Self {
        let mut svf = Self {
            sample_rate: 48_000.0,
            cutoff_hz: 1_000.0,
            resonance: 0.0,
            drive: 0.0,
            g: 0.0,
            k: 2.0,
            h: 1.0,
            ic1eq: 0.0,
            ic2eq: 0.0,
        };
        svf.configure(sample_rate);
        svf
    }

    /// Set the sample rate and clear the integrators.
    pub fn configure(&mut self, sample_rate: f32) {
        self.sample_rate = finite_or(sample_rate, 48_000.0).max(1.0);
        self.reset();
        self.update_coefficients();
    }

    pub fn set_cutoff_hz(&mut self, hz: f32) {
        self.cutoff_hz = finite_or(hz, self.cutoff_hz);
        self.update_coefficients();
    }

    /// Resonance in 0-1.
    pub fn set_resonance(&mut self, q: f32) {
        self.resonance = finite_or(q, 0.0).clamp(0.0, 1.0);
        self.update_coefficients();
    }

    /// Input saturation amount in 0-1.
    pub fn set_drive(&mut self, d: f32) {
        self.drive = finite_or(d, 0.0).clamp(0.0, 1.0);
    }

    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    pub fn drive(&self) -> f32 {
        self.drive
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    /// Filter one sample.
    pub fn process(&mut self, input: f32) -> FilterOutputs {
        let x = self.saturate(input);

        let v3 = x - self.ic2eq;
        let v1 = self.h * (self.ic1eq + self.g * v3);
        let v2 = self.ic2eq + self.g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            low: v2,
            band: v1,
            high: x - self.k * v1 - v2,
        }
    }

    /// Blend between the clean input and a unit-normalized `tanh` curve.
    #[inline]
    fn saturate(&self, x: f32) -> f32 {
        if self.drive <= 0.0 {
            return x;
        }
        let pre = 1.0 + 4.0 * self.drive;
        let shaped = libm::tanhf(pre * x) / libm::tanhf(pre);
        x + self.drive * (shaped - x)
    }

    fn update_coefficients(&mut self) {
        let fc = self
            .cutoff_hz
            .clamp(MIN_CUTOFF_HZ, self.sample_rate * MAX_CUTOFF_RATIO);
        self.g = libm::tanf(PI * fc / self.sample_rate);
        self.k = 2.0 - (2.0 - MIN_DAMPING) * self.resonance;
        self.h = 1.0 / (1.0 + self.g * (self.g + self.k));
    }
}
