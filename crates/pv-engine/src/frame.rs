//! Audio frame type.

/// A stereo audio frame (16-bit integer), the unit the WAV writer and the
/// host backend exchange.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    pub left: i16,
    pub right: i16,
}

impl Frame {
    /// Create a silent frame.
    pub const fn silence() -> Self {
        Self { left: 0, right: 0 }
    }

    /// Create a mono frame (same value for both channels).
    pub const fn mono(value: i16) -> Self {
        Self {
            left: value,
            right: value,
        }
    }

    /// Quantize a float stereo pair. Input is clamped to [-1, 1], NaN becomes silence.
    pub fn from_f32(left: f32, right: f32) -> Self {
        Self {
            left: quantize(left),
            right: quantize(right),
        }
    }

    /// Convert an interleaved stereo float block, one frame per pair.
    pub fn from_interleaved(block: &[f32]) -> impl Iterator<Item = Frame> + '_ {
        block.chunks_exact(2).map(|pair| Frame::from_f32(pair[0], pair[1]))
    }
}

fn quantize(x: f32) -> i16 {
    if x.is_nan() {
        return 0;
    }
    (x.clamp(-1.0, 1.0) * 32767.0) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_f32_scales_and_clamps() {
        assert_eq!(Frame::from_f32(0.0, 0.0), Frame::silence());
        assert_eq!(Frame::from_f32(1.0, -1.0), Frame { left: 32767, right: -32767 });
        assert_eq!(Frame::from_f32(4.0, -4.0), Frame { left: 32767, right: -32767 });
        assert_eq!(Frame::from_f32(f32::NAN, 0.5), Frame { left: 0, right: 16383 });
    }

    #[test]
    fn interleaved_block_drops_trailing_sample() {
        let block = [0.5, 0.5, -0.5, -0.5, 0.25];
        let frames: Vec<Frame> = Frame::from_interleaved(&block).collect();
        assert_eq!(frames, vec![Frame::mono(16383), Frame::mono(-16383)]);
    }
}
