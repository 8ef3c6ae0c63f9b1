//! Audio output trait and error types.

/// Interleaved channel count every backend renders.
pub const CHANNELS: usize = 2;

/// Block renderer handed to a backend. Fills an interleaved stereo buffer.
pub type RenderFn = Box<dyn FnMut(&mut [f32]) + Send + 'static>;

/// Error type for audio operations.
#[derive(Debug)]
pub enum AudioError {
    /// Failed to initialize audio device
    DeviceInit(String),
    /// Failed to create audio stream
    StreamCreate(String),
    /// Playback error
    Playback(String),
    /// No audio device available
    NoDevice,
    /// Device cannot play interleaved stereo f32
    UnsupportedFormat(String),
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioError::DeviceInit(msg) => write!(f, "Device init error: {}", msg),
            AudioError::StreamCreate(msg) => write!(f, "Stream create error: {}", msg),
            AudioError::Playback(msg) => write!(f, "Playback error: {}", msg),
            AudioError::NoDevice => write!(f, "No audio device available"),
            AudioError::UnsupportedFormat(msg) => write!(f, "Unsupported output format: {}", msg),
        }
    }
}

impl std::error::Error for AudioError {}

/// Trait for audio output backends.
pub trait AudioOutput {
    /// Get the sample rate.
    fn sample_rate(&self) -> u32;

    /// Start pulling blocks from `render`. Replaces any previous renderer.
    fn start(&mut self, render: RenderFn) -> Result<(), AudioError>;

    /// Stop playback and drop the renderer.
    fn stop(&mut self) -> Result<(), AudioError>;
}
