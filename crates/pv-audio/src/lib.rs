//! Audio output backends for polyvoice.
//!
//! A backend pulls interleaved stereo blocks from a render closure. The
//! closure runs on the backend's own thread and must not block.

mod cpal_backend;
mod null_backend;
mod traits;

pub use cpal_backend::CpalOutput;
pub use null_backend::NullOutput;
pub use traits::{AudioError, AudioOutput, RenderFn, CHANNELS};
