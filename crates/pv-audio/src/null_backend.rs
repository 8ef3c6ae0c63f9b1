//! Device-less output: renders on a plain thread at (roughly) real-time pace.
//!
//! Used on machines without an audio device and by tests that need the full
//! live pipeline. Rendered samples can be tapped through a ring buffer.

use log::{debug, info};
use ringbuf::traits::{Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::traits::{AudioError, AudioOutput, RenderFn, CHANNELS};

pub struct NullOutput {
    sample_rate: u32,
    block_frames: usize,
    paced: bool,
    running: Arc<AtomicBool>,
    frames_rendered: Arc<AtomicU64>,
    tap: Option<HeapProd<f32>>,
    thread: Option<JoinHandle<Option<HeapProd<f32>>>>,
}

impl NullOutput {
    pub fn new(sample_rate: u32, block_frames: usize) -> Self {
        Self {
            sample_rate,
            block_frames: block_frames.max(1),
            paced: true,
            running: Arc::new(AtomicBool::new(false)),
            frames_rendered: Arc::new(AtomicU64::new(0)),
            tap: None,
            thread: None,
        }
    }

    /// Like `new`, plus a consumer that receives every rendered sample
    /// (interleaved stereo). Samples that do not fit in `capacity` are dropped.
    pub fn with_tap(sample_rate: u32, block_frames: usize, capacity: usize) -> (Self, HeapCons<f32>) {
        let (producer, consumer) = HeapRb::<f32>::new(capacity.max(1)).split();
        let mut output = Self::new(sample_rate, block_frames);
        output.tap = Some(producer);
        (output, consumer)
    }

    /// Render as fast as possible instead of sleeping one block per block.
    pub fn unpaced(mut self) -> Self {
        self.paced = false;
        self
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered.load(Ordering::Relaxed)
    }

    fn join(&mut self) {
        if let Some(handle) = self.thread.take() {
            if let Ok(tap) = handle.join() {
                self.tap = tap;
            }
        }
    }
}

impl AudioOutput for NullOutput {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn start(&mut self, mut render: RenderFn) -> Result<(), AudioError> {
        self.stop()?;

        let running = self.running.clone();
        let frames_rendered = self.frames_rendered.clone();
        let mut tap = self.tap.take();
        let block_frames = self.block_frames;
        let block_time = self
            .paced
            .then(|| Duration::from_secs_f64(block_frames as f64 / self.sample_rate.max(1) as f64));

        running.store(true, Ordering::Relaxed);
        let thread = std::thread::Builder::new()
            .name("pv-null-audio".into())
            .spawn(move || {
                let mut buffer = vec![0.0f32; block_frames * CHANNELS];
                while running.load(Ordering::Relaxed) {
                    render(&mut buffer);
                    if let Some(tap) = tap.as_mut() {
                        tap.push_slice(&buffer);
                    }
                    frames_rendered.fetch_add(block_frames as u64, Ordering::Relaxed);
                    if let Some(block_time) = block_time {
                        std::thread::sleep(block_time);
                    }
                }
                tap
            })
            .map_err(|e| AudioError::StreamCreate(e.to_string()))?;

        self.thread = Some(thread);
        info!(
            "null output started: {} Hz, {} frames per block",
            self.sample_rate, self.block_frames
        );
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        if self.thread.is_some() {
            self.running.store(false, Ordering::Relaxed);
            self.join();
            debug!("null output stopped after {} frames", self.frames_rendered());
        }
        Ok(())
    }
}

impl Drop for NullOutput {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        self.join();
    }
}
