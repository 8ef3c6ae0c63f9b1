//! Host-side control surface: a panel of knobs, CVs and switches that any
//! thread may write, and a scanner that samples it into the control queue.

use log::{debug, warn};
use pv_engine::{ControlRanges, ControlSnapshot, Sender, VoiceParams, NUM_CVS, NUM_KNOBS, NUM_SWITCHES};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::ring::RingSender;

/// Current control positions, stored as atomics so a UI or test thread can
/// move them while the scanner reads.
pub struct ControlPanel {
    knobs: [AtomicU32; NUM_KNOBS],
    cvs: [AtomicU32; NUM_CVS],
    switches: [AtomicBool; NUM_SWITCHES],
}

impl ControlPanel {
    /// Panel with knobs set to reproduce the default voice parameters.
    pub fn new(ranges: &ControlRanges) -> Self {
        let panel = Self {
            knobs: std::array::from_fn(|_| AtomicU32::new(0)),
            cvs: std::array::from_fn(|_| AtomicU32::new(0)),
            switches: std::array::from_fn(|_| AtomicBool::new(false)),
        };
        for (i, value) in ranges.knobs_for(&VoiceParams::DEFAULT).into_iter().enumerate() {
            panel.set_knob(i, value);
        }
        panel
    }

    /// Set knob `index` (0-1). Returns false for an unknown knob.
    pub fn set_knob(&self, index: usize, value: f32) -> bool {
        store_f32(self.knobs.get(index), value)
    }

    pub fn set_cv(&self, index: usize, value: f32) -> bool {
        store_f32(self.cvs.get(index), value)
    }

    pub fn set_switch(&self, index: usize, pressed: bool) -> bool {
        match self.switches.get(index) {
            Some(switch) => {
                switch.store(pressed, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    pub fn knob(&self, index: usize) -> Option<f32> {
        self.knobs.get(index).map(load_f32)
    }

    /// Read every control at once.
    pub fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot {
            knobs: std::array::from_fn(|i| load_f32(&self.knobs[i])),
            cvs: std::array::from_fn(|i| load_f32(&self.cvs[i])),
            switches: std::array::from_fn(|i| self.switches[i].load(Ordering::Relaxed)),
        }
    }
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new(&ControlRanges::DEFAULT)
    }
}

fn store_f32(slot: Option<&AtomicU32>, value: f32) -> bool {
    match slot {
        Some(slot) => {
            slot.store(value.to_bits(), Ordering::Relaxed);
            true
        }
        None => false,
    }
}

fn load_f32(slot: &AtomicU32) -> f32 {
    f32::from_bits(slot.load(Ordering::Relaxed))
}

/// Background thread that samples a [`ControlPanel`] every `interval` and
/// forwards changed snapshots to the audio context.
pub struct ControlScanner {
    stop_signal: Arc<AtomicBool>,
    dropped: Arc<AtomicUsize>,
    thread: Option<JoinHandle<()>>,
}

impl ControlScanner {
    pub fn spawn(
        panel: Arc<ControlPanel>,
        mut sender: RingSender<ControlSnapshot>,
        interval: Duration,
    ) -> std::io::Result<Self> {
        let stop_signal = Arc::new(AtomicBool::new(false));
        let dropped = Arc::new(AtomicUsize::new(0));

        let stop = stop_signal.clone();
        let drops = dropped.clone();
        let thread = std::thread::Builder::new()
            .name("pv-controls".into())
            .spawn(move || {
                let mut last: Option<ControlSnapshot> = None;
                while !stop.load(Ordering::Relaxed) {
                    let snapshot = panel.snapshot();
                    if last != Some(snapshot) {
                        if sender.try_send(snapshot).is_ok() {
                            last = Some(snapshot);
                        } else {
                            // Retried on the next scan.
                            drops.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                    std::thread::sleep(interval);
                }
            })?;

        debug!("control scanner started, interval {:?}", interval);
        Ok(Self {
            stop_signal,
            dropped,
            thread: Some(thread),
        })
    }

    /// Snapshots that found the queue full.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn stop(&mut self) {
        self.stop_signal.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                warn!("control scanner thread panicked");
            }
            let dropped = self.dropped();
            if dropped > 0 {
                warn!("control queue was full {} times", dropped);
            }
        }
    }
}

impl Drop for ControlScanner {
    fn drop(&mut self) {
        self.stop();
    }
}
