//! Real-time audio callback.
//!
//! Owns the voice pool outright. The MIDI side reaches it only through the
//! command queue and the control side only through the snapshot queue, so
//! nothing here locks or waits.

use pv_ir::{ControlRanges, ControlSnapshot, VoiceCommand};

use crate::config::EngineConfig;
use crate::link::{EdgeDetector, Receiver};
use crate::voice_manager::VoiceManager;
use crate::MAX_VOICES;

/// Block renderer driven by the audio backend.
///
/// `C` delivers [`VoiceCommand`]s from the MIDI loop, `K` delivers
/// [`ControlSnapshot`]s from the control scanner.
pub struct AudioCallback<C, K, const N: usize = MAX_VOICES> {
    voices: VoiceManager<N>,
    commands: C,
    controls: K,

    ranges: ControlRanges,
    output_gain: f32,

    free_all_switch: EdgeDetector,
    waveform_switch: EdgeDetector,
    /// Most recent snapshot. Knobs are not applied until one has arrived.
    latest: Option<ControlSnapshot>,
}

impl<C, K, const N: usize> AudioCallback<C, K, N>
where
    C: Receiver<VoiceCommand>,
    K: Receiver<ControlSnapshot>,
{
    pub fn new(voices: VoiceManager<N>, commands: C, controls: K, config: &EngineConfig) -> Self {
        Self {
            voices,
            commands,
            controls,
            ranges: config.ranges,
            output_gain: config.output_gain,
            free_all_switch: EdgeDetector::new(),
            waveform_switch: EdgeDetector::new(),
            latest: None,
        }
    }

    /// Render one interleaved stereo block, reading controls from the snapshot queue.
    pub fn process(&mut self, out: &mut [f32]) {
        #[cfg(feature = "alloc_check")]
        assert_no_alloc::assert_no_alloc(|| self.process_queued(out));
        #[cfg(not(feature = "alloc_check"))]
        self.process_queued(out);
    }

    /// Render one block with a snapshot read on the audio context itself.
    /// Queued commands are still applied first.
    pub fn process_with(&mut self, snapshot: &ControlSnapshot, out: &mut [f32]) {
        self.apply_commands();
        self.take_snapshot(snapshot);
        self.apply_knobs();
        self.render(out);
    }

    pub fn voices(&self) -> &VoiceManager<N> {
        &self.voices
    }

    pub fn voices_mut(&mut self) -> &mut VoiceManager<N> {
        &mut self.voices
    }

    /// Last control snapshot seen, if any.
    pub fn latest_controls(&self) -> Option<&ControlSnapshot> {
        self.latest.as_ref()
    }

    fn process_queued(&mut self, out: &mut [f32]) {
        self.apply_commands();
        while let Some(snapshot) = self.controls.try_recv() {
            self.take_snapshot(&snapshot);
        }
        self.apply_knobs();
        self.render(out);
    }

    fn apply_commands(&mut self) {
        while let Some(command) = self.commands.try_recv() {
            match command {
                VoiceCommand::NoteOn { note, velocity } => {
                    self.voices.note_on(note, velocity);
                }
                VoiceCommand::NoteOff { note, velocity } => self.voices.note_off(note, velocity),
                VoiceCommand::FreeAll => self.voices.free_all_voices(),
            }
        }
    }

    /// Switch actions fire on release; every snapshot goes through the
    /// detectors so a press shorter than a block is not lost.
    fn take_snapshot(&mut self, snapshot: &ControlSnapshot) {
        let switches = snapshot.switches;
        if self
            .free_all_switch
            .falling(switches[ControlSnapshot::SWITCH_FREE_ALL])
        {
            self.voices.free_all_voices();
        }
        if self
            .waveform_switch
            .falling(switches[ControlSnapshot::SWITCH_WAVEFORM])
        {
            self.voices.increment_waveform();
        }
        self.latest = Some(*snapshot);
    }

    fn apply_knobs(&mut self) {
        let Some(snapshot) = self.latest.as_ref() else { return };
        let mut params = *self.voices.params();
        self.ranges.apply(&snapshot.knobs, &mut params);
        if params != *self.voices.params() {
            self.voices.apply_params(&params);
        }
    }

    fn render(&mut self, out: &mut [f32]) {
        let mut frames = out.chunks_exact_mut(2);
        for frame in &mut frames {
            let sample = self.voices.produce_sample() * self.output_gain;
            frame[0] = sample;
            frame[1] = sample;
        }
        for sample in frames.into_remainder() {
            *sample = 0.0;
        }
    }
}
