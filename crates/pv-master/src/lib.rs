//! Headless controller for polyvoice.
//!
//! Wires the engine to the outside world: an audio backend pulling blocks
//! from the [`AudioCallback`](pv_engine::AudioCallback), a MIDI input queue
//! drained by [`Controller::run_midi_loop`], and a control panel sampled by
//! a scanner thread. Also renders scripted phrases offline to WAV.

mod controls;
mod midi;
mod phrase;
mod ring;
mod wav;

use log::{debug, info, warn};
use pv_engine::{
    AudioCallback, CommandSender, Disconnected, MidiDispatcher, VoiceCommand, VoiceManager, COMMAND_QUEUE_LEN,
    CONTROL_QUEUE_LEN,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub use controls::{ControlPanel, ControlScanner};
pub use midi::{MidiInput, MidiInputHandle, MIDI_QUEUE_LEN};
pub use phrase::Phrase;
pub use ring::{channel, RingReceiver, RingSender};
pub use wav::{frames_to_wav, save_wav, write_wav};

// Re-export common types so callers don't need the lower crates directly.
pub use pv_audio::{AudioError, AudioOutput, CpalOutput, NullOutput};
pub use pv_engine::{EngineConfig, Frame, MidiEvent, MidiKind, VoiceParams, Waveform, MAX_VOICES, MIDI_CHANNEL};

/// How often the control scanner samples the panel.
const SCAN_INTERVAL: Duration = Duration::from_millis(5);
/// Sleep between empty MIDI polls.
const MIDI_POLL_INTERVAL: Duration = Duration::from_millis(1);
/// Frames per block for offline rendering (blocks are also split at events).
const RENDER_BLOCK: usize = 64;

/// Error type for controller operations.
#[derive(Debug)]
pub enum ControllerError {
    /// The audio backend failed
    Audio(AudioError),
    /// A thread or file operation failed
    Io(std::io::Error),
    /// Live operation requested before `start`
    NotRunning,
}

impl std::fmt::Display for ControllerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControllerError::Audio(e) => write!(f, "Audio error: {}", e),
            ControllerError::Io(e) => write!(f, "I/O error: {}", e),
            ControllerError::NotRunning => write!(f, "Controller is not running"),
        }
    }
}

impl std::error::Error for ControllerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ControllerError::Audio(e) => Some(e),
            ControllerError::Io(e) => Some(e),
            ControllerError::NotRunning => None,
        }
    }
}

impl From<AudioError> for ControllerError {
    fn from(e: AudioError) -> Self {
        ControllerError::Audio(e)
    }
}

impl From<std::io::Error> for ControllerError {
    fn from(e: std::io::Error) -> Self {
        ControllerError::Io(e)
    }
}

/// Headless synth controller. Owns the control panel and, while running,
/// the live session.
pub struct Controller {
    config: EngineConfig,
    panel: Arc<ControlPanel>,
    dispatcher: MidiDispatcher,
    session: Option<Session>,
}

struct Session {
    output: Box<dyn AudioOutput>,
    midi: MidiInput,
    commands: CommandSender<RingSender<VoiceCommand>>,
    scanner: ControlScanner,
    reported_drops: usize,
}

impl Controller {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            panel: Arc::new(ControlPanel::new(&config.ranges)),
            config,
            dispatcher: MidiDispatcher::new(),
            session: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Shared control panel. Writes from any thread reach the engine on the next scan.
    pub fn panel(&self) -> Arc<ControlPanel> {
        self.panel.clone()
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    // --- Live operation ---

    /// Bring the synth up on `output`: voice pool at the device rate, MIDI
    /// input, control scanning, then audio. Returns the handle MIDI events
    /// are pushed into.
    pub fn start(&mut self, mut output: Box<dyn AudioOutput>) -> Result<MidiInputHandle, ControllerError> {
        self.stop();

        let sample_rate = output.sample_rate();
        let config = EngineConfig {
            sample_rate: sample_rate as f32,
            ..self.config
        };

        let voices: VoiceManager = VoiceManager::from_config(&config);
        info!("voice pool: {} voices at {} Hz", voices.capacity(), sample_rate);

        let (midi, handle) = MidiInput::new(MIDI_QUEUE_LEN);
        debug!("midi input queue: {} events", MIDI_QUEUE_LEN);

        let (command_tx, command_rx) = ring::channel(COMMAND_QUEUE_LEN);
        let (control_tx, control_rx) = ring::channel(CONTROL_QUEUE_LEN);
        let scanner = ControlScanner::spawn(self.panel.clone(), control_tx, SCAN_INTERVAL)?;

        let mut callback = AudioCallback::new(voices, command_rx, control_rx, &config);
        output.start(Box::new(move |out: &mut [f32]| callback.process(out)))?;

        self.session = Some(Session {
            output,
            midi,
            commands: CommandSender::new(command_tx),
            scanner,
            reported_drops: 0,
        });
        info!("polyvoice running");
        Ok(handle)
    }

    /// Drain pending MIDI once. Returns the number of events consumed.
    pub fn poll_midi(&mut self) -> Result<usize, ControllerError> {
        let session = self.session.as_mut().ok_or(ControllerError::NotRunning)?;
        let consumed = self.dispatcher.drain(&mut session.midi, &mut session.commands);

        let dropped = session.commands.dropped();
        if dropped > session.reported_drops {
            warn!(
                "command queue full, {} commands dropped",
                dropped - session.reported_drops
            );
            session.reported_drops = dropped;
        }
        if consumed > 0 {
            debug!("dispatched {} midi events", consumed);
        }
        Ok(consumed)
    }

    /// Drain MIDI until `stop` is raised.
    pub fn run_midi_loop(&mut self, stop: &AtomicBool) -> Result<(), ControllerError> {
        info!("midi loop running on channel {}", self.dispatcher.channel() + 1);
        while !stop.load(Ordering::Relaxed) {
            if self.poll_midi()? == 0 {
                std::thread::sleep(MIDI_POLL_INTERVAL);
            }
        }
        info!("midi loop stopped");
        Ok(())
    }

    /// Release every voice.
    pub fn free_all(&mut self) -> Result<(), ControllerError> {
        let session = self.session.as_mut().ok_or(ControllerError::NotRunning)?;
        session.commands.free_all();
        Ok(())
    }

    /// Stop audio and control scanning. A no-op when not running.
    pub fn stop(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.scanner.stop();
            if let Err(e) = session.output.stop() {
                warn!("stopping audio output: {}", e);
            }
            info!("polyvoice stopped");
        }
    }

    // --- Offline rendering ---

    /// Render `frames` frames of `phrase` at the configured sample rate with
    /// the panel's current settings. Events land exactly on their frame.
    pub fn render_frames(&self, phrase: &Phrase, frames: usize) -> Vec<Frame> {
        let voices: VoiceManager = VoiceManager::from_config(&self.config);
        let (tx, rx) = ring::channel(COMMAND_QUEUE_LEN);
        let mut commands = CommandSender::new(tx);
        let mut callback = AudioCallback::new(voices, rx, Disconnected, &self.config);
        let snapshot = self.panel.snapshot();

        let mut events = phrase.events().iter().peekable();
        let mut rendered = Vec::with_capacity(frames);
        let mut block = [0.0f32; RENDER_BLOCK * 2];
        let total = frames as u64;
        let mut pos = 0u64;

        while pos < total {
            while let Some((_, event)) = events.next_if(|(at, _)| *at <= pos) {
                self.dispatcher.handle(event, &mut commands);
            }
            let next_event = events.peek().map_or(u64::MAX, |(at, _)| *at);
            let len = (RENDER_BLOCK as u64).min(next_event - pos).min(total - pos) as usize;

            let buf = &mut block[..len * 2];
            callback.process_with(&snapshot, buf);
            rendered.extend(Frame::from_interleaved(buf));
            pos += len as u64;
        }

        if commands.dropped() > 0 {
            warn!("offline render dropped {} commands", commands.dropped());
        }
        rendered
    }

    /// Render `seconds` of `phrase` and encode it as WAV.
    pub fn render_to_wav(&self, phrase: &Phrase, seconds: f32) -> Result<Vec<u8>, ControllerError> {
        let sample_rate = self.config.sample_rate as u32;
        let frames = (seconds.max(0.0) * sample_rate as f32) as usize;
        let rendered = self.render_frames(phrase, frames);
        Ok(frames_to_wav(&rendered, sample_rate)?)
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.stop();
    }
}
