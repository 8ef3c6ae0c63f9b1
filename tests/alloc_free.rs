//! Allocation-free render path tests.
//!
//! These tests verify that the audio callback does not allocate while
//! rendering, including while it applies queued commands, drains control
//! snapshots and reacts to switch edges.
//!
//! Just run `cargo test`; no feature flags needed.

use assert_no_alloc::{assert_no_alloc, AllocDisabler};

#[cfg(debug_assertions)]
#[global_allocator]
static A: AllocDisabler = AllocDisabler;

use heapless::spsc::Queue;
use pv_engine::{
    AudioCallback, CommandSender, ControlSnapshot, Disconnected, EngineConfig, MidiDispatcher, MidiEvent, Sender,
    VoiceCommand, VoiceManager, Waveform, MAX_VOICES, NUM_KNOBS,
};

const SR: f32 = 48_000.0;
const BLOCK: usize = 256;

fn knobs(t: f32) -> [f32; NUM_KNOBS] {
    core::array::from_fn(|i| (t + i as f32 * 0.13).fract())
}

#[test]
fn full_pool_render_alloc_free() {
    let mut callback: AudioCallback<Disconnected, Disconnected> =
        AudioCallback::new(VoiceManager::new(SR), Disconnected, Disconnected, &EngineConfig::default());
    for n in 0..MAX_VOICES {
        callback.voices_mut().note_on(36.0 + n as f32, 100.0);
    }
    let mut out = [0.0f32; BLOCK * 2];

    assert_no_alloc(|| {
        for _ in 0..(SR as usize * 2 / BLOCK) {
            callback.process(&mut out);
        }
    });
    assert_eq!(callback.voices().active_count(), MAX_VOICES);
}

#[test]
fn queued_traffic_alloc_free() {
    let mut commands: Queue<VoiceCommand, 64> = Queue::new();
    let mut controls: Queue<ControlSnapshot, 8> = Queue::new();
    let (command_tx, command_rx) = commands.split();
    let (mut control_tx, control_rx) = controls.split();
    let mut sender = CommandSender::new(command_tx);
    let mut callback: AudioCallback<_, _> =
        AudioCallback::new(VoiceManager::new(SR), command_rx, control_rx, &EngineConfig::default());
    let midi = MidiDispatcher::new();
    let mut out = [0.0f32; BLOCK * 2];

    assert_no_alloc(|| {
        for block in 0..390usize {
            let note = 40 + (block % 30) as u8;
            midi.handle(&MidiEvent::note_on(0, note, 100), &mut sender);
            if block % 3 == 0 {
                midi.handle(&MidiEvent::note_on(0, note.wrapping_sub(7), 0), &mut sender);
            }
            if block % 97 == 0 {
                sender.free_all();
            }

            let mut snapshot = ControlSnapshot::with_knobs(knobs(block as f32 * 0.01));
            snapshot.switches[ControlSnapshot::SWITCH_WAVEFORM] = block % 20 < 10;
            let _ = control_tx.try_send(snapshot);

            callback.process(&mut out);
        }
    });

    assert!(out.iter().all(|s| s.is_finite()));
    assert_ne!(callback.voices().params().waveform, Waveform::Sine);
}

#[test]
fn direct_snapshot_render_alloc_free() {
    let mut callback: AudioCallback<Disconnected, Disconnected> =
        AudioCallback::new(VoiceManager::new(SR), Disconnected, Disconnected, &EngineConfig::default());
    let mut out = [0.0f32; BLOCK * 2 + 1];

    assert_no_alloc(|| {
        for block in 0..200usize {
            if block % 10 == 0 {
                callback.voices_mut().note_on(48.0 + (block / 10) as f32, 80.0);
            }
            let mut snapshot = ControlSnapshot::with_knobs(knobs(block as f32 * 0.003));
            snapshot.switches[ControlSnapshot::SWITCH_FREE_ALL] = block % 50 == 49;
            callback.process_with(&snapshot, &mut out);
        }
    });
    assert_eq!(out[BLOCK * 2], 0.0);
}
