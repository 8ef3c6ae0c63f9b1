//! The live startup sequence on a device-less backend.

use pv_master::{AudioOutput, Controller, EngineConfig, MidiEvent, NullOutput, Phrase};
use ringbuf::traits::Consumer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    false
}

#[test]
fn midi_note_reaches_audio_output() {
    let (output, mut tap) = NullOutput::with_tap(48_000, 128, 48_000 * 2);
    let mut ctrl = Controller::new(EngineConfig::default());
    let mut input = ctrl.start(Box::new(output)).unwrap();
    assert!(ctrl.is_running());

    assert!(input.send(MidiEvent::note_on(0, 60, 110)));
    assert!(wait_until(|| ctrl.poll_midi().unwrap() > 0));

    let heard = wait_until(|| {
        let mut any = false;
        while let Some(s) = tap.try_pop() {
            any |= s.abs() > 1e-3;
        }
        any
    });
    ctrl.stop();
    assert!(heard, "note never reached the output");
    assert!(!ctrl.is_running());
}

#[test]
fn midi_loop_runs_until_stopped() {
    let output = NullOutput::new(48_000, 256);
    let sample_rate = output.sample_rate();
    let mut ctrl = Controller::new(EngineConfig::default());
    let mut input = ctrl.start(Box::new(output)).unwrap();

    let mut phrase = Phrase::new();
    phrase.note(0, 480, 64, 100);
    phrase.note(480, 480, 67, 100);

    let stop = Arc::new(AtomicBool::new(false));
    let performer_stop = stop.clone();
    let performer = std::thread::spawn(move || {
        let done = phrase.perform(&mut input, sample_rate, &performer_stop);
        performer_stop.store(true, Ordering::Relaxed);
        (done, input.dropped())
    });

    ctrl.run_midi_loop(&stop).unwrap();
    let (done, dropped) = performer.join().unwrap();
    assert!(done);
    assert_eq!(dropped, 0);
    ctrl.stop();
}

#[test]
fn restart_replaces_session() {
    let mut ctrl = Controller::default();
    let _first = ctrl.start(Box::new(NullOutput::new(44_100, 64))).unwrap();
    let mut second = ctrl.start(Box::new(NullOutput::new(48_000, 64))).unwrap();
    assert!(second.note_on(0, 60, 100));
    assert_eq!(ctrl.poll_midi().unwrap(), 1);
    ctrl.free_all().unwrap();
    ctrl.stop();
    ctrl.stop();
}
