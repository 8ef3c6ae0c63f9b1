//! Render-path benchmarks.
//!
//! At 48 kHz a 256-frame block has a 5.33 ms deadline.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pv_engine::{AudioCallback, Disconnected, EngineConfig, VoiceManager, Waveform, MAX_VOICES};

const SR: f32 = 48_000.0;
const BLOCK_FRAMES: &[usize] = &[64, 256, 512];

fn full_pool(waveform: Waveform) -> VoiceManager {
    let mut vm: VoiceManager = VoiceManager::new(SR);
    let mut params = *vm.params();
    params.waveform = waveform;
    vm.apply_params(&params);
    for n in 0..MAX_VOICES {
        vm.note_on(36.0 + n as f32, 100.0);
    }
    vm
}

fn bench_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("voice_manager/produce_sample");

    let mut idle: VoiceManager = VoiceManager::new(SR);
    group.bench_function("idle", |b| b.iter(|| black_box(idle.produce_sample())));

    for waveform in [Waveform::Sine, Waveform::PolyBlepSaw, Waveform::PolyBlepTriangle] {
        let mut vm = full_pool(waveform);
        group.bench_function(BenchmarkId::new("full", waveform.name()), |b| {
            b.iter(|| black_box(vm.produce_sample()))
        });
    }

    group.finish();
}

fn bench_callback(c: &mut Criterion) {
    let mut group = c.benchmark_group("callback/process");

    for &frames in BLOCK_FRAMES {
        let mut out = vec![0.0f32; frames * 2];
        let mut cb: AudioCallback<Disconnected, Disconnected> = AudioCallback::new(
            full_pool(Waveform::PolyBlepSaw),
            Disconnected,
            Disconnected,
            &EngineConfig::default(),
        );

        group.bench_with_input(BenchmarkId::new("full_pool", frames), &frames, |b, _| {
            b.iter(|| cb.process(black_box(&mut out)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pool, bench_callback);
criterion_main!(benches);
