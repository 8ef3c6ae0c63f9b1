//! polyvoice: plays a demo phrase live, or renders it to WAV.
//!
//! Usage:
//!   polyvoice                      play the demo on the default audio device
//!   polyvoice --seconds 20         keep looping the demo for 20 s
//!   polyvoice --wav out.wav        render offline instead
//!
//! Log level comes from POLYVOICE_LOG (default "info").

use log::{info, warn};
use pv_master::{AudioOutput, Controller, CpalOutput, EngineConfig, NullOutput, Phrase};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use std::{env, process};

const USAGE: &str = "Usage: polyvoice [--wav <output.wav>] [--seconds <n>]";
/// Extra time after the last event so releases ring out.
const TAIL_SECONDS: f32 = 1.0;

struct Options {
    wav: Option<String>,
    seconds: Option<f32>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("POLYVOICE_LOG", "info")).init();

    let opts = parse_args(env::args().skip(1)).unwrap_or_else(|msg| {
        eprintln!("{}", msg);
        eprintln!("{}", USAGE);
        process::exit(2);
    });

    let result = match &opts.wav {
        Some(path) => render_to_wav(path, opts.seconds),
        None => play_live(opts.seconds),
    };
    if let Err(e) = result {
        eprintln!("polyvoice: {}", e);
        process::exit(1);
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut opts = Options { wav: None, seconds: None };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--wav" => opts.wav = Some(args.next().ok_or("--wav needs a path")?),
            "--seconds" => {
                let value = args.next().ok_or("--seconds needs a value")?;
                let seconds: f32 = value
                    .parse()
                    .map_err(|_| format!("invalid --seconds value: {}", value))?;
                if !(seconds.is_finite() && seconds > 0.0) {
                    return Err(format!("--seconds must be positive, got {}", value));
                }
                opts.seconds = Some(seconds);
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(opts)
}

fn render_to_wav(path: &str, seconds: Option<f32>) -> Result<(), Box<dyn std::error::Error>> {
    let ctrl = Controller::new(EngineConfig::default());
    let sample_rate = ctrl.config().sample_rate as u32;
    let phrase = Phrase::demo(sample_rate);
    let seconds = seconds.unwrap_or(phrase.end_frame() as f32 / sample_rate as f32 + TAIL_SECONDS);

    println!("Rendering {:.1} s to {} at {} Hz...", seconds, path, sample_rate);
    let frames = ctrl.render_frames(&phrase, (seconds * sample_rate as f32) as usize);
    pv_master::save_wav(path, &frames, sample_rate)?;
    println!("Wrote {} frames.", frames.len());
    Ok(())
}

fn play_live(seconds: Option<f32>) -> Result<(), Box<dyn std::error::Error>> {
    let output: Box<dyn AudioOutput> = match CpalOutput::new() {
        Ok(output) => Box::new(output),
        Err(e) => {
            warn!("{}; rendering to a null output instead", e);
            Box::new(NullOutput::new(48_000, 256))
        }
    };
    let sample_rate = output.sample_rate();

    let mut ctrl = Controller::new(EngineConfig::default());
    let mut input = ctrl.start(output)?;

    let phrase = Phrase::demo(sample_rate);
    let pass = Duration::from_secs_f32(phrase.end_frame() as f32 / sample_rate as f32);
    let play_for = seconds.map_or(pass, Duration::from_secs_f32);

    let stop = Arc::new(AtomicBool::new(false));
    let performer_stop = stop.clone();
    let performer = std::thread::spawn(move || {
        let started = Instant::now();
        while started.elapsed() < play_for {
            if !phrase.perform(&mut input, sample_rate, &performer_stop) {
                return;
            }
        }
        std::thread::sleep(Duration::from_secs_f32(TAIL_SECONDS));
        if input.dropped() > 0 {
            warn!("{} midi events dropped", input.dropped());
        }
        performer_stop.store(true, Ordering::Relaxed);
    });

    println!("Playing...");
    let looped = ctrl.run_midi_loop(&stop);
    stop.store(true, Ordering::Relaxed);
    if performer.join().is_err() {
        warn!("phrase performer panicked");
    }
    ctrl.stop();
    looped?;

    info!("done");
    println!("Done.");
    Ok(())
}
