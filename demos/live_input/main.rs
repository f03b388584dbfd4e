use std::env;
use std::thread;
use std::time::Duration;

use dev_helpers::{read_wav, InputEngine};
use microwarp::syllable::SyllableDetector;

const SAMPLE_RATE: f32 = 44100.0;

/// Listens to the default input device and prints an event each time one
/// of the reference syllables is heard.
///
/// Usage: live_input syllable1.wav [syllable2.wav ...]
fn main() {
    let paths: Vec<String> = env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("Usage: live_input syllable1.wav [syllable2.wav ...]");
        std::process::exit(1);
    }

    let mut detector = SyllableDetector::new(SAMPLE_RATE);
    for path in paths.iter() {
        let (sample_rate, audio) = read_wav(path).unwrap();
        if (sample_rate as f32) != SAMPLE_RATE {
            eprintln!(
                "Warning: {} has sample rate {} Hz, expected {} Hz",
                path, sample_rate, SAMPLE_RATE
            );
        }
        let id = detector.add_syllable(&audio, 0.7, 0.25).unwrap();
        println!("Registered syllable {} from {}", id, path);
    }
    let names = paths.clone();
    detector
        .set_match_callback(move |event| {
            println!(
                "Heard {} (score {:.3}, length diff {} columns)",
                names[event.index], event.score, event.length_diff
            );
        })
        .unwrap();
    detector.initialize().unwrap();

    let mut engine = InputEngine::new(SAMPLE_RATE, 1 << 16);
    println!("Listening. Press ctrl-c to stop.");

    let mut chunk = Vec::with_capacity(1 << 14);
    loop {
        chunk.clear();
        while let Ok(sample) = engine.samples.pop() {
            chunk.push(sample);
        }
        if !chunk.is_empty() {
            if detector.ingest(&chunk).is_err() {
                eprintln!("Audio buffer overflow, resetting");
                detector.reset();
            }
            detector.run_matching();
        }
        thread::sleep(Duration::from_millis(5));
    }
}
