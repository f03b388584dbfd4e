use std::env;

use dev_helpers::read_wav;
use microwarp::syllable::SyllableDetector;

/// Scores a candidate recording against a reference syllable and prints
/// every detected occurrence plus the final score.
///
/// Usage: offline_eval syllable.wav candidate.wav
fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() != 2 {
        eprintln!("Usage: offline_eval syllable.wav candidate.wav");
        std::process::exit(1);
    }

    let (template_rate, template) = read_wav(&args[0]).unwrap();
    let (candidate_rate, candidate) = read_wav(&args[1]).unwrap();
    if template_rate != candidate_rate {
        eprintln!(
            "Warning: sample rates differ ({} vs {} Hz)",
            template_rate, candidate_rate
        );
    }

    let mut detector = SyllableDetector::new(template_rate as f32);
    detector.add_syllable(&template, 0.7, 0.25).unwrap();
    detector
        .set_match_callback(|event| {
            println!(
                "Match at score {:.3}, length diff {} columns",
                event.score, event.length_diff
            );
        })
        .unwrap();
    detector.initialize().unwrap();

    detector.ingest(&candidate).unwrap();
    let results = detector.flush_and_fetch().unwrap();
    let (score, length_diff) = results[0];
    println!(
        "Final score {:.3}, length diff {} columns",
        score, length_diff
    );
}
