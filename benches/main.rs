use criterion::{black_box, criterion_group, criterion_main, Criterion};
use microwarp::dtw::TemplateMatcher;
use microwarp::stft::SpectralRingBuffer;
use microwarp::syllable::{DetectorSettings, SyllableDetector};

const SAMPLE_RATE: f32 = 44100.0;

fn chirp(from_hz: f32, to_hz: f32, length: usize) -> Vec<f32> {
    let duration = (length as f32) / SAMPLE_RATE;
    (0..length)
        .map(|i| {
            let t = (i as f32) / SAMPLE_RATE;
            let phase = 2.0
                * std::f32::consts::PI
                * (from_hz * t + (to_hz - from_hz) * t * t / (2.0 * duration));
            phase.sin()
        })
        .collect()
}

fn run_stft_benchmark(id: &str, c: &mut Criterion, window_length: usize, window_stride: usize) {
    let mut stft = SpectralRingBuffer::new(window_length, window_stride, 4 * window_length);
    let chunk = chirp(1000.0, 10000.0, window_stride);
    let mut power = vec![0.0; stft.spectrum_length()];

    // Prime with one full window so every iteration reads one column.
    stft.write(&chirp(1000.0, 10000.0, window_length)).unwrap();
    c.bench_function(id, |b| {
        b.iter(|| {
            stft.write(black_box(&chunk)).unwrap();
            stft.read_power(black_box(&mut power));
        })
    });
}

fn stft_benchmarks(c: &mut Criterion) {
    run_stft_benchmark("STFT window 256, stride 40", c, 256, 40);
    run_stft_benchmark("STFT window 512, stride 40", c, 512, 40);
    run_stft_benchmark("STFT window 1024, stride 40", c, 1024, 40);
    run_stft_benchmark("STFT window 2048, stride 40", c, 2048, 40);
}

fn run_matcher_benchmark(id: &str, c: &mut Criterion, length: usize, features: usize) {
    let mut template = vec![vec![0.0; features]; length];
    for (position, row) in template.iter_mut().enumerate() {
        for (index, value) in row.iter_mut().enumerate() {
            *value = (((position * 31 + index * 7) % 97) as f32) / 97.0;
        }
    }
    let mut matcher = TemplateMatcher::new(&template).unwrap();
    let input = template[length / 2].clone();

    c.bench_function(id, |b| {
        b.iter(|| {
            matcher.ingest(black_box(&input));
        })
    });
}

fn matcher_benchmarks(c: &mut Criterion) {
    run_matcher_benchmark("Matcher length 50, features 105", c, 50, 105);
    run_matcher_benchmark("Matcher length 100, features 105", c, 100, 105);
    run_matcher_benchmark("Matcher length 200, features 105", c, 200, 105);
    run_matcher_benchmark("Matcher length 400, features 105", c, 400, 105);
}

fn run_detector_benchmark(id: &str, c: &mut Criterion, template_count: usize) {
    let mut detector = SyllableDetector::new(SAMPLE_RATE);
    for index in 0..template_count {
        let from = 2000.0 + 500.0 * (index as f32);
        detector
            .add_syllable(&chirp(from, from + 4000.0, 6615), 0.7, 0.25)
            .unwrap();
    }
    detector.initialize().unwrap();

    let settings = DetectorSettings::default();
    let block = chirp(1000.0, 10000.0, settings.window_stride);
    detector
        .ingest(&chirp(1000.0, 10000.0, settings.window_length))
        .unwrap();
    detector.run_matching();

    // One stride of audio in, one column of matching out per iteration.
    c.bench_function(id, |b| {
        b.iter(|| {
            detector.ingest(black_box(&block)).unwrap();
            detector.run_matching();
        })
    });
}

fn detector_benchmarks(c: &mut Criterion) {
    run_detector_benchmark("Detector, 1 template", c, 1);
    run_detector_benchmark("Detector, 2 templates", c, 2);
    run_detector_benchmark("Detector, 4 templates", c, 4);
    run_detector_benchmark("Detector, 8 templates", c, 8);
}

criterion_group!(benches, stft_benchmarks, matcher_benchmarks, detector_benchmarks);
criterion_main!(benches);
