//! A rust implementation of a real time syllable detector, recognizing occurrences
//! of previously captured acoustic patterns in a live audio stream. Incoming audio
//! is turned into a sequence of band limited power spectrum columns by a circular
//! [short time Fourier transform](https://en.wikipedia.org/wiki/Short-time_Fourier_transform)
//! and matched against reference spectral templates using online
//! [dynamic time warping](https://en.wikipedia.org/wiki/Dynamic_time_warping),
//! so a pattern is recognized even when the live rendition is sped up, slowed
//! down or internally warped.
//!
//! Features
//! * Single pass, incremental matching. Past input is never re-scanned.
//! * No allocations or blocking calls after initialization, suitable for
//!   real time audio use on embedded targets.
//! * `no_std` compatible.
//!
//! # Examples
//!
//! Streaming API. Register one or more reference syllables, then feed chunks
//! of arbitrary size and drain match events.
//!
//! ```
//! use microwarp::syllable::SyllableDetector;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let sample_rate = 44100.0;
//! let mut detector = SyllableDetector::new(sample_rate);
//!
//! // Reference clip: a 150 ms chirp rising from 2 kHz to 6 kHz.
//! let clip_length = 6615;
//! let chirp = |i: usize| {
//!     let t = (i as f32) / sample_rate;
//!     let duration = (clip_length as f32) / sample_rate;
//!     let phase = 2.0 * core::f32::consts::PI * (2000.0 * t + 2000.0 * t * t / duration);
//!     phase.sin()
//! };
//! let clip: Vec<f32> = (0..clip_length).map(chirp).collect();
//!
//! let syllable_index = detector.add_syllable(&clip, 0.7, 0.25).unwrap();
//! assert_eq!(syllable_index, 0);
//!
//! // Match events arrive through a callback owned by the detector.
//! let events = Rc::new(RefCell::new(Vec::new()));
//! let sink = events.clone();
//! detector
//!     .set_match_callback(move |event| sink.borrow_mut().push(event))
//!     .unwrap();
//! detector.initialize().unwrap();
//!
//! // Feed the clip followed by half a second of silence. The ingest call
//! // only buffers samples and is safe to make from an audio callback;
//! // the actual matching work happens in run_matching.
//! detector.ingest(&clip).unwrap();
//! detector.ingest(&vec![0.0; 22050]).unwrap();
//! detector.run_matching();
//!
//! assert_eq!(events.borrow().len(), 1);
//! assert_eq!(events.borrow()[0].index, 0);
//! ```

#![no_std]

extern crate alloc;

pub mod common;
pub mod dtw;
mod error;
pub mod stft;
pub mod syllable;

pub use error::Error;
