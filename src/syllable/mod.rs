//! Multi template syllable detection over a shared audio stream.
//!
//! A [SyllableDetector] owns one spectral ring buffer and one
//! [TemplateMatcher](crate::dtw::TemplateMatcher) per registered reference
//! pattern. Incoming audio is converted into band limited feature columns,
//! each column is fanned out to every matcher, and a per matcher state
//! machine turns score excursions above a threshold into match events,
//! fired exactly once per genuine occurrence.

mod detector;
pub mod template;

pub use detector::{DetectorSettings, MatchEvent, SyllableDetector};
