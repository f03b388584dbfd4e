use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use crate::common::WindowFunction;
use crate::dtw::{CosineDistance, DistanceMetric, MatchOutput, TemplateMatcher};
use crate::error::Error;
use crate::stft::SpectralRingBuffer;
use crate::syllable::template::spectrogram_from_bytes;

/// A fired match event, reported at the score peak of an excursion above
/// the matcher's threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchEvent {
    /// The id returned when the syllable was registered.
    pub index: usize,
    /// Normalized score at the peak.
    pub score: f32,
    /// Signed tempo deviation at the peak, in columns.
    pub length_diff: i32,
}

/// Spectral front end and event detection parameters. The defaults suit
/// birdsong-like syllables at a 44.1 kHz sample rate: 512 sample windows
/// read every 40 samples, a 1-10 kHz analysis band and logarithmic power
/// compression.
#[derive(Debug, Clone, Copy)]
pub struct DetectorSettings {
    pub window_length: usize,
    pub window_stride: usize,
    /// Ring buffer allocation in samples. Sized generously so the matching
    /// task may lag several callback periods behind the audio thread
    /// without overflow.
    pub buffer_length: usize,
    /// Analysis band lower edge in Hz, inclusive.
    pub frequency_lo: f32,
    /// Analysis band upper edge in Hz, exclusive.
    pub frequency_hi: f32,
    /// Compress each feature value as `ln(1 + x)`.
    pub log_power: bool,
    pub window_function: WindowFunction,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        DetectorSettings {
            window_length: 512,
            window_stride: 40,
            buffer_length: 1 << 21,
            frequency_lo: 1000.0,
            frequency_hi: 10000.0,
            log_power: true,
            window_function: WindowFunction::Rectangular,
        }
    }
}

#[derive(Clone, Copy)]
enum MatchState {
    BelowThreshold,
    AboveThreshold,
    /// Fired; stays disarmed until the score drops below the threshold.
    Refractory,
}

/// One registered syllable: its matcher plus event state.
struct Slot<D: DistanceMetric> {
    matcher: TemplateMatcher<D>,
    threshold: f32,
    /// Maximum tolerated |length diff| at the peak, in columns.
    threshold_length: f32,
    last_score: f32,
    last_length: i32,
    state: MatchState,
}

impl<D: DistanceMetric> Slot<D> {
    /// Advances the event state machine by one column. Returns the
    /// (score, length diff) of a fired event, if any.
    ///
    /// An event fires when the previous column was above the threshold
    /// with a tolerable length deviation and the new score dropped below
    /// it, i.e. the previous column was a local maximum inside the match
    /// zone. Firing resets the matcher, zeroes the stored score and puts
    /// the slot in a refractory state that holds until the score has
    /// dropped below the threshold, so the falling tail of the same
    /// excursion cannot trigger again.
    fn update(&mut self, output: MatchOutput) -> Option<(f32, i32)> {
        let mut score = output.normalized_score;
        let mut fired = None;
        let mut disarmed = matches!(self.state, MatchState::Refractory);
        if let MatchState::AboveThreshold = self.state {
            let peaked = score < self.last_score;
            let length_ok = (self.last_length.abs() as f32) < self.threshold_length;
            if peaked && length_ok {
                fired = Some((self.last_score, self.last_length));
                self.matcher.reset();
                score = 0.0;
                disarmed = true;
            }
        }
        self.last_score = score;
        self.last_length = output.length_diff;
        self.state = if output.normalized_score < self.threshold {
            MatchState::BelowThreshold
        } else if disarmed {
            MatchState::Refractory
        } else {
            MatchState::AboveThreshold
        };
        fired
    }

    fn reset(&mut self) {
        self.matcher.reset();
        self.last_score = 0.0;
        self.last_length = 0;
        self.state = MatchState::BelowThreshold;
    }
}

type MatchCallback = Box<dyn FnMut(MatchEvent)>;
type ColumnCallback = Box<dyn FnMut(&[f32], &[i32])>;

/// Detects occurrences of registered reference syllables in a continuous
/// audio stream.
///
/// Audio is appended with [ingest](SyllableDetector::ingest), which only
/// copies samples into the ring buffer and is safe to call from a hard
/// real time audio callback. The matching work (FFTs and one dynamic
/// programming sweep per matcher per column) is pulled separately with
/// [run_matching](SyllableDetector::run_matching), typically from a lower
/// priority task.
pub struct SyllableDetector<D: DistanceMetric + Clone = CosineDistance> {
    sample_rate: f32,
    stft: SpectralRingBuffer,
    /// Analysis band as spectral bin indices, `index_lo..index_hi`.
    index_lo: usize,
    index_hi: usize,
    log_power: bool,
    metric: D,
    slots: Vec<Slot<D>>,
    initialized: bool,
    /// Scratch for one full power spectrum column.
    power: Box<[f32]>,
    /// Scratch for one band limited, compressed feature column.
    features: Box<[f32]>,
    /// Scratch for the per column debug callback.
    scores: Vec<f32>,
    lengths: Vec<i32>,
    match_callback: Option<MatchCallback>,
    column_callback: Option<ColumnCallback>,
}

impl SyllableDetector<CosineDistance> {
    /// Creates a detector with default settings and the cosine distance.
    pub fn new(sample_rate: f32) -> Self {
        SyllableDetector::from_options(sample_rate, DetectorSettings::default(), CosineDistance)
    }
}

impl<D: DistanceMetric + Clone> SyllableDetector<D> {
    pub fn from_options(sample_rate: f32, settings: DetectorSettings, metric: D) -> Self {
        let mut stft = SpectralRingBuffer::new(
            settings.window_length,
            settings.window_stride,
            settings.buffer_length,
        );
        stft.set_window(settings.window_function);
        let index_lo = stft.bin_for_frequency(settings.frequency_lo, sample_rate);
        let index_hi = stft.bin_for_frequency(settings.frequency_hi, sample_rate);
        if index_lo >= index_hi || index_hi > stft.spectrum_length() {
            panic!(
                "Analysis band {}..{} Hz is empty or outside the spectrum",
                settings.frequency_lo, settings.frequency_hi
            )
        }
        let power = vec![0.0; stft.spectrum_length()].into_boxed_slice();
        let features = vec![0.0; index_hi - index_lo].into_boxed_slice();
        SyllableDetector {
            sample_rate,
            stft,
            index_lo,
            index_hi,
            log_power: settings.log_power,
            metric,
            slots: Vec::new(),
            initialized: false,
            power,
            features,
            scores: Vec::new(),
            lengths: Vec::new(),
            match_callback: None,
            column_callback: None,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// The dimension of the feature vectors, `index_hi - index_lo`.
    pub fn feature_count(&self) -> usize {
        self.index_hi - self.index_lo
    }

    pub fn template_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Registers the match event callback. Owned by the detector and
    /// invoked synchronously from within the matching sweep.
    pub fn set_match_callback<F>(&mut self, callback: F) -> Result<(), Error>
    where
        F: FnMut(MatchEvent) + 'static,
    {
        if self.initialized {
            return Err(Error::RegistrationClosed);
        }
        self.match_callback = Some(Box::new(callback));
        Ok(())
    }

    /// Registers a debug callback invoked once per processed column with
    /// the (score, length diff) of every matcher, indexed by syllable id.
    pub fn set_column_callback<F>(&mut self, callback: F) -> Result<(), Error>
    where
        F: FnMut(&[f32], &[i32]) + 'static,
    {
        if self.initialized {
            return Err(Error::RegistrationClosed);
        }
        self.column_callback = Some(Box::new(callback));
        Ok(())
    }

    /// Registers a reference syllable from raw audio at the detector's
    /// sample rate, returning its id. The audio is run through the
    /// detector's own spectral front end, so the resulting template sees
    /// exactly the features a live occurrence will produce.
    ///
    /// `constrain_length` bounds the tolerated tempo deviation at the
    /// firing peak, as a fraction of the template column count.
    pub fn add_syllable(
        &mut self,
        audio: &[f32],
        threshold: f32,
        constrain_length: f32,
    ) -> Result<usize, Error> {
        if self.initialized {
            return Err(Error::RegistrationClosed);
        }
        self.stft.clear();
        self.stft.write(audio)?;
        self.stft.zero_pad_to_edge()?;

        let mut rows: Vec<Vec<f32>> = Vec::new();
        while self.stft.read_power(&mut self.power) {
            self.extract_features();
            rows.push(self.features.to_vec());
        }
        self.stft.clear();

        let matcher = TemplateMatcher::from_options(&rows, self.metric.clone())?;
        self.register(matcher, threshold, constrain_length)
    }

    /// Registers a reference syllable from a pre-computed feature
    /// spectrogram, one feature vector per column. The feature dimension
    /// must match the detector's analysis band.
    pub fn add_spectrogram(
        &mut self,
        spectrogram: &[Vec<f32>],
        threshold: f32,
        constrain_length: f32,
    ) -> Result<usize, Error> {
        if self.initialized {
            return Err(Error::RegistrationClosed);
        }
        let matcher = TemplateMatcher::from_options(spectrogram, self.metric.clone())?;
        self.register(matcher, threshold, constrain_length)
    }

    /// Registers a reference syllable from a flat row major
    /// `length x features` buffer.
    pub fn add_spectrogram_flat(
        &mut self,
        spectrogram: &[f32],
        features: usize,
        threshold: f32,
        constrain_length: f32,
    ) -> Result<usize, Error> {
        if self.initialized {
            return Err(Error::RegistrationClosed);
        }
        let matcher = TemplateMatcher::from_flat(spectrogram, features, self.metric.clone())?;
        self.register(matcher, threshold, constrain_length)
    }

    /// Registers a reference syllable from a serialized template
    /// (headerless little endian f32, see [template](crate::syllable::template)).
    pub fn add_spectrogram_bytes(
        &mut self,
        bytes: &[u8],
        threshold: f32,
        constrain_length: f32,
    ) -> Result<usize, Error> {
        if self.initialized {
            return Err(Error::RegistrationClosed);
        }
        let features = self.feature_count();
        let spectrogram = spectrogram_from_bytes(bytes, features)?;
        let matcher = TemplateMatcher::from_flat(&spectrogram, features, self.metric.clone())?;
        self.register(matcher, threshold, constrain_length)
    }

    /// Locks registration and resets all matcher state. Fails with
    /// `NoTemplates` when nothing has been registered.
    pub fn initialize(&mut self) -> Result<(), Error> {
        if self.initialized {
            return Err(Error::AlreadyInitialized);
        }
        if self.slots.is_empty() {
            return Err(Error::NoTemplates);
        }
        self.initialized = true;
        self.scores.reserve(self.slots.len());
        self.lengths.reserve(self.slots.len());
        self.reset();
        Ok(())
    }

    /// Clears the audio buffer and all matcher state. Registrations are
    /// kept.
    pub fn reset(&mut self) {
        self.stft.clear();
        for slot in self.slots.iter_mut() {
            slot.reset();
        }
    }

    /// Appends audio samples. Only copies into the ring buffer; no
    /// transform or matching work happens here.
    pub fn ingest(&mut self, samples: &[f32]) -> Result<(), Error> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        self.stft.write(samples)
    }

    /// Appends every `stride`:th sample, for interleaved multichannel
    /// input.
    pub fn ingest_strided(&mut self, samples: &[f32], stride: usize) -> Result<(), Error> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        self.stft.write_strided(samples, stride)
    }

    /// Processes one column if one is available: transform, fan out to all
    /// matchers, advance each event state machine, invoke callbacks.
    /// Returns `false` when fewer than one window of unread samples is
    /// buffered.
    pub fn match_once(&mut self) -> bool {
        if !self.initialized {
            return false;
        }
        if !self.stft.read_power(&mut self.power) {
            return false;
        }
        self.extract_features();

        for (index, slot) in self.slots.iter_mut().enumerate() {
            let output = slot.matcher.ingest(&self.features);
            if let Some((score, length_diff)) = slot.update(output) {
                if let Some(callback) = self.match_callback.as_mut() {
                    callback(MatchEvent {
                        index,
                        score,
                        length_diff,
                    });
                }
            }
        }

        if self.column_callback.is_some() {
            self.scores.clear();
            self.lengths.clear();
            for slot in self.slots.iter() {
                self.scores.push(slot.last_score);
                self.lengths.push(slot.last_length);
            }
            if let Some(callback) = self.column_callback.as_mut() {
                callback(&self.scores, &self.lengths);
            }
        }
        true
    }

    /// Drains all fully available columns. Returns the number of columns
    /// processed. Idempotent: with no new complete column this is a no-op.
    pub fn run_matching(&mut self) -> usize {
        let mut columns = 0;
        while self.match_once() {
            columns += 1;
        }
        columns
    }

    /// Zero pads the buffered tail to a column boundary, drains all
    /// columns and returns the final (score, length diff) per matcher.
    /// Used to force evaluation of a short, finite input.
    pub fn flush_and_fetch(&mut self) -> Result<Vec<(f32, i32)>, Error> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        self.stft.zero_pad_to_edge()?;
        self.run_matching();
        Ok(self
            .slots
            .iter()
            .map(|slot| (slot.last_score, slot.last_length))
            .collect())
    }

    fn register(
        &mut self,
        mut matcher: TemplateMatcher<D>,
        threshold: f32,
        constrain_length: f32,
    ) -> Result<usize, Error> {
        if matcher.features() != self.feature_count() {
            return Err(Error::InvalidTemplate);
        }
        let profile = warp_penalty_profile(matcher.length());
        matcher.set_alpha_profile(&profile)?;
        let threshold_length = constrain_length * (matcher.length() as f32);
        let index = self.slots.len();
        self.slots.push(Slot {
            matcher,
            threshold,
            threshold_length,
            last_score: 0.0,
            last_length: 0,
            state: MatchState::BelowThreshold,
        });
        Ok(index)
    }

    fn extract_features(&mut self) {
        let band = &self.power[self.index_lo..self.index_hi];
        for (feature, value) in self.features.iter_mut().zip(band.iter()) {
            *feature = if self.log_power {
                libm::log1pf(*value)
            } else {
                *value
            };
        }
    }
}

/// Symmetric per position warp penalty, `2 + 0.9^i` from each template
/// edge. Warping at the edges of a syllable is penalized harder than at
/// its center.
fn warp_penalty_profile(length: usize) -> Vec<f32> {
    let mut alpha = vec![0.0; length];
    for i in 0..length / 2 + 1 {
        if i >= length {
            break;
        }
        let value = 2.0 + libm::powf(0.9, i as f32);
        alpha[i] = value;
        alpha[length - 1 - i] = value;
    }
    alpha
}
