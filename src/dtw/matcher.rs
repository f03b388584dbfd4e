use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use crate::dtw::distance::{CosineDistance, DistanceMetric};
use crate::error::Error;

/// The result of ingesting one feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOutput {
    /// Accumulated alignment cost of the best alignment ending at the
    /// current input column.
    pub score: f32,
    /// `score` remapped to [0, 1] via the template's silence distance,
    /// 1.0 meaning a perfect match and 0.0 a match no better than silence.
    pub normalized_score: f32,
    /// Signed difference between the number of consumed input columns and
    /// the template length. Negative means the input played faster than the
    /// template, positive slower.
    pub length_diff: i32,
}

/// Matches a live feature vector stream against one fixed reference
/// template, one vector at a time. Operates purely on feature vectors and
/// has no notion of audio or spectra.
pub struct TemplateMatcher<D: DistanceMetric = CosineDistance> {
    /// Row major `length x features` template.
    template: Box<[f32]>,
    features: usize,
    length: usize,
    /// Per template position warp penalty. Lower values tolerate more
    /// warping at that position.
    alpha: Box<[f32]>,
    metric: D,
    /// Expected distance between the template and pure silence, used to
    /// map raw costs to [0, 1] comparably across matchers.
    normalization: f32,
    /// Rolling dynamic programming columns, `length + 1` cells each.
    /// Cell 0 is a boundary holding score 0 and length 0 at every time
    /// step, so an alignment may begin at any input column.
    scores: [Box<[f32]>; 2],
    lengths: [Box<[u32]>; 2],
    /// Which of the two columns holds the previous time step.
    current: usize,
}

impl TemplateMatcher<CosineDistance> {
    /// Creates a matcher using the cosine distance.
    pub fn new(template: &[Vec<f32>]) -> Result<Self, Error> {
        TemplateMatcher::from_options(template, CosineDistance)
    }
}

impl<D: DistanceMetric> TemplateMatcher<D> {
    pub fn from_options(template: &[Vec<f32>], metric: D) -> Result<Self, Error> {
        if template.is_empty() || template[0].is_empty() {
            return Err(Error::InvalidTemplate);
        }
        let features = template[0].len();
        let mut flat = Vec::with_capacity(template.len() * features);
        for row in template.iter() {
            if row.len() != features {
                return Err(Error::InvalidTemplate);
            }
            flat.extend_from_slice(row);
        }
        TemplateMatcher::from_flat(&flat, features, metric)
    }

    /// Creates a matcher from a row major `length x features` buffer.
    pub fn from_flat(template: &[f32], features: usize, metric: D) -> Result<Self, Error> {
        if features == 0 || template.is_empty() || template.len() % features != 0 {
            return Err(Error::InvalidTemplate);
        }
        let length = template.len() / features;
        metric.validate(length, features)?;

        let silence = vec![0.0; features];
        let mut normalization = 0.0;
        for position in 0..length {
            let frame = &template[position * features..(position + 1) * features];
            normalization += metric.distance(position, frame, &silence);
        }

        let mut matcher = TemplateMatcher {
            template: template.to_vec().into_boxed_slice(),
            features,
            length,
            alpha: vec![1.0; length].into_boxed_slice(),
            metric,
            normalization,
            scores: [
                vec![0.0; length + 1].into_boxed_slice(),
                vec![0.0; length + 1].into_boxed_slice(),
            ],
            lengths: [
                vec![0; length + 1].into_boxed_slice(),
                vec![0; length + 1].into_boxed_slice(),
            ],
            current: 0,
        };
        matcher.reset();
        Ok(matcher)
    }

    /// The number of feature vectors in the template.
    pub fn length(&self) -> usize {
        self.length
    }

    /// The dimension of each feature vector.
    pub fn features(&self) -> usize {
        self.features
    }

    /// The template's distance from silence.
    pub fn normalization(&self) -> f32 {
        self.normalization
    }

    /// Sets a constant warp penalty for all template positions.
    pub fn set_alpha(&mut self, alpha: f32) {
        for value in self.alpha.iter_mut() {
            *value = alpha;
        }
    }

    /// Sets a per template position warp penalty.
    pub fn set_alpha_profile(&mut self, alpha: &[f32]) -> Result<(), Error> {
        if alpha.len() != self.length {
            return Err(Error::LengthMismatch);
        }
        self.alpha.copy_from_slice(alpha);
        Ok(())
    }

    /// Reinitializes the rolling columns without discarding the template.
    /// Only the all skip alignment is free: position 0 scores 0, every
    /// other position is unreachable.
    pub fn reset(&mut self) {
        self.current = 0;
        for column in 0..2 {
            self.scores[column][0] = 0.0;
            for score in self.scores[column][1..].iter_mut() {
                *score = f32::INFINITY;
            }
            for length in self.lengths[column].iter_mut() {
                *length = 0;
            }
        }
    }

    /// Performs one dynamic programming sweep for the given input column.
    /// `input` must hold `features()` values.
    ///
    /// Each template position takes the cheapest of three transitions:
    /// diagonal (consume one input and one template frame, full cost),
    /// template advance (consume a template frame only, cost scaled by the
    /// position's warp penalty, path length unchanged) and signal advance
    /// (consume an input frame only, scaled cost, path length grows by
    /// one). A NaN local distance falls back to the diagonal transition at
    /// zero added cost instead of propagating.
    pub fn ingest(&mut self, input: &[f32]) -> MatchOutput {
        assert_eq!(input.len(), self.features);

        let (first_scores, second_scores) = self.scores.split_at_mut(1);
        let (first_lengths, second_lengths) = self.lengths.split_at_mut(1);
        let (last_scores, current_scores, last_lengths, current_lengths) = if self.current == 0 {
            (
                &*first_scores[0],
                &mut *second_scores[0],
                &*first_lengths[0],
                &mut *second_lengths[0],
            )
        } else {
            (
                &*second_scores[0],
                &mut *first_scores[0],
                &*second_lengths[0],
                &mut *first_lengths[0],
            )
        };
        self.current ^= 1;

        for position in 0..self.length {
            let frame = &self.template[position * self.features..(position + 1) * self.features];
            let cost = self.metric.distance(position, frame, input);

            let mut score;
            let mut path_length;
            if cost.is_nan() {
                score = last_scores[position];
                path_length = last_lengths[position] + 1;
            } else {
                let scaled_cost = cost * self.alpha[position];

                // Diagonal.
                score = last_scores[position] + cost;
                path_length = last_lengths[position] + 1;

                // Template advance.
                let candidate = current_scores[position] + scaled_cost;
                if candidate < score {
                    score = candidate;
                    path_length = current_lengths[position];
                }

                // Signal advance.
                let candidate = last_scores[position + 1] + scaled_cost;
                if candidate < score {
                    score = candidate;
                    path_length = last_lengths[position + 1] + 1;
                }
            }

            current_scores[position + 1] = score;
            current_lengths[position + 1] = path_length;
        }

        let score = current_scores[self.length];
        let length_diff = current_lengths[self.length] as i32 - self.length as i32;
        MatchOutput {
            score,
            normalized_score: self.normalize(score),
            length_diff,
        }
    }

    fn normalize(&self, score: f32) -> f32 {
        if self.normalization > 0.0 {
            ((self.normalization - score) / self.normalization)
                .max(0.0)
                .min(1.0)
        } else if score <= 0.0 {
            1.0
        } else {
            0.0
        }
    }
}
