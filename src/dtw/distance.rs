use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::error::Error;

/// Local distance between one template frame and one input frame.
/// Implementations may depend on the template position, which is how per
/// position feature weighting is expressed.
pub trait DistanceMetric {
    /// Checks the metric against a template's dimensions before matching
    /// starts.
    fn validate(&self, _length: usize, _features: usize) -> Result<(), Error> {
        Ok(())
    }

    fn distance(&self, position: usize, template_frame: &[f32], input_frame: &[f32]) -> f32;
}

/// Plain Euclidean distance.
#[derive(Clone, Copy)]
pub struct EuclideanDistance;

impl DistanceMetric for EuclideanDistance {
    fn distance(&self, _position: usize, template_frame: &[f32], input_frame: &[f32]) -> f32 {
        let mut sum = 0.0;
        for (t, x) in template_frame.iter().zip(input_frame.iter()) {
            let difference = x - t;
            sum += difference * difference;
        }
        libm::sqrtf(sum)
    }
}

/// Euclidean distance with a per feature, per template position weight,
/// stored as a row major `length x features` matrix.
#[derive(Clone)]
pub struct WeightedEuclideanDistance {
    weights: Box<[f32]>,
    features: usize,
}

impl WeightedEuclideanDistance {
    pub fn new(weights: Vec<f32>, features: usize) -> Result<Self, Error> {
        if features == 0 || weights.is_empty() || weights.len() % features != 0 {
            return Err(Error::LengthMismatch);
        }
        Ok(WeightedEuclideanDistance {
            weights: weights.into_boxed_slice(),
            features,
        })
    }
}

impl DistanceMetric for WeightedEuclideanDistance {
    fn validate(&self, length: usize, features: usize) -> Result<(), Error> {
        if features != self.features || length * features != self.weights.len() {
            return Err(Error::LengthMismatch);
        }
        Ok(())
    }

    fn distance(&self, position: usize, template_frame: &[f32], input_frame: &[f32]) -> f32 {
        let row = &self.weights[position * self.features..(position + 1) * self.features];
        let mut sum = 0.0;
        for ((t, x), w) in template_frame.iter().zip(input_frame.iter()).zip(row.iter()) {
            let difference = x - t;
            sum += w * difference * difference;
        }
        libm::sqrtf(sum)
    }
}

/// Cosine distance, `1 - (t . x) / (|t| |x|)`. Scale invariant, which makes
/// it robust against level differences between the reference recording and
/// the live signal.
///
/// Frames whose energy falls below 0.5 are treated as silent: two silent
/// frames match perfectly and a silent frame against an energetic one is a
/// full mismatch. This keeps the division stable and the silence
/// normalization constant finite.
#[derive(Clone, Copy)]
pub struct CosineDistance;

impl DistanceMetric for CosineDistance {
    fn distance(&self, _position: usize, template_frame: &[f32], input_frame: &[f32]) -> f32 {
        let mut dot = 0.0;
        let mut template_energy = 0.0;
        let mut input_energy = 0.0;
        for (t, x) in template_frame.iter().zip(input_frame.iter()) {
            dot += t * x;
            template_energy += t * t;
            input_energy += x * x;
        }
        let template_silent = template_energy < 0.5;
        let input_silent = input_energy < 0.5;
        if template_silent && input_silent {
            0.0
        } else if template_silent || input_silent {
            1.0
        } else {
            1.0 - dot / (libm::sqrtf(template_energy) * libm::sqrtf(input_energy))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CosineDistance, DistanceMetric, EuclideanDistance, WeightedEuclideanDistance,
    };
    use crate::error::Error;
    use alloc::vec;

    #[test]
    fn test_euclidean() {
        let metric = EuclideanDistance;
        assert_eq!(metric.distance(0, &[1.0, 2.0], &[1.0, 2.0]), 0.0);
        assert!((metric.distance(0, &[0.0, 0.0], &[3.0, 4.0]) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_weighted_euclidean() {
        let metric = WeightedEuclideanDistance::new(vec![4.0, 0.0, 1.0, 1.0], 2).unwrap();
        // Position 0 scales the first feature by 4 and ignores the second.
        assert!((metric.distance(0, &[0.0, 0.0], &[1.0, 7.0]) - 2.0).abs() < 1e-6);
        // Position 1 is unweighted.
        assert!((metric.distance(1, &[0.0, 0.0], &[3.0, 4.0]) - 5.0).abs() < 1e-6);

        assert_eq!(
            WeightedEuclideanDistance::new(vec![1.0, 1.0, 1.0], 2).err(),
            Some(Error::LengthMismatch)
        );
        assert_eq!(metric.validate(2, 2), Ok(()));
        assert_eq!(metric.validate(3, 2), Err(Error::LengthMismatch));
    }

    #[test]
    fn test_cosine() {
        let metric = CosineDistance;
        // Parallel vectors match regardless of scale.
        assert!(metric.distance(0, &[1.0, 2.0], &[10.0, 20.0]).abs() < 1e-6);
        // Orthogonal vectors are a full mismatch.
        assert!((metric.distance(0, &[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_silence() {
        let metric = CosineDistance;
        assert_eq!(metric.distance(0, &[0.0, 0.0], &[0.1, 0.1]), 0.0);
        assert_eq!(metric.distance(0, &[2.0, 0.0], &[0.0, 0.0]), 1.0);
        assert_eq!(metric.distance(0, &[0.0, 0.0], &[2.0, 0.0]), 1.0);
    }
}
