//! Online [dynamic time warping](https://en.wikipedia.org/wiki/Dynamic_time_warping)
//! against a fixed reference template.
//!
//! The matcher consumes one feature vector at a time and maintains a single
//! pair of rolling dynamic programming columns, so the per step cost is
//! linear in the template length and independent of how much input has been
//! seen. An alignment may begin at any input column, which is what makes the
//! matcher usable on a continuous stream: the score at the final template
//! position is always the cost of the best alignment ending at the current
//! column, wherever it started.

mod distance;
mod matcher;

pub use distance::{CosineDistance, DistanceMetric, EuclideanDistance, WeightedEuclideanDistance};
pub use matcher::{MatchOutput, TemplateMatcher};
