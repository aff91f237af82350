//! Success scoring and classification for promotional combinations.
//!
//! A combination's success score is a 0-100 weighted composite of volume
//! lift, ROI, long-term sustainability, and spend efficiency. Classification
//! buckets the score and its inputs into ordinal bands with inclusive lower
//! bounds, evaluated top-down.

mod scorer;

pub use scorer::{ScoreWeights, SuccessScorer};

/// Default composite weights.
pub const DEFAULT_WEIGHTS: ScoreWeights = ScoreWeights {
    volume_lift: 0.25,
    roi: 0.30,
    sustainability: 0.25,
    efficiency: 0.20,
};
