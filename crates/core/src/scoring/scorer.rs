use serde::{Deserialize, Serialize};

use crate::domain::combination::{
    CombinationInput, CombinationResult, LongTermImpact, OverallSuccess, PerformanceMetrics,
    SuccessClassification, SuccessGrade,
};

/// Weights for the success-score components. Expected to sum to 1.0; the
/// scorer does not renormalize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub volume_lift: f64,
    pub roi: f64,
    pub sustainability: f64,
    pub efficiency: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

/// Stateless scorer; performance snapshots are provided at call time.
#[derive(Debug, Clone, Default)]
pub struct SuccessScorer {
    weights: ScoreWeights,
}

impl SuccessScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Composite success score in [0, 100].
    pub fn score(&self, performance: &PerformanceMetrics) -> f64 {
        let volume_score = clamp_score(performance.volume.volume_lift_percentage * 2.0);
        let roi_score = clamp_score(performance.profitability.roi / 2.0);
        let sustainability_score = self.sustainability_score(performance.long_term.as_ref());
        let efficiency_score = clamp_score(performance.efficiency.overall_efficiency);

        volume_score * self.weights.volume_lift
            + roi_score * self.weights.roi
            + sustainability_score * self.weights.sustainability
            + efficiency_score * self.weights.efficiency
    }

    /// Mean post-promotion volume retention plus half the customer-behavior
    /// improvement, capped at 100. No long-term data scores zero.
    pub fn sustainability_score(&self, long_term: Option<&LongTermImpact>) -> f64 {
        let Some(long_term) = long_term else {
            return 0.0;
        };

        let retentions = &long_term.volume_sustainability;
        let avg_retention = if retentions.is_empty() {
            0.0
        } else {
            retentions.iter().map(|point| point.volume_retention).sum::<f64>()
                / retentions.len() as f64
        };

        let behavior_score = long_term
            .customer_behavior
            .as_ref()
            .map(|behavior| behavior.customer_retention_rate + behavior.brand_loyalty_impact)
            .unwrap_or(0.0);

        (avg_retention + behavior_score / 2.0).min(100.0)
    }

    /// Classify a scored combination across all four success dimensions.
    pub fn classify(
        &self,
        success_score: f64,
        performance: &PerformanceMetrics,
    ) -> SuccessClassification {
        let overall_success = if success_score >= 80.0 {
            OverallSuccess::HighlySuccessful
        } else if success_score >= 60.0 {
            OverallSuccess::Successful
        } else if success_score >= 40.0 {
            OverallSuccess::ModeratelySuccessful
        } else if success_score >= 20.0 {
            OverallSuccess::Unsuccessful
        } else {
            OverallSuccess::Counterproductive
        };

        let volume_lift = performance.volume.volume_lift_percentage;
        let volume_success = grade(volume_lift, 20.0, 10.0, 5.0);

        let roi = performance.profitability.roi;
        let profitability_success = grade(roi, 200.0, 150.0, 100.0);

        let sustainability = self.sustainability_score(performance.long_term.as_ref());
        let sustainability_success = grade(sustainability, 80.0, 60.0, 40.0);

        SuccessClassification {
            overall_success,
            volume_success,
            profitability_success,
            sustainability_success,
            success_score,
        }
    }

    /// Score and classify a raw combination record in one pass.
    pub fn evaluate(&self, input: &CombinationInput) -> CombinationResult {
        let success_score = self.score(&input.performance);
        let classification = self.classify(success_score, &input.performance);

        CombinationResult {
            combination_id: input.combination_id.clone(),
            combination_name: input.combination_name.clone(),
            elements: input.elements.clone(),
            performance: input.performance.clone(),
            statistics: input.statistics.clone(),
            classification,
            risk: input.risk.clone(),
        }
    }
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

fn grade(value: f64, excellent: f64, good: f64, fair: f64) -> SuccessGrade {
    if value >= excellent {
        SuccessGrade::Excellent
    } else if value >= good {
        SuccessGrade::Good
    } else if value >= fair {
        SuccessGrade::Fair
    } else {
        SuccessGrade::Poor
    }
}
