//! Roll-up metrics over a scored combination set, for reporting layers.

use serde::{Deserialize, Serialize};

use crate::domain::combination::{CombinationId, CombinationResult, OverallSuccess};

use super::stats;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub combinations_tested: usize,
    /// Percentage of combinations classified successful or better.
    pub success_rate_pct: f64,
    pub average_roi: f64,
    pub average_success_score: f64,
    pub top_combination: Option<CombinationId>,
}

pub fn summarize(results: &[CombinationResult]) -> AnalysisSummary {
    if results.is_empty() {
        return AnalysisSummary::default();
    }

    let successful = results
        .iter()
        .filter(|r| {
            matches!(
                r.classification.overall_success,
                OverallSuccess::HighlySuccessful | OverallSuccess::Successful
            )
        })
        .count();

    let rois: Vec<f64> = results.iter().map(|r| r.performance.profitability.roi).collect();
    let scores: Vec<f64> = results.iter().map(|r| r.classification.success_score).collect();

    let top_combination = results
        .iter()
        .reduce(|best, current| {
            if current.classification.success_score > best.classification.success_score {
                current
            } else {
                best
            }
        })
        .map(|best| best.combination_id.clone());

    AnalysisSummary {
        combinations_tested: results.len(),
        success_rate_pct: successful as f64 / results.len() as f64 * 100.0,
        average_roi: stats::mean(&rois),
        average_success_score: stats::mean(&scores),
        top_combination,
    }
}
