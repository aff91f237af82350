//! Pattern mining over scored promotional combinations.
//!
//! The miner partitions combinations by their overall classification, groups
//! the successful ones by each element/value pair they carry, and emits a
//! pattern for every group meeting the minimum support threshold. The best
//! performer seeds the optimal-combination recommendation.

pub mod stats;
pub mod summary;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::combination::{CombinationResult, ElementValue, OverallSuccess};
use crate::domain::pattern::{
    AveragePerformance, ExpectedRange, FailurePattern, OptimalCombination, OptimalElement,
    PatternAnalysis, PatternCharacteristic, SuccessPattern,
};
use crate::scoring::SuccessScorer;

/// Fewer results than this and mining returns the empty analysis: too small
/// a sample to call anything a pattern.
pub const MIN_RESULTS: usize = 5;

/// Minimum number of combinations sharing an element/value pair before the
/// group is emitted as a pattern.
pub const MIN_PATTERN_FREQUENCY: usize = 3;

/// Tolerance attached to each optimal element value.
const OPTIMAL_TOLERANCE_PCT: f64 = 10.0;

/// Spread of the expected-performance range around the best performer.
const EXPECTED_RANGE_SPREAD: f64 = 0.20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningLimits {
    pub min_results: usize,
    pub min_pattern_frequency: usize,
}

impl Default for MiningLimits {
    fn default() -> Self {
        Self { min_results: MIN_RESULTS, min_pattern_frequency: MIN_PATTERN_FREQUENCY }
    }
}

/// Stateless miner. Holds the scorer used to recompute sustainability
/// sub-scores for pattern averages.
#[derive(Debug, Clone, Default)]
pub struct PatternMiner {
    limits: MiningLimits,
    scorer: SuccessScorer,
}

impl PatternMiner {
    pub fn new(limits: MiningLimits, scorer: SuccessScorer) -> Self {
        Self { limits, scorer }
    }

    pub fn mine(&self, results: &[CombinationResult]) -> PatternAnalysis {
        if results.len() < self.limits.min_results {
            return PatternAnalysis::default();
        }

        let successful: Vec<&CombinationResult> = results
            .iter()
            .filter(|r| {
                matches!(
                    r.classification.overall_success,
                    OverallSuccess::HighlySuccessful | OverallSuccess::Successful
                )
            })
            .collect();

        let unsuccessful: Vec<&CombinationResult> = results
            .iter()
            .filter(|r| {
                matches!(
                    r.classification.overall_success,
                    OverallSuccess::Unsuccessful | OverallSuccess::Counterproductive
                )
            })
            .collect();

        PatternAnalysis {
            successful_patterns: self.successful_patterns(&successful),
            unsuccessful_patterns: self.unsuccessful_patterns(&unsuccessful),
            optimal_combinations: self.optimal_combinations(&successful),
        }
    }

    fn successful_patterns(&self, successful: &[&CombinationResult]) -> Vec<SuccessPattern> {
        // BTreeMap keeps pattern output order stable across runs.
        let mut groups: BTreeMap<(String, ElementValue), Vec<&CombinationResult>> = BTreeMap::new();
        for &combination in successful {
            for element in &combination.elements {
                groups
                    .entry((element.element_type.clone(), element.element_value.clone()))
                    .or_default()
                    .push(combination);
            }
        }

        let mut patterns = Vec::new();
        for ((element_type, element_value), group) in groups {
            if group.len() < self.limits.min_pattern_frequency {
                continue;
            }

            let average_performance = AveragePerformance {
                volume_lift_pct: stats::mean(
                    &group
                        .iter()
                        .map(|c| c.performance.volume.volume_lift_percentage)
                        .collect::<Vec<_>>(),
                ),
                revenue_lift_pct: stats::mean(
                    &group
                        .iter()
                        .map(|c| c.performance.revenue.revenue_lift_percentage)
                        .collect::<Vec<_>>(),
                ),
                roi: stats::mean(
                    &group.iter().map(|c| c.performance.profitability.roi).collect::<Vec<_>>(),
                ),
                sustainability: stats::mean(
                    &group
                        .iter()
                        .map(|c| self.scorer.sustainability_score(c.performance.long_term.as_ref()))
                        .collect::<Vec<_>>(),
                ),
            };

            let scores: Vec<f64> =
                group.iter().map(|c| c.classification.success_score).collect();

            patterns.push(SuccessPattern {
                pattern_name: format!("{element_type}_{element_value}_pattern"),
                pattern_description: format!(
                    "Successful pattern involving {element_type} with value {element_value}"
                ),
                characteristics: vec![PatternCharacteristic {
                    element: element_type,
                    value: element_value,
                    importance: group.len() as f64 / successful.len() as f64,
                }],
                average_performance,
                frequency: group.len(),
                consistency: stats::consistency(&scores),
                reliability: reliability(&group),
            });
        }

        patterns
    }

    // TODO: derive failure patterns from shared element groups once the
    // negative sample in production data is large enough to be meaningful.
    fn unsuccessful_patterns(&self, _unsuccessful: &[&CombinationResult]) -> Vec<FailurePattern> {
        Vec::new()
    }

    fn optimal_combinations(&self, successful: &[&CombinationResult]) -> Vec<OptimalCombination> {
        let Some(best) = successful.iter().copied().reduce(|best, current| {
            if current.classification.success_score > best.classification.success_score {
                current
            } else {
                best
            }
        }) else {
            return Vec::new();
        };

        let optimal_elements = best
            .elements
            .iter()
            .map(|element| OptimalElement {
                element: element.element_type.clone(),
                optimal_value: element.element_value.clone(),
                tolerance_pct: OPTIMAL_TOLERANCE_PCT,
                criticality: "high".to_string(),
            })
            .collect();

        vec![OptimalCombination {
            combination_name: "Optimal_High_Performance".to_string(),
            description: "Combination optimized for maximum performance".to_string(),
            optimal_elements,
            expected_volume_lift: expected_range(best.performance.volume.volume_lift_percentage),
            expected_roi: expected_range(best.performance.profitability.roi),
        }]
    }
}

fn expected_range(observed: f64) -> ExpectedRange {
    ExpectedRange {
        min: observed * (1.0 - EXPECTED_RANGE_SPREAD),
        max: observed * (1.0 + EXPECTED_RANGE_SPREAD),
        expected: observed,
    }
}

/// Blend of statistical significance (step function over the mean p-value;
/// missing p-values count as 1.0) and sample size (1000 samples saturate).
fn reliability(group: &[&CombinationResult]) -> f64 {
    let avg_p_value = stats::mean(
        &group.iter().map(|c| c.statistics.p_value.unwrap_or(1.0)).collect::<Vec<_>>(),
    );
    let avg_sample_size = stats::mean(
        &group.iter().map(|c| c.statistics.sample_size.unwrap_or(0.0)).collect::<Vec<_>>(),
    );

    let significance_score = if avg_p_value < 0.05 {
        100.0
    } else if avg_p_value < 0.1 {
        75.0
    } else if avg_p_value < 0.2 {
        50.0
    } else {
        25.0
    };
    let sample_size_score = (avg_sample_size / 10.0).min(100.0);

    (significance_score + sample_size_score) / 2.0
}
