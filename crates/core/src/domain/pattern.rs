use serde::{Deserialize, Serialize};

use crate::domain::combination::ElementValue;

/// A shared element/value trait observed across successful combinations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternCharacteristic {
    pub element: String,
    pub value: ElementValue,
    /// Share of the successful population exhibiting this trait, in [0, 1].
    pub importance: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AveragePerformance {
    pub volume_lift_pct: f64,
    pub revenue_lift_pct: f64,
    pub roi: f64,
    pub sustainability: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuccessPattern {
    pub pattern_name: String,
    pub pattern_description: String,
    pub characteristics: Vec<PatternCharacteristic>,
    pub average_performance: AveragePerformance,
    /// Number of combinations backing this pattern.
    pub frequency: usize,
    /// 100 minus the coefficient of variation of the backing success scores.
    pub consistency: f64,
    /// Blend of statistical significance and sample size, in [0, 100].
    pub reliability: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FailurePattern {
    pub pattern_name: String,
    pub pattern_description: String,
    pub characteristics: Vec<PatternCharacteristic>,
    pub failure_reasons: Vec<String>,
    pub frequency: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpectedRange {
    pub min: f64,
    pub max: f64,
    pub expected: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptimalElement {
    pub element: String,
    pub optimal_value: ElementValue,
    pub tolerance_pct: f64,
    pub criticality: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptimalCombination {
    pub combination_name: String,
    pub description: String,
    pub optimal_elements: Vec<OptimalElement>,
    pub expected_volume_lift: ExpectedRange,
    pub expected_roi: ExpectedRange,
}

/// Output of one pattern-mining pass over a set of scored combinations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternAnalysis {
    pub successful_patterns: Vec<SuccessPattern>,
    pub unsuccessful_patterns: Vec<FailurePattern>,
    pub optimal_combinations: Vec<OptimalCombination>,
}

impl PatternAnalysis {
    pub fn is_empty(&self) -> bool {
        self.successful_patterns.is_empty()
            && self.unsuccessful_patterns.is_empty()
            && self.optimal_combinations.is_empty()
    }
}
