//! Quality and risk roll-ups for promotion predictions.

use serde::{Deserialize, Serialize};

use crate::domain::combination::RiskLevel;

/// Weights for the analysis-quality composite; each dimension contributes
/// equally.
const QUALITY_DIMENSION_WEIGHT: f64 = 0.25;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityDimensions {
    pub data_completeness: f64,
    pub data_accuracy: f64,
    pub model_reliability: f64,
    pub prediction_stability: f64,
}

/// Equal-weighted composite of the four quality dimensions, on the same
/// 0-100 scale as its inputs.
pub fn overall_quality(dimensions: &QualityDimensions) -> f64 {
    dimensions.data_completeness * QUALITY_DIMENSION_WEIGHT
        + dimensions.data_accuracy * QUALITY_DIMENSION_WEIGHT
        + dimensions.model_reliability * QUALITY_DIMENSION_WEIGHT
        + dimensions.prediction_stability * QUALITY_DIMENSION_WEIGHT
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessLikelihood {
    HighlyLikely,
    Likely,
    Moderate,
    Unlikely,
    HighlyUnlikely,
}

pub fn success_likelihood(probability_pct: f64) -> SuccessLikelihood {
    if probability_pct >= 80.0 {
        SuccessLikelihood::HighlyLikely
    } else if probability_pct >= 60.0 {
        SuccessLikelihood::Likely
    } else if probability_pct >= 40.0 {
        SuccessLikelihood::Moderate
    } else if probability_pct >= 20.0 {
        SuccessLikelihood::Unlikely
    } else {
        SuccessLikelihood::HighlyUnlikely
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionRiskFactor {
    pub factor: String,
    pub severity: RiskSeverity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// Any critical factor dominates; more than two high factors escalate; a
/// single high factor is a medium overall.
pub fn overall_risk(factors: &[PredictionRiskFactor]) -> RiskLevel {
    let critical = factors.iter().filter(|f| f.severity == RiskSeverity::Critical).count();
    let high = factors.iter().filter(|f| f.severity == RiskSeverity::High).count();

    if critical > 0 {
        RiskLevel::VeryHigh
    } else if high > 2 {
        RiskLevel::High
    } else if high > 0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Accuracy of one predicted metric against its actual, as
/// `100 - |relative error|%`, floored at zero. Zero predictions cannot be
/// graded and yield `None`.
pub fn prediction_accuracy(actual: f64, predicted: f64) -> Option<f64> {
    if predicted == 0.0 {
        return None;
    }
    Some((100.0 - ((actual - predicted) / predicted * 100.0).abs()).max(0.0))
}

/// Mean of the positive accuracy components, 0 when none are gradeable.
pub fn overall_accuracy(components: &[Option<f64>]) -> f64 {
    let graded: Vec<f64> = components.iter().flatten().copied().filter(|a| *a > 0.0).collect();
    if graded.is_empty() {
        return 0.0;
    }
    graded.iter().sum::<f64>() / graded.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overall_quality_weights_dimensions_equally() {
        let quality = overall_quality(&QualityDimensions {
            data_completeness: 80.0,
            data_accuracy: 60.0,
            model_reliability: 100.0,
            prediction_stability: 40.0,
        });
        assert!((quality - 70.0).abs() < 1e-9);
    }

    #[test]
    fn likelihood_bands_are_inclusive() {
        assert_eq!(success_likelihood(80.0), SuccessLikelihood::HighlyLikely);
        assert_eq!(success_likelihood(79.9), SuccessLikelihood::Likely);
        assert_eq!(success_likelihood(40.0), SuccessLikelihood::Moderate);
        assert_eq!(success_likelihood(19.9), SuccessLikelihood::HighlyUnlikely);
    }

    #[test]
    fn risk_rolls_up_by_severity_counts() {
        let factor = |severity| PredictionRiskFactor { factor: "x".to_string(), severity };

        assert_eq!(overall_risk(&[]), RiskLevel::Low);
        assert_eq!(overall_risk(&[factor(RiskSeverity::Critical)]), RiskLevel::VeryHigh);
        assert_eq!(
            overall_risk(&[
                factor(RiskSeverity::High),
                factor(RiskSeverity::High),
                factor(RiskSeverity::High)
            ]),
            RiskLevel::High
        );
        assert_eq!(overall_risk(&[factor(RiskSeverity::High)]), RiskLevel::Medium);
        assert_eq!(overall_risk(&[factor(RiskSeverity::Low)]), RiskLevel::Low);
    }

    #[test]
    fn prediction_accuracy_guards_zero_and_floors() {
        assert_eq!(prediction_accuracy(500.0, 0.0), None);
        assert_eq!(prediction_accuracy(1_000.0, 1_000.0), Some(100.0));
        assert_eq!(prediction_accuracy(900.0, 1_000.0), Some(90.0));
        // 400% over forecast floors at zero rather than going negative
        assert_eq!(prediction_accuracy(5_000.0, 1_000.0), Some(0.0));
    }

    #[test]
    fn overall_accuracy_averages_graded_components_only() {
        let overall = overall_accuracy(&[Some(90.0), Some(70.0), None, Some(0.0)]);
        assert!((overall - 80.0).abs() < 1e-9);
        assert_eq!(overall_accuracy(&[None, Some(0.0)]), 0.0);
    }
}
