use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombinationId(pub String);

/// A single promotional/marketing/channel lever value inside a combination.
/// Values are a closed union so combinations can be grouped and hashed.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ElementValue {
    Text(String),
    Number(Decimal),
    Flag(bool),
}

impl std::fmt::Display for ElementValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text}"),
            Self::Number(number) => write!(f, "{number}"),
            Self::Flag(flag) => write!(f, "{flag}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombinationElement {
    pub element_type: String,
    pub element_value: ElementValue,
    pub element_weight: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeMetrics {
    pub total_volume: f64,
    pub volume_lift: f64,
    pub volume_lift_percentage: f64,
    pub sustained_volume: f64,
    pub incremental_volume: f64,
    pub baseline_volume: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueMetrics {
    pub total_revenue: f64,
    pub revenue_lift: f64,
    pub revenue_lift_percentage: f64,
    pub incremental_revenue: f64,
    pub revenue_per_unit: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfitabilityMetrics {
    pub gross_profit: f64,
    pub net_profit: f64,
    pub margin_impact: f64,
    pub roi: f64,
    pub payback_period_months: f64,
}

/// Volume retained in one post-promotion month, as a percentage of the
/// promoted peak.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumeSustainabilityPoint {
    pub months_after: u32,
    pub volume_retention: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerBehaviorImpact {
    pub new_customer_acquisition: f64,
    pub customer_retention_rate: f64,
    pub purchase_frequency_change: f64,
    pub basket_size_change: f64,
    pub brand_loyalty_impact: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LongTermImpact {
    pub volume_sustainability: Vec<VolumeSustainabilityPoint>,
    pub customer_behavior: Option<CustomerBehaviorImpact>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EfficiencyMetrics {
    pub cost_per_incremental_unit: f64,
    pub cost_per_incremental_revenue: f64,
    pub marketing_efficiency: f64,
    pub promotional_efficiency: f64,
    pub overall_efficiency: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceMetrics {
    pub volume: VolumeMetrics,
    pub revenue: RevenueMetrics,
    pub profitability: ProfitabilityMetrics,
    pub long_term: Option<LongTermImpact>,
    pub efficiency: EfficiencyMetrics,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticalAnalysis {
    pub sample_size: Option<f64>,
    pub confidence_level: Option<f64>,
    pub p_value: Option<f64>,
    pub correlation_coefficient: Option<f64>,
    pub r_squared: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallSuccess {
    Counterproductive,
    Unsuccessful,
    ModeratelySuccessful,
    Successful,
    HighlySuccessful,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessGrade {
    Poor,
    Fair,
    Good,
    Excellent,
}

/// Derived classification, computed once by the scorer and stored immutably
/// until recomputed from fresh performance data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuccessClassification {
    pub overall_success: OverallSuccess,
    pub volume_success: SuccessGrade,
    pub profitability_success: SuccessGrade,
    pub sustainability_success: SuccessGrade,
    pub success_score: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub factor: String,
    pub severity: String,
    pub probability: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskAssessment {
    pub overall_risk: Option<RiskLevel>,
    pub risk_factors: Vec<RiskFactor>,
    pub mitigation_strategies: Vec<String>,
}

/// Raw performance record for one tested combination, before scoring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombinationInput {
    pub combination_id: CombinationId,
    pub combination_name: Option<String>,
    pub elements: Vec<CombinationElement>,
    pub performance: PerformanceMetrics,
    #[serde(default)]
    pub statistics: StatisticalAnalysis,
    #[serde(default)]
    pub risk: RiskAssessment,
}

/// A combination with its derived classification filled in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombinationResult {
    pub combination_id: CombinationId,
    pub combination_name: Option<String>,
    pub elements: Vec<CombinationElement>,
    pub performance: PerformanceMetrics,
    pub statistics: StatisticalAnalysis,
    pub classification: SuccessClassification,
    pub risk: RiskAssessment,
}
