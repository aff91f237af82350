use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Brand,
    Customer,
    Channel,
    Product,
    Region,
    Campaign,
}

/// Basis metric snapshot for one allocation target. The caller fetches these
/// from sales/spend history; the engine only needs the shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationBasis {
    pub volume: Decimal,
    pub revenue: Decimal,
    pub profit: Decimal,
    pub historical_spend: Decimal,
    pub strategic_weight: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BasisItem {
    pub id: TargetId,
    pub target_type: TargetType,
    pub name: String,
    /// The proportional key under the chosen allocation method.
    pub value: Decimal,
    #[serde(default)]
    pub basis: CalculationBasis,
    pub expected_outcomes: Option<ExpectedOutcomes>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    Multiplier,
    Additive,
    Percentage,
}

/// Predicate deciding whether an adjustment factor applies to a target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FactorCondition {
    Always,
    TargetTypeIs { target_type: TargetType },
    TargetIn { targets: Vec<TargetId> },
    MinBasisValue { minimum: Decimal },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentFactor {
    pub factor: String,
    pub adjustment: AdjustmentKind,
    pub value: Decimal,
    pub condition: FactorCondition,
}

impl FactorCondition {
    pub fn matches(&self, item: &BasisItem) -> bool {
        match self {
            Self::Always => true,
            Self::TargetTypeIs { target_type } => item.target_type == *target_type,
            Self::TargetIn { targets } => targets.contains(&item.id),
            Self::MinBasisValue { minimum } => item.value >= *minimum,
        }
    }
}

/// Min/max clamp bounds for one proportional rule family.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProportionBounds {
    pub enabled: bool,
    pub minimum_allocation: Option<Decimal>,
    pub maximum_allocation: Option<Decimal>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProportionalRules {
    pub volume_proportions: ProportionBounds,
    pub revenue_proportions: ProportionBounds,
}

/// Reserve carve-outs expressed as percentages of the total budget. These are
/// informational: the per-target loop never deducts them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReservePolicy {
    pub contingency_pct: Decimal,
    pub opportunity_pct: Decimal,
    pub adjustment_pct: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reserve {
    pub amount: Decimal,
    pub percentage: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reserves {
    pub contingency: Reserve,
    pub opportunity: Reserve,
    pub adjustment: Reserve,
}

impl Reserves {
    pub fn total(&self) -> Decimal {
        self.contingency.amount + self.opportunity.amount + self.adjustment.amount
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpectedOutcomes {
    pub volume_target: Option<Decimal>,
    pub revenue_target: Option<Decimal>,
    pub profit_target: Option<Decimal>,
    pub roi_target: Option<Decimal>,
}

/// One computed allocation line. `final_allocation` may later be overwritten
/// by a reallocation; the base and adjusted figures are never rewritten.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllocationTarget {
    pub target_id: TargetId,
    pub target_type: TargetType,
    pub target_name: String,
    pub base_allocation: Decimal,
    pub adjusted_allocation: Decimal,
    pub final_allocation: Decimal,
    pub percentage: Decimal,
    pub calculation_basis: CalculationBasis,
    pub expected_outcomes: Option<ExpectedOutcomes>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReallocationChange {
    pub target_id: TargetId,
    pub target_type: TargetType,
    pub target_name: String,
    pub previous_allocation: Decimal,
    pub new_allocation: Decimal,
    pub change_amount: Decimal,
    /// `None` when the previous allocation was zero: the relative change is
    /// undefined, not infinite.
    pub change_percentage: Option<Decimal>,
    pub rationale: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReallocationRecord {
    pub date: DateTime<Utc>,
    pub reason: String,
    pub requested_by: String,
    pub changes: Vec<ReallocationChange>,
}

/// The full output of one allocation run plus its append-only history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllocationPlan {
    pub total_budget: Decimal,
    pub targets: Vec<AllocationTarget>,
    pub reserves: Reserves,
    pub reallocation_history: Vec<ReallocationRecord>,
}

impl AllocationPlan {
    pub fn total_allocated(&self) -> Decimal {
        self.targets.iter().map(|t| t.final_allocation).sum()
    }

    /// Budget left once allocations and reserves are accounted for. Negative
    /// headroom signals the soft conservation invariant being violated; the
    /// engine reports it and leaves the decision to the caller.
    pub fn headroom(&self) -> Decimal {
        self.total_budget - self.total_allocated() - self.reserves.total()
    }

    pub fn target(&self, target_id: &TargetId) -> Option<&AllocationTarget> {
        self.targets.iter().find(|t| &t.target_id == target_id)
    }
}
