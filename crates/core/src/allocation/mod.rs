//! Proportional budget allocation across weighted targets.
//!
//! The allocator distributes a total budget in proportion to a caller-chosen
//! basis metric, then runs each line through the declared adjustment factors
//! in order and clamps against the enabled proportional rules. Reserves are
//! carved out of the same total but never deducted from the per-target loop;
//! `AllocationPlan::headroom` reports the resulting slack (or overrun).

pub mod performance;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::allocation::{
    AdjustmentFactor, AdjustmentKind, AllocationPlan, AllocationTarget, BasisItem,
    ProportionBounds, ProportionalRules, Reserve, ReservePolicy, Reserves,
};
use crate::errors::EngineError;

pub use performance::{
    overall_performance, reallocate, track_actuals, OverallPerformance, RequestedChange,
    TargetActuals, TargetPerformance,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllocationInput {
    pub total_budget: Decimal,
    pub basis: Vec<BasisItem>,
    pub adjustment_factors: Vec<AdjustmentFactor>,
    pub rules: ProportionalRules,
    pub reserves: ReservePolicy,
}

pub trait BudgetAllocator: Send + Sync {
    fn allocate(&self, input: &AllocationInput) -> Result<AllocationPlan, EngineError>;
}

#[derive(Default)]
pub struct ProportionalAllocator;

impl BudgetAllocator for ProportionalAllocator {
    fn allocate(&self, input: &AllocationInput) -> Result<AllocationPlan, EngineError> {
        allocate(input)
    }
}

pub fn allocate(input: &AllocationInput) -> Result<AllocationPlan, EngineError> {
    validate(input)?;

    let total_budget = input.total_budget;
    let total_base: Decimal = input.basis.iter().map(|item| item.value).sum();

    let mut targets = Vec::with_capacity(input.basis.len());
    for item in &input.basis {
        // Zero basis total is a valid degenerate case: every share is zero.
        let base_percentage = if total_base > Decimal::ZERO {
            item.value / total_base * Decimal::from(100)
        } else {
            Decimal::ZERO
        };
        let base_allocation = base_percentage / Decimal::from(100) * total_budget;

        let mut adjusted_allocation = base_allocation;
        for factor in &input.adjustment_factors {
            if factor.condition.matches(item) {
                adjusted_allocation = apply_adjustment(adjusted_allocation, factor);
            }
        }

        let final_allocation = apply_bounds(
            apply_bounds(adjusted_allocation, &input.rules.volume_proportions),
            &input.rules.revenue_proportions,
        );

        let percentage = if total_budget > Decimal::ZERO {
            final_allocation / total_budget * Decimal::from(100)
        } else {
            Decimal::ZERO
        };

        targets.push(AllocationTarget {
            target_id: item.id.clone(),
            target_type: item.target_type,
            target_name: item.name.clone(),
            base_allocation,
            adjusted_allocation,
            final_allocation,
            percentage,
            calculation_basis: item.basis.clone(),
            expected_outcomes: item.expected_outcomes.clone(),
        });
    }

    Ok(AllocationPlan {
        total_budget,
        targets,
        reserves: carve_reserves(total_budget, &input.reserves),
        reallocation_history: Vec::new(),
    })
}

/// Factor application order is the declared list order; the operations do not
/// commute in general.
fn apply_adjustment(allocation: Decimal, factor: &AdjustmentFactor) -> Decimal {
    match factor.adjustment {
        AdjustmentKind::Multiplier => allocation * factor.value,
        AdjustmentKind::Additive => allocation + factor.value,
        AdjustmentKind::Percentage => {
            allocation * (Decimal::ONE + factor.value / Decimal::from(100))
        }
    }
}

fn apply_bounds(allocation: Decimal, bounds: &ProportionBounds) -> Decimal {
    if !bounds.enabled {
        return allocation;
    }
    let mut clamped = allocation;
    if let Some(minimum) = bounds.minimum_allocation {
        clamped = clamped.max(minimum);
    }
    if let Some(maximum) = bounds.maximum_allocation {
        clamped = clamped.min(maximum);
    }
    clamped
}

fn carve_reserves(total_budget: Decimal, policy: &ReservePolicy) -> Reserves {
    let carve = |percentage: Decimal| Reserve {
        amount: total_budget * percentage / Decimal::from(100),
        percentage,
    };
    Reserves {
        contingency: carve(policy.contingency_pct),
        opportunity: carve(policy.opportunity_pct),
        adjustment: carve(policy.adjustment_pct),
    }
}

fn validate(input: &AllocationInput) -> Result<(), EngineError> {
    if input.total_budget < Decimal::ZERO {
        return Err(EngineError::invalid_input(format!(
            "total budget must be non-negative, got {}",
            input.total_budget
        )));
    }

    let mut seen = HashSet::new();
    for item in &input.basis {
        if item.value < Decimal::ZERO {
            return Err(EngineError::invalid_input(format!(
                "basis item `{}` has a negative value {}",
                item.id.0, item.value
            )));
        }
        if !seen.insert(&item.id) {
            return Err(EngineError::invalid_input(format!(
                "basis item `{}` appears more than once",
                item.id.0
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::allocation::{
        AdjustmentFactor, AdjustmentKind, BasisItem, CalculationBasis, FactorCondition,
        ProportionBounds, ProportionalRules, ReservePolicy, TargetId, TargetType,
    };
    use crate::errors::EngineError;

    use super::*;

    fn basis_item(id: &str, value: i64) -> BasisItem {
        BasisItem {
            id: TargetId(id.to_string()),
            target_type: TargetType::Brand,
            name: id.to_string(),
            value: Decimal::from(value),
            basis: CalculationBasis { volume: Decimal::from(value), ..CalculationBasis::default() },
            expected_outcomes: None,
        }
    }

    fn input(total: i64, basis: Vec<BasisItem>) -> AllocationInput {
        AllocationInput {
            total_budget: Decimal::from(total),
            basis,
            adjustment_factors: Vec::new(),
            rules: ProportionalRules::default(),
            reserves: ReservePolicy::default(),
        }
    }

    #[test]
    fn base_allocations_sum_to_total_budget() {
        let plan = allocate(&input(
            100_000,
            vec![basis_item("brand-a", 600), basis_item("brand-b", 300), basis_item("brand-c", 100)],
        ))
        .expect("plan");

        let base_total: Decimal = plan.targets.iter().map(|t| t.base_allocation).sum();
        assert_eq!(base_total, Decimal::from(100_000));
        assert_eq!(plan.targets[0].base_allocation, Decimal::from(60_000));
        assert_eq!(plan.targets[0].percentage, Decimal::from(60));
    }

    #[test]
    fn zero_basis_total_allocates_zero_everywhere() {
        let plan = allocate(&input(
            50_000,
            vec![basis_item("brand-a", 0), basis_item("brand-b", 0)],
        ))
        .expect("plan");

        for target in &plan.targets {
            assert_eq!(target.base_allocation, Decimal::ZERO);
            assert_eq!(target.final_allocation, Decimal::ZERO);
            assert_eq!(target.percentage, Decimal::ZERO);
        }
    }

    #[test]
    fn adjustment_factors_apply_in_declared_order() {
        let mut request = input(10_000, vec![basis_item("brand-a", 1)]);
        request.adjustment_factors = vec![
            AdjustmentFactor {
                factor: "strategic boost".to_string(),
                adjustment: AdjustmentKind::Additive,
                value: Decimal::from(1_000),
                condition: FactorCondition::Always,
            },
            AdjustmentFactor {
                factor: "growth multiplier".to_string(),
                adjustment: AdjustmentKind::Multiplier,
                value: Decimal::from(2),
                condition: FactorCondition::Always,
            },
        ];

        // (10000 + 1000) * 2, not 10000 * 2 + 1000
        let plan = allocate(&request).expect("plan");
        assert_eq!(plan.targets[0].adjusted_allocation, Decimal::from(22_000));

        request.adjustment_factors.reverse();
        let reversed = allocate(&request).expect("plan");
        assert_eq!(reversed.targets[0].adjusted_allocation, Decimal::from(21_000));
    }

    #[test]
    fn percentage_factor_scales_relative() {
        let mut request = input(10_000, vec![basis_item("brand-a", 1)]);
        request.adjustment_factors = vec![AdjustmentFactor {
            factor: "seasonal uplift".to_string(),
            adjustment: AdjustmentKind::Percentage,
            value: Decimal::from(15),
            condition: FactorCondition::Always,
        }];

        let plan = allocate(&request).expect("plan");
        assert_eq!(plan.targets[0].adjusted_allocation, Decimal::from(11_500));
    }

    #[test]
    fn conditions_gate_factor_application() {
        let mut request = input(
            10_000,
            vec![basis_item("brand-a", 500), basis_item("brand-b", 500)],
        );
        request.adjustment_factors = vec![AdjustmentFactor {
            factor: "focus brand".to_string(),
            adjustment: AdjustmentKind::Multiplier,
            value: Decimal::from(3),
            condition: FactorCondition::TargetIn { targets: vec![TargetId("brand-a".to_string())] },
        }];

        let plan = allocate(&request).expect("plan");
        assert_eq!(plan.targets[0].adjusted_allocation, Decimal::from(15_000));
        assert_eq!(plan.targets[1].adjusted_allocation, Decimal::from(5_000));
    }

    #[test]
    fn enabled_bounds_clamp_after_adjustment() {
        let mut request = input(
            10_000,
            vec![basis_item("brand-a", 900), basis_item("brand-b", 100)],
        );
        request.rules = ProportionalRules {
            volume_proportions: ProportionBounds {
                enabled: true,
                minimum_allocation: Some(Decimal::from(2_000)),
                maximum_allocation: Some(Decimal::from(7_000)),
            },
            revenue_proportions: ProportionBounds::default(),
        };

        let plan = allocate(&request).expect("plan");
        assert_eq!(plan.targets[0].final_allocation, Decimal::from(7_000));
        assert_eq!(plan.targets[1].final_allocation, Decimal::from(2_000));
        // base figures are untouched by the clamp
        assert_eq!(plan.targets[0].base_allocation, Decimal::from(9_000));
    }

    #[test]
    fn disabled_bounds_do_not_clamp() {
        let mut request = input(10_000, vec![basis_item("brand-a", 1)]);
        request.rules.volume_proportions = ProportionBounds {
            enabled: false,
            minimum_allocation: Some(Decimal::from(20_000)),
            maximum_allocation: None,
        };

        let plan = allocate(&request).expect("plan");
        assert_eq!(plan.targets[0].final_allocation, Decimal::from(10_000));
    }

    #[test]
    fn reserves_are_carved_from_total_not_targets() {
        let mut request = input(100_000, vec![basis_item("brand-a", 1)]);
        request.reserves = ReservePolicy {
            contingency_pct: Decimal::from(5),
            opportunity_pct: Decimal::from(3),
            adjustment_pct: Decimal::from(2),
        };

        let plan = allocate(&request).expect("plan");
        assert_eq!(plan.reserves.contingency.amount, Decimal::from(5_000));
        assert_eq!(plan.reserves.total(), Decimal::from(10_000));
        // the single target still receives the full budget; headroom goes negative
        assert_eq!(plan.targets[0].final_allocation, Decimal::from(100_000));
        assert_eq!(plan.headroom(), Decimal::from(-10_000));
    }

    #[test]
    fn negative_basis_value_fails_fast() {
        let error = allocate(&input(10_000, vec![basis_item("brand-a", -5)]))
            .expect_err("negative basis");
        assert!(matches!(error, EngineError::InvalidInput { .. }));
    }

    #[test]
    fn duplicate_target_id_fails_fast() {
        let error = allocate(&input(
            10_000,
            vec![basis_item("brand-a", 5), basis_item("brand-a", 7)],
        ))
        .expect_err("duplicate id");
        assert!(matches!(error, EngineError::InvalidInput { .. }));
    }

    #[test]
    fn allocation_is_idempotent() {
        let request = input(
            99_999,
            vec![basis_item("brand-a", 123), basis_item("brand-b", 456), basis_item("brand-c", 789)],
        );

        assert_eq!(allocate(&request).expect("first"), allocate(&request).expect("second"));
    }
}
