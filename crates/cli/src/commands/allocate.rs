use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tradespend_core::allocation::{allocate, AllocationInput};
use tradespend_core::config::EngineConfig;
use tradespend_core::domain::allocation::{
    AdjustmentFactor, BasisItem, ProportionalRules, ReservePolicy,
};

use crate::commands::{load_snapshot, CommandResult};

/// On-disk snapshot: the reserve policy may be omitted, in which case the
/// configured policy applies.
#[derive(Debug, Deserialize)]
struct BudgetSnapshot {
    total_budget: Decimal,
    basis: Vec<BasisItem>,
    #[serde(default)]
    adjustment_factors: Vec<AdjustmentFactor>,
    #[serde(default)]
    rules: ProportionalRules,
    #[serde(default)]
    reserves: Option<ReservePolicy>,
}

pub fn run(config: &EngineConfig, budget_path: &Path) -> CommandResult {
    let snapshot: BudgetSnapshot = match load_snapshot("allocate", budget_path) {
        Ok(snapshot) => snapshot,
        Err(failure) => return failure,
    };

    let input = AllocationInput {
        total_budget: snapshot.total_budget,
        basis: snapshot.basis,
        adjustment_factors: snapshot.adjustment_factors,
        rules: snapshot.rules,
        reserves: snapshot.reserves.unwrap_or_else(|| config.reserves.clone()),
    };

    match allocate(&input) {
        Ok(plan) => {
            let headroom = plan.headroom();
            if headroom < Decimal::ZERO {
                tracing::warn!(%headroom, "allocations plus reserves exceed the total budget");
            }
            tracing::info!(targets = plan.targets.len(), "budget allocated");
            CommandResult::success("allocate", "budget distributed across targets", plan)
        }
        Err(error) => CommandResult::failure("allocate", "engine", error.to_string(), 3),
    }
}
