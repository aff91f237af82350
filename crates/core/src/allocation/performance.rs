//! Spend tracking, variance analysis, and reallocation against an
//! `AllocationPlan`. All functions return new records; the caller persists.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::allocation::{
    AllocationPlan, AllocationTarget, ReallocationChange, ReallocationRecord, TargetId,
};
use crate::errors::EngineError;

/// Incremental actuals reported for one target since the last tracking call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetActuals {
    pub target_id: TargetId,
    pub spend: Decimal,
    pub volume: Decimal,
    pub revenue: Decimal,
    pub profit: Decimal,
    pub roi_pct: Option<Decimal>,
}

/// Running performance state for one target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetPerformance {
    pub target_id: TargetId,
    pub target_name: String,
    pub spend_to_date: Decimal,
    pub remaining_budget: Decimal,
    pub utilization_pct: Decimal,
    pub actual_volume: Decimal,
    pub actual_revenue: Decimal,
    pub actual_profit: Decimal,
    pub actual_roi_pct: Option<Decimal>,
    pub budget_variance: Decimal,
    pub volume_variance: Option<Decimal>,
    pub revenue_variance: Option<Decimal>,
    pub profit_variance: Option<Decimal>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverallPerformance {
    pub total_spent: Decimal,
    pub total_remaining: Decimal,
    pub average_utilization_pct: Decimal,
    pub average_roi_pct: Decimal,
    pub budget_variance_total: Decimal,
    pub performance_variance_total: Decimal,
    pub cost_per_unit: Decimal,
    pub cost_per_revenue: Decimal,
    pub efficiency_score: Decimal,
    pub last_calculated: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestedChange {
    pub target_id: TargetId,
    pub new_allocation: Decimal,
    pub rationale: Option<String>,
}

/// Fold a batch of incremental actuals into the running performance set,
/// returning the new set. Targets without new actuals pass through untouched.
pub fn track_actuals(
    plan: &AllocationPlan,
    existing: &[TargetPerformance],
    actuals: &[TargetActuals],
    as_of: DateTime<Utc>,
) -> Result<Vec<TargetPerformance>, EngineError> {
    let mut updated: Vec<TargetPerformance> = existing.to_vec();

    for incoming in actuals {
        let allocation = plan
            .target(&incoming.target_id)
            .ok_or_else(|| EngineError::unknown_target(&incoming.target_id))?;

        let previous = updated.iter().position(|p| p.target_id == incoming.target_id);
        let merged = match previous {
            Some(index) => {
                let merged = merge(&updated[index], allocation, incoming, as_of);
                updated[index] = merged.clone();
                merged
            }
            None => {
                let merged = merge(&fresh(allocation, as_of), allocation, incoming, as_of);
                updated.push(merged.clone());
                merged
            }
        };
        debug_assert_eq!(merged.target_id, incoming.target_id);
    }

    Ok(updated)
}

fn fresh(allocation: &AllocationTarget, as_of: DateTime<Utc>) -> TargetPerformance {
    TargetPerformance {
        target_id: allocation.target_id.clone(),
        target_name: allocation.target_name.clone(),
        spend_to_date: Decimal::ZERO,
        remaining_budget: allocation.final_allocation,
        utilization_pct: Decimal::ZERO,
        actual_volume: Decimal::ZERO,
        actual_revenue: Decimal::ZERO,
        actual_profit: Decimal::ZERO,
        actual_roi_pct: None,
        budget_variance: Decimal::ZERO,
        volume_variance: None,
        revenue_variance: None,
        profit_variance: None,
        last_updated: as_of,
    }
}

fn merge(
    previous: &TargetPerformance,
    allocation: &AllocationTarget,
    incoming: &TargetActuals,
    as_of: DateTime<Utc>,
) -> TargetPerformance {
    let spend_to_date = previous.spend_to_date + incoming.spend;
    let actual_volume = previous.actual_volume + incoming.volume;
    let actual_revenue = previous.actual_revenue + incoming.revenue;
    let actual_profit = previous.actual_profit + incoming.profit;

    let utilization_pct = if allocation.final_allocation > Decimal::ZERO {
        spend_to_date / allocation.final_allocation * Decimal::from(100)
    } else {
        Decimal::ZERO
    };

    let expected = allocation.expected_outcomes.as_ref();
    let variance_against = |actual: Decimal, target: Option<Decimal>| target.map(|t| actual - t);

    TargetPerformance {
        target_id: previous.target_id.clone(),
        target_name: previous.target_name.clone(),
        spend_to_date,
        remaining_budget: allocation.final_allocation - spend_to_date,
        utilization_pct,
        actual_volume,
        actual_revenue,
        actual_profit,
        actual_roi_pct: incoming.roi_pct.or(previous.actual_roi_pct),
        budget_variance: spend_to_date - allocation.final_allocation,
        volume_variance: variance_against(actual_volume, expected.and_then(|e| e.volume_target)),
        revenue_variance: variance_against(actual_revenue, expected.and_then(|e| e.revenue_target)),
        profit_variance: variance_against(actual_profit, expected.and_then(|e| e.profit_target)),
        last_updated: as_of,
    }
}

/// Aggregate the performance set: sums for spend and variances, means for
/// utilization and positive ROI, plus the composite efficiency score.
pub fn overall_performance(
    plan: &AllocationPlan,
    performances: &[TargetPerformance],
    as_of: DateTime<Utc>,
) -> OverallPerformance {
    let count = Decimal::from(performances.len().max(1));
    let total_spent: Decimal = performances.iter().map(|p| p.spend_to_date).sum();
    let total_remaining = plan.total_budget - total_spent;

    let average_utilization_pct =
        performances.iter().map(|p| p.utilization_pct).sum::<Decimal>() / count;

    let rois: Vec<Decimal> = performances
        .iter()
        .filter_map(|p| p.actual_roi_pct)
        .filter(|roi| *roi > Decimal::ZERO)
        .collect();
    let average_roi_pct = if rois.is_empty() {
        Decimal::ZERO
    } else {
        rois.iter().copied().sum::<Decimal>() / Decimal::from(rois.len())
    };

    let budget_variance_total: Decimal = performances.iter().map(|p| p.budget_variance).sum();
    let performance_variance_total: Decimal =
        performances.iter().filter_map(|p| p.revenue_variance).sum();

    let total_volume: Decimal = performances.iter().map(|p| p.actual_volume).sum();
    let total_revenue: Decimal = performances.iter().map(|p| p.actual_revenue).sum();

    let cost_per_unit =
        if total_volume > Decimal::ZERO { total_spent / total_volume } else { Decimal::ZERO };
    let cost_per_revenue = if total_revenue > Decimal::ZERO {
        total_spent / total_revenue * Decimal::from(100)
    } else {
        Decimal::ZERO
    };

    // ROI contributes up to 50 points, cost efficiency the other 50.
    let hundred = Decimal::from(100);
    let two = Decimal::from(2);
    let efficiency_raw =
        average_roi_pct / two + (hundred - cost_per_revenue).max(Decimal::ZERO) / two;
    let efficiency_score = efficiency_raw.clamp(Decimal::ZERO, hundred);

    OverallPerformance {
        total_spent,
        total_remaining,
        average_utilization_pct,
        average_roi_pct,
        budget_variance_total,
        performance_variance_total,
        cost_per_unit,
        cost_per_revenue,
        efficiency_score,
        last_calculated: as_of,
    }
}

/// Apply requested allocation changes, returning a new plan with overwritten
/// final allocations and one appended history record. Existing history
/// entries are never rewritten.
pub fn reallocate(
    plan: &AllocationPlan,
    changes: &[RequestedChange],
    reason: impl Into<String>,
    requested_by: impl Into<String>,
    as_of: DateTime<Utc>,
) -> Result<AllocationPlan, EngineError> {
    let mut next = plan.clone();
    let mut recorded = Vec::with_capacity(changes.len());

    for change in changes {
        let target = next
            .targets
            .iter_mut()
            .find(|t| t.target_id == change.target_id)
            .ok_or_else(|| EngineError::unknown_target(&change.target_id))?;

        let previous_allocation = target.final_allocation;
        let change_amount = change.new_allocation - previous_allocation;
        let change_percentage = if previous_allocation != Decimal::ZERO {
            Some(change_amount / previous_allocation * Decimal::from(100))
        } else {
            None
        };

        recorded.push(ReallocationChange {
            target_id: change.target_id.clone(),
            target_type: target.target_type,
            target_name: target.target_name.clone(),
            previous_allocation,
            new_allocation: change.new_allocation,
            change_amount,
            change_percentage,
            rationale: change.rationale.clone(),
        });

        target.final_allocation = change.new_allocation;
        target.percentage = if next.total_budget > Decimal::ZERO {
            change.new_allocation / next.total_budget * Decimal::from(100)
        } else {
            Decimal::ZERO
        };
    }

    next.reallocation_history.push(ReallocationRecord {
        date: as_of,
        reason: reason.into(),
        requested_by: requested_by.into(),
        changes: recorded,
    });

    Ok(next)
}
