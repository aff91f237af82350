//! Campaign budget and KPI roll-ups.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetBreakdown {
    pub advertising: Decimal,
    pub in_store: Decimal,
    pub digital: Decimal,
    pub trade: Decimal,
    pub production: Decimal,
    pub other: Decimal,
}

impl BudgetBreakdown {
    pub fn allocated(&self) -> Decimal {
        self.advertising + self.in_store + self.digital + self.trade + self.production + self.other
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CampaignBudget {
    pub total: Decimal,
    pub spent: Decimal,
    pub breakdown: BudgetBreakdown,
}

impl CampaignBudget {
    pub fn utilization_pct(&self) -> Decimal {
        if self.total > Decimal::ZERO {
            self.spent / self.total * Decimal::from(100)
        } else {
            Decimal::ZERO
        }
    }
}

/// Campaign ROI from incremental sales: `(incremental - spent)/spent * 100`.
/// Undefined until any spend is recorded.
pub fn campaign_roi(incremental_sales: Decimal, spent: Decimal) -> Option<Decimal> {
    if spent > Decimal::ZERO {
        Some((incremental_sales - spent) / spent * Decimal::from(100))
    } else {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiStatus {
    OnTrack,
    AtRisk,
    OffTrack,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub metric: String,
    pub target: Decimal,
    pub actual: Option<Decimal>,
}

/// Achievement of 90% of target or better is on track, 70% at risk, anything
/// lower off track. Zero targets and unreported actuals cannot be graded.
pub fn kpi_status(kpi: &Kpi) -> Option<KpiStatus> {
    let actual = kpi.actual?;
    if kpi.target == Decimal::ZERO {
        return None;
    }

    let achievement_pct = actual / kpi.target * Decimal::from(100);
    Some(if achievement_pct >= Decimal::from(90) {
        KpiStatus::OnTrack
    } else if achievement_pct >= Decimal::from(70) {
        KpiStatus::AtRisk
    } else {
        KpiStatus::OffTrack
    })
}

/// Whole days left before the campaign end date, clamped at zero.
pub fn days_remaining(end_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (end_date - now).num_days().max(0)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn breakdown_sums_every_category() {
        let breakdown = BudgetBreakdown {
            advertising: Decimal::from(10_000),
            in_store: Decimal::from(5_000),
            digital: Decimal::from(3_000),
            trade: Decimal::from(7_000),
            production: Decimal::from(2_000),
            other: Decimal::from(500),
        };
        assert_eq!(breakdown.allocated(), Decimal::from(27_500));
    }

    #[test]
    fn utilization_guards_zero_total() {
        let budget = CampaignBudget {
            total: Decimal::ZERO,
            spent: Decimal::from(100),
            breakdown: BudgetBreakdown::default(),
        };
        assert_eq!(budget.utilization_pct(), Decimal::ZERO);

        let funded = CampaignBudget {
            total: Decimal::from(50_000),
            spent: Decimal::from(20_000),
            breakdown: BudgetBreakdown::default(),
        };
        assert_eq!(funded.utilization_pct(), Decimal::from(40));
    }

    #[test]
    fn roi_requires_recorded_spend() {
        assert_eq!(campaign_roi(Decimal::from(30_000), Decimal::ZERO), None);
        assert_eq!(
            campaign_roi(Decimal::from(30_000), Decimal::from(20_000)),
            Some(Decimal::from(50))
        );
    }

    #[test]
    fn kpi_bands_follow_achievement_percentage() {
        let kpi = |target: i64, actual: Option<i64>| Kpi {
            metric: "volume_lift".to_string(),
            target: Decimal::from(target),
            actual: actual.map(Decimal::from),
        };

        assert_eq!(kpi_status(&kpi(100, Some(90))), Some(KpiStatus::OnTrack));
        assert_eq!(kpi_status(&kpi(100, Some(89))), Some(KpiStatus::AtRisk));
        assert_eq!(kpi_status(&kpi(100, Some(70))), Some(KpiStatus::AtRisk));
        assert_eq!(kpi_status(&kpi(100, Some(69))), Some(KpiStatus::OffTrack));
        assert_eq!(kpi_status(&kpi(100, None)), None);
        assert_eq!(kpi_status(&kpi(0, Some(50))), None);
    }

    #[test]
    fn days_remaining_clamps_past_campaigns_to_zero() {
        let now = Utc::now();
        assert_eq!(days_remaining(now + Duration::days(14), now), 14);
        assert_eq!(days_remaining(now - Duration::days(3), now), 0);
    }
}
