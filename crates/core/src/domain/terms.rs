use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::product::ProductId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub Uuid);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermType {
    VolumeDiscount,
    EarlyPayment,
    PromptPayment,
    Rebate,
    ListingFee,
    PromotionalSupport,
    MarketingContribution,
    SettlementDiscount,
    CashDiscount,
    QuantityDiscount,
    LoyaltyBonus,
    GrowthIncentive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerTier {
    Platinum,
    Gold,
    Silver,
    Bronze,
    All,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    Chain,
    Independent,
    Wholesaler,
    Distributor,
    Online,
    All,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    ModernTrade,
    TraditionalTrade,
    Ecommerce,
    Horeca,
    B2b,
    All,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    FixedAmount,
    UnitDiscount,
}

/// One rung of a volume-discount ladder. `max_volume: None` means the tier is
/// open-ended ("and above").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumeTier {
    pub min_volume: Decimal,
    pub max_volume: Option<Decimal>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub rebate_percentage: Option<Decimal>,
}

impl VolumeTier {
    /// Whether `volume` falls inside this tier's `[min_volume, max_volume]`
    /// band (upper bound inclusive, absent upper bound unbounded).
    pub fn contains(&self, volume: Decimal) -> bool {
        volume >= self.min_volume && self.max_volume.map_or(true, |max| volume <= max)
    }
}

/// A single customer-side applicability rule. A rule matches when any of its
/// populated facets matches (id equality, or an `All` wildcard on tier/type).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomerRule {
    pub customer: Option<CustomerId>,
    pub customer_tier: Option<CustomerTier>,
    pub customer_type: Option<CustomerType>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductRule {
    pub product: Option<ProductId>,
    pub product_category: Option<String>,
    pub brand: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Applicability {
    pub customers: Vec<CustomerRule>,
    pub products: Vec<ProductRule>,
    pub channels: Vec<Channel>,
    pub regions: Vec<String>,
    pub minimum_order_value: Option<Decimal>,
    pub minimum_volume: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentTerms {
    pub standard_days: u32,
    pub early_payment_days: Option<u32>,
    pub early_payment_discount_pct: Option<Decimal>,
    pub late_payment_penalty_pct: Option<Decimal>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Draft,
    PendingApproval,
    Approved,
    Rejected,
    Expired,
    Suspended,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidityPeriod {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Cumulative performance of a term across settled orders. Produced and
/// re-produced by `pricing::apply_actuals`; the caller owns persistence.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TermPerformance {
    pub actual_volume: Decimal,
    pub actual_revenue: Decimal,
    pub actual_cost: Decimal,
    pub actual_roi_pct: Option<Decimal>,
    pub last_calculated_at: Option<DateTime<Utc>>,
}

/// A negotiated trading term: who it applies to and how discounts/rebates
/// are earned against it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradingTerm {
    pub id: TermId,
    pub name: String,
    pub code: String,
    pub term_type: TermType,
    pub applicability: Applicability,
    pub volume_tiers: Vec<VolumeTier>,
    pub payment_terms: Option<PaymentTerms>,
    pub approval_status: ApprovalStatus,
    pub validity: ValidityPeriod,
    pub is_active: bool,
}

impl TradingTerm {
    /// Approved, flagged active, and inside its validity window at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.approval_status == ApprovalStatus::Approved
            && self.validity.start_date <= now
            && self.validity.end_date >= now
    }
}
