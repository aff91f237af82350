//! Trading-term pricing: tier resolution, discount/rebate computation, and
//! applicability matching.
//!
//! Tiers are evaluated in declaration order and the first band containing the
//! order volume wins. Overlapping tiers are tolerated; declaration order is
//! authoritative. An order that matches no tier earns the zero quote, which
//! is a valid outcome rather than an error.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;
use crate::domain::terms::{
    CustomerId, CustomerTier, CustomerType, TermPerformance, TradingTerm, VolumeTier,
};

/// The order snapshot a term is evaluated against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderContext {
    pub customer: CustomerId,
    pub customer_tier: CustomerTier,
    pub customer_type: CustomerType,
    pub product: ProductId,
    pub order_value: Decimal,
    pub volume: Decimal,
}

/// Discount and rebate earned against one term at a given volume/value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierQuote {
    pub discount: Decimal,
    pub rebate: Decimal,
    pub tier: Option<VolumeTier>,
}

impl TierQuote {
    pub fn zero() -> Self {
        Self { discount: Decimal::ZERO, rebate: Decimal::ZERO, tier: None }
    }
}

pub trait TermPricer: Send + Sync {
    fn quote(&self, term: &TradingTerm, order: &OrderContext) -> TierQuote;
}

#[derive(Default)]
pub struct DeterministicTermPricer;

impl TermPricer for DeterministicTermPricer {
    /// Applicability gate first; a term that does not apply earns nothing.
    fn quote(&self, term: &TradingTerm, order: &OrderContext) -> TierQuote {
        if !applies_to(term, order) {
            return TierQuote::zero();
        }
        calculate_discount(&term.volume_tiers, order.volume, order.order_value)
    }
}

/// First tier in declaration order whose band contains `volume`.
pub fn resolve_tier(tiers: &[VolumeTier], volume: Decimal) -> Option<&VolumeTier> {
    tiers.iter().find(|tier| tier.contains(volume))
}

pub fn calculate_discount(tiers: &[VolumeTier], volume: Decimal, value: Decimal) -> TierQuote {
    let Some(tier) = resolve_tier(tiers, volume) else {
        return TierQuote::zero();
    };

    let discount = match tier.discount_type {
        crate::domain::terms::DiscountType::Percentage => {
            value * tier.discount_value / Decimal::from(100)
        }
        crate::domain::terms::DiscountType::FixedAmount => tier.discount_value,
        crate::domain::terms::DiscountType::UnitDiscount => volume * tier.discount_value,
    };

    let rebate_pct = tier.rebate_percentage.unwrap_or(Decimal::ZERO);
    let rebate = value * rebate_pct / Decimal::from(100);

    TierQuote { discount, rebate, tier: Some(tier.clone()) }
}

/// All four gates must pass: customer rule, product list, order-value
/// minimum, volume minimum. There is no partial application.
pub fn applies_to(term: &TradingTerm, order: &OrderContext) -> bool {
    let applicability = &term.applicability;

    let customer_applies = applicability.customers.iter().any(|rule| {
        rule.customer.as_ref() == Some(&order.customer)
            || rule.customer_tier == Some(CustomerTier::All)
            || rule.customer_type == Some(CustomerType::All)
            || rule.customer_tier == Some(order.customer_tier)
            || rule.customer_type == Some(order.customer_type)
    });

    let product_applies = applicability.products.is_empty()
        || applicability.products.iter().any(|rule| rule.product.as_ref() == Some(&order.product));

    let order_value_met = applicability
        .minimum_order_value
        .map_or(true, |minimum| order.order_value >= minimum);

    let volume_met =
        applicability.minimum_volume.map_or(true, |minimum| order.volume >= minimum);

    customer_applies && product_applies && order_value_met && volume_met
}

/// Early-payment discount earned when settlement happens within the early
/// window. Settlement outside the window earns nothing.
pub fn early_payment_discount(
    term: &TradingTerm,
    invoice_value: Decimal,
    days_to_payment: u32,
) -> Decimal {
    let Some(payment) = &term.payment_terms else {
        return Decimal::ZERO;
    };
    let (Some(window), Some(discount_pct)) =
        (payment.early_payment_days, payment.early_payment_discount_pct)
    else {
        return Decimal::ZERO;
    };

    if days_to_payment <= window {
        invoice_value * discount_pct / Decimal::from(100)
    } else {
        Decimal::ZERO
    }
}

/// Fold settled-order actuals into a term's cumulative performance, returning
/// the new record. ROI is left unset until cost is non-zero.
pub fn apply_actuals(
    performance: &TermPerformance,
    volume: Decimal,
    revenue: Decimal,
    cost: Decimal,
    as_of: DateTime<Utc>,
) -> TermPerformance {
    let actual_volume = performance.actual_volume + volume;
    let actual_revenue = performance.actual_revenue + revenue;
    let actual_cost = performance.actual_cost + cost;

    let actual_roi_pct = if actual_cost > Decimal::ZERO {
        Some((actual_revenue - actual_cost) / actual_cost * Decimal::from(100))
    } else {
        None
    };

    TermPerformance {
        actual_volume,
        actual_revenue,
        actual_cost,
        actual_roi_pct,
        last_calculated_at: Some(as_of),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::domain::product::ProductId;
    use crate::domain::terms::{
        Applicability, ApprovalStatus, CustomerId, CustomerRule, CustomerTier, CustomerType,
        DiscountType, PaymentTerms, ProductRule, TermId, TermPerformance, TermType, TradingTerm,
        ValidityPeriod, VolumeTier,
    };

    use super::*;

    fn tier(min: i64, max: Option<i64>, discount_type: DiscountType, value: i64) -> VolumeTier {
        VolumeTier {
            min_volume: Decimal::from(min),
            max_volume: max.map(Decimal::from),
            discount_type,
            discount_value: Decimal::from(value),
            rebate_percentage: None,
        }
    }

    fn ladder() -> Vec<VolumeTier> {
        vec![
            tier(0, Some(999), DiscountType::Percentage, 0),
            tier(1_000, Some(4_999), DiscountType::Percentage, 5),
            tier(5_000, None, DiscountType::Percentage, 10),
        ]
    }

    fn term_with(applicability: Applicability, tiers: Vec<VolumeTier>) -> TradingTerm {
        let now = Utc::now();
        TradingTerm {
            id: TermId("TT-VOL".to_string()),
            name: "Volume ladder".to_string(),
            code: "VOL".to_string(),
            term_type: TermType::VolumeDiscount,
            applicability,
            volume_tiers: tiers,
            payment_terms: None,
            approval_status: ApprovalStatus::Approved,
            validity: ValidityPeriod {
                start_date: now - Duration::days(1),
                end_date: now + Duration::days(1),
            },
            is_active: true,
        }
    }

    fn order(volume: i64, value: i64) -> OrderContext {
        OrderContext {
            customer: CustomerId(Uuid::nil()),
            customer_tier: CustomerTier::Gold,
            customer_type: CustomerType::Chain,
            product: ProductId("sku-choc-200g".to_string()),
            order_value: Decimal::from(value),
            volume: Decimal::from(volume),
        }
    }

    #[test]
    fn boundary_volume_resolves_to_second_tier() {
        let tiers = ladder();
        let resolved = resolve_tier(&tiers, Decimal::from(1_000)).expect("tier");
        assert_eq!(resolved.discount_value, Decimal::from(5));

        let quote = calculate_discount(&tiers, Decimal::from(1_000), Decimal::from(10_000));
        assert_eq!(quote.discount, Decimal::from(500));
    }

    #[test]
    fn overlapping_tiers_resolve_first_in_declaration_order() {
        let tiers = vec![
            tier(0, Some(2_000), DiscountType::Percentage, 3),
            tier(1_000, Some(4_999), DiscountType::Percentage, 5),
        ];

        let resolved = resolve_tier(&tiers, Decimal::from(1_500)).expect("tier");
        assert_eq!(resolved.discount_value, Decimal::from(3));
    }

    #[test]
    fn no_matching_tier_yields_zero_quote() {
        let tiers = vec![tier(1_000, Some(4_999), DiscountType::Percentage, 5)];

        let quote = calculate_discount(&tiers, Decimal::from(10), Decimal::from(500));
        assert_eq!(quote, TierQuote::zero());
    }

    #[test]
    fn empty_ladder_yields_zero_quote() {
        let quote = calculate_discount(&[], Decimal::from(10), Decimal::from(500));
        assert_eq!(quote, TierQuote::zero());
    }

    #[test]
    fn unit_discount_scales_with_volume() {
        let tiers = vec![tier(0, None, DiscountType::UnitDiscount, 2)];

        for volume in [0i64, 1, 7, 2_500] {
            let quote = calculate_discount(&tiers, Decimal::from(volume), Decimal::from(9_999));
            assert_eq!(quote.discount, Decimal::from(volume * 2));
        }
    }

    #[test]
    fn fixed_amount_ignores_volume_and_value() {
        let tiers = vec![tier(0, None, DiscountType::FixedAmount, 250)];

        let quote = calculate_discount(&tiers, Decimal::from(42), Decimal::from(1));
        assert_eq!(quote.discount, Decimal::from(250));
    }

    #[test]
    fn rebate_defaults_to_zero_when_absent() {
        let mut with_rebate = tier(0, None, DiscountType::Percentage, 5);
        with_rebate.rebate_percentage = Some(Decimal::from(2));

        let quote =
            calculate_discount(&[with_rebate], Decimal::from(100), Decimal::from(10_000));
        assert_eq!(quote.rebate, Decimal::from(200));

        let without = calculate_discount(
            &[tier(0, None, DiscountType::Percentage, 5)],
            Decimal::from(100),
            Decimal::from(10_000),
        );
        assert_eq!(without.rebate, Decimal::ZERO);
    }

    #[test]
    fn applicability_requires_all_four_gates() {
        let applicability = Applicability {
            customers: vec![CustomerRule {
                customer: None,
                customer_tier: Some(CustomerTier::All),
                customer_type: None,
            }],
            products: vec![ProductRule {
                product: Some(ProductId("sku-choc-200g".to_string())),
                product_category: None,
                brand: None,
            }],
            minimum_order_value: Some(Decimal::from(1_000)),
            minimum_volume: Some(Decimal::from(100)),
            ..Applicability::default()
        };
        let term = term_with(applicability, ladder());

        assert!(applies_to(&term, &order(100, 1_000)));

        // order value below minimum
        assert!(!applies_to(&term, &order(100, 999)));

        // volume below minimum
        assert!(!applies_to(&term, &order(99, 1_000)));

        // wrong product
        let mut other_product = order(100, 1_000);
        other_product.product = ProductId("sku-biscuit-500g".to_string());
        assert!(!applies_to(&term, &other_product));
    }

    #[test]
    fn empty_product_list_applies_to_any_product() {
        let applicability = Applicability {
            customers: vec![CustomerRule {
                customer: None,
                customer_tier: Some(CustomerTier::All),
                customer_type: None,
            }],
            ..Applicability::default()
        };
        let term = term_with(applicability, ladder());

        assert!(applies_to(&term, &order(10, 10)));
    }

    #[test]
    fn no_customer_rule_matches_means_inapplicable() {
        let applicability = Applicability {
            customers: vec![CustomerRule {
                customer: Some(CustomerId(Uuid::from_u128(7))),
                customer_tier: None,
                customer_type: None,
            }],
            ..Applicability::default()
        };
        let term = term_with(applicability, ladder());

        assert!(!applies_to(&term, &order(10, 10)));
    }

    #[test]
    fn pricer_gates_quote_on_applicability() {
        let applicability = Applicability {
            customers: vec![CustomerRule {
                customer: None,
                customer_tier: Some(CustomerTier::All),
                customer_type: None,
            }],
            minimum_volume: Some(Decimal::from(5_000)),
            ..Applicability::default()
        };
        let term = term_with(applicability, ladder());
        let pricer = DeterministicTermPricer;

        assert_eq!(pricer.quote(&term, &order(1_000, 10_000)), TierQuote::zero());

        let quote = pricer.quote(&term, &order(5_000, 10_000));
        assert_eq!(quote.discount, Decimal::from(1_000));
    }

    #[test]
    fn early_payment_discount_applies_only_inside_window() {
        let mut term = term_with(Applicability::default(), Vec::new());
        term.payment_terms = Some(PaymentTerms {
            standard_days: 30,
            early_payment_days: Some(10),
            early_payment_discount_pct: Some(Decimal::from(2)),
            late_payment_penalty_pct: None,
        });

        assert_eq!(
            early_payment_discount(&term, Decimal::from(10_000), 10),
            Decimal::from(200)
        );
        assert_eq!(early_payment_discount(&term, Decimal::from(10_000), 11), Decimal::ZERO);
    }

    #[test]
    fn actuals_accumulate_and_roi_guards_zero_cost() {
        let start = TermPerformance::default();
        let now = Utc::now();

        let free = apply_actuals(&start, Decimal::from(10), Decimal::from(500), Decimal::ZERO, now);
        assert_eq!(free.actual_roi_pct, None);

        let paid = apply_actuals(&free, Decimal::from(90), Decimal::from(1_500), Decimal::from(1_000), now);
        assert_eq!(paid.actual_volume, Decimal::from(100));
        assert_eq!(paid.actual_revenue, Decimal::from(2_000));
        // (2000 - 1000) / 1000 * 100
        assert_eq!(paid.actual_roi_pct, Some(Decimal::from(100)));
    }
}
