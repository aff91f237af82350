use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use tradespend_core::config::EngineConfig;
use tradespend_core::domain::terms::{TermId, TradingTerm};
use tradespend_core::pricing::{applies_to, DeterministicTermPricer, OrderContext, TermPricer};

use crate::commands::{load_snapshot, CommandResult};

#[derive(Debug, Serialize)]
struct TermQuoteLine {
    term_id: TermId,
    term_code: String,
    applies: bool,
    discount: String,
    rebate: String,
}

#[derive(Debug, Serialize)]
struct PriceReport {
    terms_evaluated: usize,
    terms_applied: usize,
    lines: Vec<TermQuoteLine>,
}

pub fn run(_config: &EngineConfig, terms_path: &Path, order_path: &Path) -> CommandResult {
    let terms: Vec<TradingTerm> = match load_snapshot("price", terms_path) {
        Ok(terms) => terms,
        Err(failure) => return failure,
    };
    let order: OrderContext = match load_snapshot("price", order_path) {
        Ok(order) => order,
        Err(failure) => return failure,
    };

    let now = Utc::now();
    let pricer = DeterministicTermPricer;

    let mut lines = Vec::with_capacity(terms.len());
    for term in terms.iter().filter(|term| term.is_active_at(now)) {
        let applies = applies_to(term, &order);
        let quote = pricer.quote(term, &order);
        lines.push(TermQuoteLine {
            term_id: term.id.clone(),
            term_code: term.code.clone(),
            applies,
            discount: quote.discount.to_string(),
            rebate: quote.rebate.to_string(),
        });
    }

    let terms_applied = lines.iter().filter(|line| line.applies).count();
    tracing::info!(
        terms_evaluated = lines.len(),
        terms_applied,
        "priced order against trading terms"
    );

    let report =
        PriceReport { terms_evaluated: lines.len(), terms_applied, lines };
    CommandResult::success("price", "order priced against active trading terms", report)
}
