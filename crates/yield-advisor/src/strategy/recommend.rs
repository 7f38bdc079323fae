//! Recommendation Selection
//!
//! Filters the catalog, builds every admitted template and keeps the
//! highest-yielding few. Caching lives one level up in the advisor.

use rust_decimal::Decimal;

use crate::catalog::StrategyTemplate;
use crate::model::{Portfolio, YieldStrategy};

use super::builder::StrategyBuilder;
use super::filter::matches_criteria;

/// Upper bound on strategies returned per request
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Admitted strategies, highest APY first, at most `MAX_RECOMMENDATIONS`.
///
/// The sort is stable, so equal APYs keep catalog order.
pub fn select_strategies(
    templates: &[StrategyTemplate],
    builder: &StrategyBuilder,
    portfolio: &Portfolio,
    target_apy: Option<Decimal>,
    max_gas_usd: Decimal,
) -> Vec<YieldStrategy> {
    let mut strategies: Vec<YieldStrategy> = templates
        .iter()
        .filter(|t| matches_criteria(t, portfolio, target_apy, max_gas_usd))
        .map(|t| builder.build(t, portfolio))
        .collect();

    strategies.sort_by(|a, b| b.expected_apy.cmp(&a.expected_apy));
    strategies.truncate(MAX_RECOMMENDATIONS);
    strategies
}
