//! Yield Strategies
//!
//! Template filtering, strategy assembly and recommendation ordering.

mod builder;
mod filter;
mod recommend;

pub use builder::{strategy_id, StrategyBuilder, DEFAULT_GAS_ESTIMATE_USD, DEFAULT_MINIMUM_INVESTMENT_USD};
pub use filter::matches_criteria;
pub use recommend::{select_strategies, MAX_RECOMMENDATIONS};
