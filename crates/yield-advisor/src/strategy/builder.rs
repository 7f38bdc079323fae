//! Strategy Builder
//!
//! Turns a catalog template into a concrete `YieldStrategy` for a portfolio.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use crate::catalog::{self, StrategyTemplate};
use crate::model::{Portfolio, YieldStrategy};
use crate::scoring;

/// Minimum investment attached to every built strategy, USD
pub const DEFAULT_MINIMUM_INVESTMENT_USD: i64 = 1000;

/// Gas estimate attached to every built strategy, USD
pub const DEFAULT_GAS_ESTIMATE_USD: i64 = 50;

/// Length of a strategy identifier in hex characters
const ID_LEN: usize = 8;

/// Assembles strategies from templates.
///
/// Identifiers hash the template key, the wallet address and the start of the
/// current identifier window, so the same template built for the same wallet
/// keeps its id until the window rolls over.
#[derive(Clone, Debug)]
pub struct StrategyBuilder {
    id_window: Duration,
}

impl StrategyBuilder {
    pub fn new(id_window: Duration) -> Self {
        Self { id_window }
    }

    /// Build a strategy stamped with the current time
    pub fn build(&self, template: &StrategyTemplate, portfolio: &Portfolio) -> YieldStrategy {
        self.build_at(template, portfolio, Utc::now())
    }

    /// Build a strategy as of `now`
    pub fn build_at(
        &self,
        template: &StrategyTemplate,
        portfolio: &Portfolio,
        now: DateTime<Utc>,
    ) -> YieldStrategy {
        let protocol = template.primary_protocol();

        YieldStrategy {
            id: strategy_id(template.key, &portfolio.address, self.window_start(now)),
            name: template.name.to_string(),
            strategy_type: template.strategy_type,
            protocol: protocol.to_string(),
            chain: catalog::chain_for_protocol(protocol).to_string(),
            expected_apy: template.expected_apy,
            risk_level: template.risk,
            minimum_investment: Decimal::from(DEFAULT_MINIMUM_INVESTMENT_USD),
            gas_cost_usd: Decimal::from(DEFAULT_GAS_ESTIMATE_USD),
            il_exposure: template.il_exposure,
            steps: to_owned(catalog::steps_for(template.key)),
            required_tokens: to_owned(catalog::tokens_for(template.key)),
            exit_options: to_owned(catalog::exits_for(template.key)),
            confidence_score: scoring::strategy_confidence(template, portfolio),
        }
    }

    /// UNIX timestamp at which the window containing `now` began
    fn window_start(&self, now: DateTime<Utc>) -> i64 {
        let window = i64::try_from(self.id_window.as_secs()).unwrap_or(i64::MAX).max(1);
        let ts = now.timestamp();
        ts - ts.rem_euclid(window)
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// First 8 hex chars of SHA-256 over `"{key}:{address}:{window_start}"`
pub fn strategy_id(key: &str, address: &str, window_start: i64) -> String {
    let digest = Sha256::digest(format!("{key}:{address}:{window_start}").as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(ID_LEN);
    id
}
