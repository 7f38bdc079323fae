//! Opportunity Finder
//!
//! Scans a portfolio for low-yield positions and idle capital and suggests
//! where to move them, benchmarked against fixed catalog APYs.

use rust_decimal::Decimal;

use crate::model::{format_usd, Opportunity, Portfolio};

/// Positions yielding less than this are upgrade candidates, percent
pub const LOW_YIELD_THRESHOLD_PERCENT: i64 = 10;

const UPGRADE_PROTOCOL: &str = "Pendle";
const UPGRADE_APY_PERCENT: i64 = 15;

const DEPLOY_PROTOCOL: &str = "Liquity V2";
const DEPLOY_APY_PERCENT: i64 = 21;

/// All opportunities in a portfolio: one upgrade per low-yield position in
/// position order, then at most one deploy for idle capital
pub fn find_opportunities(portfolio: &Portfolio) -> Vec<Opportunity> {
    let threshold = Decimal::from(LOW_YIELD_THRESHOLD_PERCENT);
    let upgrade_apy = Decimal::from(UPGRADE_APY_PERCENT);

    let mut opportunities: Vec<Opportunity> = portfolio
        .positions
        .iter()
        .filter(|p| p.apy() < threshold)
        .map(|p| Opportunity::Upgrade {
            from_protocol: p.protocol.clone(),
            to_protocol: UPGRADE_PROTOCOL.to_string(),
            expected_apy: upgrade_apy,
            improvement: upgrade_apy.saturating_sub(p.apy()),
            description: format!(
                "Migrate from {} to higher yield",
                p.protocol.as_deref().unwrap_or("unknown")
            ),
        })
        .collect();

    let idle = portfolio.idle_capital();
    if idle > Decimal::ZERO {
        opportunities.push(Opportunity::Deploy {
            amount: idle,
            suggested_protocol: DEPLOY_PROTOCOL.to_string(),
            expected_apy: Decimal::from(DEPLOY_APY_PERCENT),
            description: format!("Deploy ${} idle capital for yield", format_usd(idle)),
        });
    }

    opportunities
}
