//! Scoring Functions
//!
//! Pure heuristics over portfolios, templates and strategies. Every score
//! documented as 0-100 is clamped to that range.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::catalog::{self, StrategyTemplate};
use crate::model::{Portfolio, Position, RiskLevel, RiskMetrics, StrategyType, YieldStrategy};

/// Annual risk-free rate used for the Sharpe-like ratio, percent
pub const RISK_FREE_RATE_PERCENT: i64 = 4;

/// Breakeven sentinel when a strategy never pays back its gas
pub const BREAKEVEN_NEVER_DAYS: u32 = 999;

fn clamp_score(score: Decimal) -> Decimal {
    score.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

/// Portfolio risk score (0-100, higher is riskier)
pub fn portfolio_risk_score(portfolio: &Portfolio) -> Decimal {
    let mut score = dec!(50);

    // Position concentration; an empty portfolio has nothing concentrated
    match portfolio.positions.len() {
        0 => {}
        n if n < 3 => score += dec!(20),
        n if n > 10 => score -= dec!(10),
        _ => {}
    }

    // Chain concentration
    match portfolio.chains.len() {
        1 => score += dec!(15),
        n if n > 3 => score -= dec!(15),
        _ => {}
    }

    match portfolio.risk_tolerance {
        RiskLevel::High => score += dec!(10),
        RiskLevel::Low => score -= dec!(20),
        _ => {}
    }

    clamp_score(score)
}

/// Diversification score (0-100) from protocol, chain and position-type spread
pub fn diversification_score(portfolio: &Portfolio) -> Decimal {
    if portfolio.positions.is_empty() {
        return Decimal::ZERO;
    }

    let protocol_score = (portfolio.distinct_protocols() * 20).min(60);
    let chain_score = (portfolio.chains.len() * 10).min(30);
    let type_score = (portfolio.distinct_position_types() * 5).min(10);

    clamp_score(Decimal::from(protocol_score + chain_score + type_score))
}

/// Value-weighted average APY of positions, percent.
///
/// Zero when the positions hold no value or the weighting overflows.
pub fn weighted_apy(positions: &[Position]) -> Decimal {
    let totals = positions.iter().try_fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(value, weighted), p| {
            let value = value.checked_add(p.value_usd())?;
            let weighted = weighted.checked_add(p.apy().checked_mul(p.value_usd())?)?;
            Some((value, weighted))
        },
    );

    match totals {
        Some((value, weighted)) if !value.is_zero() => {
            weighted.checked_div(value).unwrap_or(Decimal::ZERO)
        }
        _ => Decimal::ZERO,
    }
}

/// Protocol risk score (0-100, lower is safer)
pub fn protocol_risk_score(protocol: &str) -> Decimal {
    catalog::protocol_risk(protocol).1
}

/// Confidence (0-100) that a template suits a portfolio
pub fn strategy_confidence(template: &StrategyTemplate, portfolio: &Portfolio) -> Decimal {
    let mut confidence = dec!(70);

    if template.risk == portfolio.risk_tolerance {
        confidence += dec!(10);
    }

    if portfolio.total_value_usd > dec!(10000) {
        confidence += dec!(5);
    } else if portfolio.total_value_usd < dec!(1000) {
        confidence -= dec!(10);
    }

    if catalog::is_reputable(template.primary_protocol()) {
        confidence += dec!(15);
    }

    clamp_score(confidence)
}

/// Historical-style loss profile per strategy type: (VaR fraction, max drawdown, liquidation risk)
fn loss_profile(strategy_type: StrategyType) -> (Decimal, Decimal, Decimal) {
    match strategy_type {
        // IL drives LP losses
        StrategyType::LiquidityProvision => (dec!(0.15), dec!(0.25), Decimal::ZERO),
        StrategyType::Lending => (dec!(0.05), dec!(0.10), Decimal::ZERO),
        StrategyType::Looping => (dec!(0.20), dec!(0.35), dec!(0.15)),
        _ => (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
    }
}

/// Risk metrics for investing `investment_amount` USD into a strategy
pub fn risk_metrics(strategy: &YieldStrategy, investment_amount: Decimal) -> RiskMetrics {
    let (var_fraction, max_drawdown, liquidation_risk) = loss_profile(strategy.strategy_type);

    let volatility = max_drawdown * Decimal::ONE_HUNDRED;
    let sharpe_ratio = if volatility.is_zero() {
        Decimal::ZERO
    } else {
        (strategy.expected_apy - Decimal::from(RISK_FREE_RATE_PERCENT)) / volatility
    };

    RiskMetrics {
        var_95: investment_amount.saturating_mul(var_fraction),
        max_drawdown,
        sharpe_ratio,
        liquidation_risk,
        protocol_risk_score: protocol_risk_score(&strategy.protocol),
        time_to_breakeven_days: breakeven_days(
            strategy.gas_cost_usd,
            investment_amount,
            strategy.expected_apy,
        ),
    }
}

/// Whole days of yield needed to cover gas; `BREAKEVEN_NEVER_DAYS` when yield is not positive
pub fn breakeven_days(gas_cost_usd: Decimal, investment_amount: Decimal, expected_apy: Decimal) -> u32 {
    let daily_yield = investment_amount
        .checked_mul(expected_apy)
        .map(|annual| annual / Decimal::ONE_HUNDRED / dec!(365));

    match daily_yield {
        Some(daily) if daily > Decimal::ZERO => gas_cost_usd
            .checked_div(daily)
            .and_then(|days| days.trunc().to_u32())
            .unwrap_or(BREAKEVEN_NEVER_DAYS),
        _ => BREAKEVEN_NEVER_DAYS,
    }
}
