//! Domain Models
//!
//! Core data types for yield strategy recommendations.
//! Uses `rust_decimal` for all monetary values and APYs - never use f64 for money!

use std::collections::HashSet;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Health factor assumed for positions that report none (no leverage)
pub const NO_LEVERAGE_HEALTH_FACTOR: i64 = 999;

/// Risk tier of a strategy or a user's tolerance, ordered low to extreme
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
    Extreme,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Extreme => "extreme",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of yield strategy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyType {
    Lending,
    LiquidityProvision,
    Staking,
    Looping,
    BasisTrade,
    DeltaNeutral,
    Tranching,
    PrincipalTokenYieldToken,
}

impl StrategyType {
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyType::Lending => "lending",
            StrategyType::LiquidityProvision => "liquidity_provision",
            StrategyType::Staking => "staking",
            StrategyType::Looping => "looping",
            StrategyType::BasisTrade => "basis_trade",
            StrategyType::DeltaNeutral => "delta_neutral",
            StrategyType::Tranching => "tranching",
            StrategyType::PrincipalTokenYieldToken => "principal_token_yield_token",
        }
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An open position reported by the portfolio indexer.
///
/// Every field is optional. Accessors return documented defaults for missing
/// values: zero for amounts and rates, `NO_LEVERAGE_HEALTH_FACTOR` for the
/// health factor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    /// Position category (e.g. "lp", "lending", "staking")
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub position_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_usd: Option<Decimal>,

    /// APY at entry, percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apy: Option<Decimal>,

    /// APY observed now, percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_apy: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub il_percentage: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_factor: Option<Decimal>,
}

impl Position {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    pub fn with_type(mut self, position_type: impl Into<String>) -> Self {
        self.position_type = Some(position_type.into());
        self
    }

    pub fn with_value(mut self, value_usd: Decimal) -> Self {
        self.value_usd = Some(value_usd);
        self
    }

    pub fn with_apy(mut self, apy: Decimal) -> Self {
        self.apy = Some(apy);
        self
    }

    pub fn with_current_apy(mut self, current_apy: Decimal) -> Self {
        self.current_apy = Some(current_apy);
        self
    }

    pub fn with_il(mut self, il_percentage: Decimal) -> Self {
        self.il_percentage = Some(il_percentage);
        self
    }

    pub fn with_health_factor(mut self, health_factor: Decimal) -> Self {
        self.health_factor = Some(health_factor);
        self
    }

    pub fn value_usd(&self) -> Decimal {
        self.value_usd.unwrap_or(Decimal::ZERO)
    }

    pub fn apy(&self) -> Decimal {
        self.apy.unwrap_or(Decimal::ZERO)
    }

    pub fn current_apy(&self) -> Decimal {
        self.current_apy.unwrap_or(Decimal::ZERO)
    }

    pub fn il_percentage(&self) -> Decimal {
        self.il_percentage.unwrap_or(Decimal::ZERO)
    }

    pub fn health_factor(&self) -> Decimal {
        self.health_factor.unwrap_or_else(|| Decimal::from(NO_LEVERAGE_HEALTH_FACTOR))
    }
}

/// A user's on-chain portfolio snapshot
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Portfolio {
    /// Wallet address
    pub address: String,

    /// Total value including idle (undeployed) capital
    pub total_value_usd: Decimal,

    #[serde(default)]
    pub positions: Vec<Position>,

    /// Chains the wallet holds assets on
    #[serde(default)]
    pub chains: Vec<String>,

    #[serde(default)]
    pub risk_tolerance: RiskLevel,

    #[serde(default)]
    pub preferred_protocols: Vec<String>,
}

impl Portfolio {
    pub fn new(address: impl Into<String>, total_value_usd: Decimal, risk_tolerance: RiskLevel) -> Self {
        Self {
            address: address.into(),
            total_value_usd,
            positions: Vec::new(),
            chains: Vec::new(),
            risk_tolerance,
            preferred_protocols: Vec::new(),
        }
    }

    pub fn with_chains<I, S>(mut self, chains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chains = chains.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.positions.push(position);
        self
    }

    /// Sum of deployed position values, saturating at the Decimal bounds
    pub fn positions_value(&self) -> Decimal {
        self.positions
            .iter()
            .map(Position::value_usd)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Capital not deployed in any position
    pub fn idle_capital(&self) -> Decimal {
        self.total_value_usd
            .saturating_sub(self.positions_value())
            .max(Decimal::ZERO)
    }

    /// Distinct protocols across positions (a missing protocol counts once)
    pub fn distinct_protocols(&self) -> usize {
        self.positions
            .iter()
            .map(|p| p.protocol.as_deref())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Distinct position types (a missing type counts once)
    pub fn distinct_position_types(&self) -> usize {
        self.positions
            .iter()
            .map(|p| p.position_type.as_deref())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// A concrete, executable strategy recommendation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YieldStrategy {
    /// Opaque 8-hex-char identifier
    pub id: String,

    pub name: String,

    #[serde(rename = "type")]
    pub strategy_type: StrategyType,

    /// Primary protocol
    pub protocol: String,

    pub chain: String,

    /// Expected APY, percent
    pub expected_apy: Decimal,

    pub risk_level: RiskLevel,

    pub minimum_investment: Decimal,

    pub gas_cost_usd: Decimal,

    /// Impermanent loss exposure, percent
    pub il_exposure: Decimal,

    pub steps: Vec<String>,

    pub required_tokens: Vec<String>,

    pub exit_options: Vec<String>,

    /// 0-100
    pub confidence_score: Decimal,
}

/// Risk metrics for a strategy at a given investment size
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Value at risk (95% confidence), USD
    pub var_95: Decimal,

    /// Fraction of capital, 0-1
    pub max_drawdown: Decimal,

    pub sharpe_ratio: Decimal,

    /// Fraction, 0-1
    pub liquidation_risk: Decimal,

    /// 0-100, lower is safer
    pub protocol_risk_score: Decimal,

    pub time_to_breakeven_days: u32,
}

/// Alert category raised by the position monitor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    HighIl,
    LowApy,
    LiquidationRisk,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,

    pub severity: Severity,

    pub position_id: Option<String>,

    pub message: String,

    /// Suggested action
    pub action: String,
}

/// An optimization opportunity found in a portfolio
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Opportunity {
    /// Move a low-yield position to a better protocol
    Upgrade {
        from_protocol: Option<String>,
        to_protocol: String,
        expected_apy: Decimal,
        improvement: Decimal,
        description: String,
    },
    /// Put idle capital to work
    Deploy {
        amount: Decimal,
        suggested_protocol: String,
        expected_apy: Decimal,
        description: String,
    },
}

impl Opportunity {
    pub fn expected_apy(&self) -> Decimal {
        match self {
            Opportunity::Upgrade { expected_apy, .. } | Opportunity::Deploy { expected_apy, .. } => {
                *expected_apy
            }
        }
    }
}

/// Result of a portfolio analysis
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    pub total_value: Decimal,

    /// 0-100
    pub risk_score: Decimal,

    /// 0-100
    pub diversification_score: Decimal,

    /// Value-weighted APY of current positions, percent
    pub current_apy: Decimal,

    /// Best opportunity APY minus current APY
    pub optimization_potential: Decimal,

    pub recommendations: Vec<Opportunity>,
}

/// Format a USD amount rounded to whole dollars with thousands separators
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp(0);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::High < RiskLevel::Extreme);
        assert_eq!(RiskLevel::default(), RiskLevel::Medium);
    }

    #[test]
    fn test_position_defaults() {
        let pos: Position = serde_json::from_str(r#"{"id": "p1"}"#).unwrap();
        assert_eq!(pos.value_usd(), Decimal::ZERO);
        assert_eq!(pos.apy(), Decimal::ZERO);
        assert_eq!(pos.current_apy(), Decimal::ZERO);
        assert_eq!(pos.il_percentage(), Decimal::ZERO);
        assert_eq!(pos.health_factor(), dec!(999));
    }

    #[test]
    fn test_position_wire_names() {
        let raw = r#"{"id": "p2", "protocol": "Aave V3", "type": "lending", "value_usd": 2500.5, "apy": "3.2"}"#;
        let pos: Position = serde_json::from_str(raw).unwrap();
        assert_eq!(pos.position_type.as_deref(), Some("lending"));
        assert_eq!(pos.value_usd(), dec!(2500.5));
        assert_eq!(pos.apy(), dec!(3.2));
    }

    #[test]
    fn test_portfolio_idle_capital() {
        let portfolio = Portfolio::new("0xabc", dec!(10000), RiskLevel::Medium)
            .with_position(Position::new("a").with_value(dec!(4000)))
            .with_position(Position::new("b"));

        assert_eq!(portfolio.positions_value(), dec!(4000));
        assert_eq!(portfolio.idle_capital(), dec!(6000));
    }

    #[test]
    fn test_distinct_counts() {
        let portfolio = Portfolio::new("0xabc", dec!(1), RiskLevel::Low)
            .with_position(Position::new("a").with_protocol("Curve").with_type("lp"))
            .with_position(Position::new("b").with_protocol("Curve").with_type("lp"))
            .with_position(Position::new("c").with_protocol("Aave V3"));

        assert_eq!(portfolio.distinct_protocols(), 2);
        // "lp" and missing
        assert_eq!(portfolio.distinct_position_types(), 2);
    }

    #[test]
    fn test_alert_serialization() {
        let alert = Alert {
            kind: AlertKind::LiquidationRisk,
            severity: Severity::Critical,
            position_id: Some("p1".into()),
            message: "m".into(),
            action: "a".into(),
        };
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["type"], "LIQUIDATION_RISK");
        assert_eq!(json["severity"], "critical");
    }

    #[test]
    fn test_opportunity_tagging() {
        let opp = Opportunity::Deploy {
            amount: dec!(500),
            suggested_protocol: "Liquity V2".into(),
            expected_apy: dec!(21),
            description: "d".into(),
        };
        let json = serde_json::to_value(&opp).unwrap();
        assert_eq!(json["action"], "deploy");
        assert_eq!(opp.expected_apy(), dec!(21));
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(dec!(0)), "0");
        assert_eq!(format_usd(dec!(999.4)), "999");
        assert_eq!(format_usd(dec!(5000)), "5,000");
        assert_eq!(format_usd(dec!(1234567.89)), "1,234,568");
        assert_eq!(format_usd(dec!(-12500)), "-12,500");
    }
}
