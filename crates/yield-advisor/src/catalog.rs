//! Strategy Catalog
//!
//! Static strategy templates and the per-strategy lookup tables the builder
//! draws from: execution steps, required tokens, exit actions, protocol
//! chains and protocol risk buckets. Nothing here is computed at runtime.

use std::sync::LazyLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::model::{RiskLevel, StrategyType};

/// Chain assumed for protocols missing from the chain table
pub const DEFAULT_CHAIN: &str = "Ethereum";

/// Risk score for protocols in neither bucket
pub const UNKNOWN_PROTOCOL_RISK: i64 = 50;

/// A strategy template from the catalog
#[derive(Clone, Debug, PartialEq)]
pub struct StrategyTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,

    /// Candidate protocols; the first is the one recommended
    pub protocols: &'static [&'static str],

    /// Base expected APY, percent
    pub expected_apy: Decimal,

    pub risk: RiskLevel,

    /// Impermanent loss exposure, percent
    pub il_exposure: Decimal,

    pub strategy_type: StrategyType,
}

impl StrategyTemplate {
    /// The protocol a built strategy is placed on
    pub fn primary_protocol(&self) -> &'static str {
        self.protocols.first().copied().unwrap_or("Unknown")
    }
}

static TEMPLATES: LazyLock<Vec<StrategyTemplate>> = LazyLock::new(|| {
    vec![
        StrategyTemplate {
            key: "eth_basis_trade",
            name: "ETH Perpetual Basis Trade",
            description: "Long spot ETH, short perp futures for market-neutral yield",
            protocols: &["GMX", "Vertex", "Drift"],
            expected_apy: dec!(15.0),
            risk: RiskLevel::Medium,
            il_exposure: dec!(0.0),
            strategy_type: StrategyType::BasisTrade,
        },
        StrategyTemplate {
            key: "bold_looping",
            name: "BOLD Recursive Lending",
            description: "Deposit wstETH → Borrow BOLD at 0.5% → Loop for 20%+ APY",
            protocols: &["Liquity V2", "Fluid"],
            expected_apy: dec!(21.0),
            risk: RiskLevel::Medium,
            il_exposure: dec!(0.0),
            strategy_type: StrategyType::Looping,
        },
        StrategyTemplate {
            key: "stable_lp_concentrated",
            name: "Concentrated Stablecoin LP",
            description: "USDC/USDT tight range on Uniswap V3",
            protocols: &["Uniswap V3", "Curve"],
            expected_apy: dec!(12.0),
            risk: RiskLevel::Low,
            il_exposure: dec!(0.5),
            strategy_type: StrategyType::LiquidityProvision,
        },
        StrategyTemplate {
            key: "pendle_pt",
            name: "Pendle Principal Tokens",
            description: "Buy PT tokens for fixed yield to maturity",
            protocols: &["Pendle"],
            expected_apy: dec!(10.0),
            risk: RiskLevel::Low,
            il_exposure: dec!(0.0),
            strategy_type: StrategyType::PrincipalTokenYieldToken,
        },
        StrategyTemplate {
            key: "lrt_maximizer",
            name: "Liquid Restaking Maximizer",
            description: "Stack ETH staking + EigenLayer + LRT rewards",
            protocols: &["EigenLayer", "Renzo", "Kelp"],
            expected_apy: dec!(18.0),
            risk: RiskLevel::Medium,
            il_exposure: dec!(0.0),
            strategy_type: StrategyType::Staking,
        },
        StrategyTemplate {
            key: "delta_neutral_farming",
            name: "Delta Neutral Yield Farming",
            description: "Farm high APY while hedging price exposure",
            protocols: &["Alpaca", "Francium", "Kamino"],
            expected_apy: dec!(25.0),
            risk: RiskLevel::High,
            il_exposure: dec!(2.0),
            strategy_type: StrategyType::DeltaNeutral,
        },
    ]
});

/// All templates, in catalog order
pub fn templates() -> &'static [StrategyTemplate] {
    &TEMPLATES
}

/// Look up a template by key
pub fn template(key: &str) -> Option<&'static StrategyTemplate> {
    TEMPLATES.iter().find(|t| t.key == key)
}

/// Ordered execution steps for a strategy
pub fn steps_for(key: &str) -> &'static [&'static str] {
    match key {
        "eth_basis_trade" => &[
            "Buy spot ETH on Uniswap or 1inch",
            "Open short position on GMX/Vertex/Drift",
            "Monitor funding rates daily",
            "Rebalance if funding goes negative",
            "Close positions when funding normalizes",
        ],
        "bold_looping" => &[
            "Deposit wstETH as collateral in Liquity V2",
            "Borrow BOLD stablecoin at 0.5% rate",
            "Convert BOLD to more wstETH via DEX",
            "Repeat loop 3-4 times for leverage",
            "Monitor health factor (keep above 1.5)",
        ],
        "stable_lp_concentrated" => &[
            "Analyze current price range on Uniswap V3",
            "Set tight range (0.995-1.005 for stables)",
            "Provide liquidity equally in both tokens",
            "Monitor position daily for range exits",
            "Rebalance if price moves outside range",
        ],
        "pendle_pt" => &[
            "Navigate to Pendle Finance",
            "Select desired maturity date",
            "Buy PT tokens at discount to face value",
            "Hold until maturity for guaranteed yield",
            "Redeem at maturity for underlying asset",
        ],
        "lrt_maximizer" => &[
            "Stake ETH for stETH/rETH",
            "Restake via EigenLayer",
            "Deposit into Renzo/Kelp for ezETH/rsETH",
            "Earn triple rewards (staking + restaking + LRT)",
            "Compound rewards monthly",
        ],
        "delta_neutral_farming" => &[
            "Deposit assets in high-APY farm",
            "Borrow against position",
            "Short equivalent amount on perp DEX",
            "Maintain delta neutrality daily",
            "Harvest and compound rewards",
        ],
        _ => &["Execute strategy as per protocol documentation"],
    }
}

/// Token symbols needed to enter a strategy
pub fn tokens_for(key: &str) -> &'static [&'static str] {
    match key {
        "eth_basis_trade" => &["ETH", "USDC"],
        "bold_looping" => &["wstETH", "BOLD"],
        "stable_lp_concentrated" => &["USDC", "USDT"],
        "pendle_pt" => &["USDC", "PT-TOKEN"],
        "lrt_maximizer" => &["ETH"],
        "delta_neutral_farming" => &["USDC", "ETH"],
        _ => &["USDC"],
    }
}

/// Ordered exit actions for a strategy
pub fn exits_for(key: &str) -> &'static [&'static str] {
    match key {
        "eth_basis_trade" => &[
            "Close short position first",
            "Sell spot ETH on DEX",
            "Emergency exit via flashloan if needed",
        ],
        "bold_looping" => &[
            "Unwind loops in reverse order",
            "Repay BOLD debt",
            "Withdraw wstETH collateral",
        ],
        "stable_lp_concentrated" => &[
            "Remove liquidity from pool",
            "Claim accumulated fees",
            "Swap back to preferred stablecoin",
        ],
        "pendle_pt" => &[
            "Wait for maturity (recommended)",
            "Sell PT on secondary market (may incur loss)",
            "Use PT as collateral elsewhere",
        ],
        "lrt_maximizer" => &[
            "Unstake from LRT protocol",
            "Wait for unbonding period",
            "Withdraw ETH or swap LRT token",
        ],
        "delta_neutral_farming" => &[
            "Close hedge positions",
            "Withdraw from farm",
            "Repay any borrowings",
        ],
        _ => &["Withdraw from protocol", "Swap to stablecoin"],
    }
}

/// Primary chain a protocol is deployed on
pub fn chain_for_protocol(protocol: &str) -> &'static str {
    match protocol {
        "GMX" | "Vertex" | "Pendle" => "Arbitrum",
        "Drift" | "Francium" | "Kamino" => "Solana",
        "Liquity V2" | "Fluid" | "Uniswap V3" | "Curve" | "EigenLayer" | "Renzo" | "Kelp" => "Ethereum",
        "Alpaca" => "BSC",
        _ => DEFAULT_CHAIN,
    }
}

/// Protocols whose primary placement earns a confidence bonus
pub fn is_reputable(protocol: &str) -> bool {
    matches!(protocol, "Aave V3" | "Uniswap V3" | "Curve")
}

/// Risk bucket for a protocol
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProtocolTier {
    BlueChip,
    MidTier,
    Unknown,
}

/// Protocol risk score (0-100, lower is safer) with its bucket
pub fn protocol_risk(protocol: &str) -> (ProtocolTier, Decimal) {
    let (tier, score) = match protocol {
        // Blue chips
        "Aave V3" | "Uniswap V3" | "MakerDAO" => (ProtocolTier::BlueChip, 10),
        "Compound V3" | "Lido" => (ProtocolTier::BlueChip, 12),
        "Curve" => (ProtocolTier::BlueChip, 15),
        // Mid tier
        "Liquity V2" | "Balancer" => (ProtocolTier::MidTier, 25),
        "Pendle" | "Sushiswap" => (ProtocolTier::MidTier, 30),
        "GMX" => (ProtocolTier::MidTier, 35),
        _ => (ProtocolTier::Unknown, UNKNOWN_PROTOCOL_RISK),
    };
    (tier, Decimal::from(score))
}
