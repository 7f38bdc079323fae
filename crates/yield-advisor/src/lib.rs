//! # yield-advisor
//!
//! DeFi yield strategy advisor. Given a wallet's portfolio snapshot it picks
//! strategies from a fixed catalog, scores risk and confidence, watches open
//! positions and explains strategies in plain language through a hosted LLM,
//! with a template explanation when none is reachable.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌─────────────────────┐
//! │  Portfolio   │───▶│   Filter     │───▶│  StrategyBuilder    │
//! │  snapshot    │    │ (risk, APY,  │    │ (steps, tokens,     │
//! └──────────────┘    │  gas budget) │    │  exits, confidence) │
//!        │            └──────────────┘    └─────────────────────┘
//!        │                                          │
//!        ▼                                          ▼
//! ┌──────────────┐                        ┌─────────────────────┐
//! │  Scoring &   │                        │ top 5 by APY        │
//! │ opportunities│                        │ ◀──▶ StrategyCache  │
//! └──────────────┘                        │ (Redis | in-memory) │
//!                                         └─────────────────────┘
//!                                                   │
//!                                                   ▼
//!                                  Anthropic ─▶ OpenAI ─▶ template
//! ```
//!
//! All money and APY values are `rust_decimal::Decimal`; APYs are percents.

pub mod advisor;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod explain;
pub mod knowledge;
pub mod model;
pub mod monitor;
pub mod opportunity;
pub mod scoring;
pub mod strategy;

pub use advisor::{YieldAdvisor, YieldAdvisorBuilder};
pub use cache::{MemoryCache, RedisCache, StrategyCache};
pub use config::{AdvisorConfig, CacheConfig};
pub use error::{AdvisorError, Result};
pub use explain::{Explanation, ExplanationGenerator, ExplanationState};
pub use knowledge::KnowledgeBase;
pub use model::{
    Alert, AlertKind, Opportunity, Portfolio, PortfolioAnalysis, Position, RiskLevel, RiskMetrics,
    Severity, StrategyType, YieldStrategy,
};

/// System prompt for strategy explanations
pub const YIELD_ADVISOR_PROMPT: &str = r#"You are a DeFi yield strategist who explains strategies to everyday users.

## How to Explain

1. **Mechanics first** - Say where the yield comes from before quoting numbers
2. **Risks with mitigations** - Every risk you name gets a concrete way to limit it
3. **Exit plan** - Describe how to unwind, including any lockups or unbonding periods
4. **Fit** - Relate the strategy to the user's portfolio size and risk tolerance

## Ground Rules

- APYs are estimates, not promises. Say so when quoting them.
- Leverage and liquidation risk must be called out explicitly.
- Gas costs matter for small portfolios; mention breakeven when relevant.
- Keep it concise: short sections, plain language, no hype."#;
