//! Strategy Explanations
//!
//! A fixed prompt walks a provider chain, primary then secondary, and ends
//! in a deterministic markdown template when no provider answers.
//!
//! ```text
//! NotAttempted ──▶ TriedPrimary ──▶ TriedSecondary ──▶ FallbackTemplate
//!                       │                 │
//!                       └──── reply ──────┴──▶ done
//! ```
//!
//! An unconfigured provider is skipped. An error or an empty reply moves on
//! to the next state.

use std::sync::Arc;

use agent_core::{GenerationOptions, LlmProvider, Message};
use serde::Serialize;

use crate::model::{format_usd, Portfolio, YieldStrategy};

/// Where the provider chain stands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplanationState {
    NotAttempted,
    TriedPrimary,
    TriedSecondary,
    FallbackTemplate,
}

impl ExplanationState {
    pub fn next(self) -> Self {
        match self {
            ExplanationState::NotAttempted => ExplanationState::TriedPrimary,
            ExplanationState::TriedPrimary => ExplanationState::TriedSecondary,
            ExplanationState::TriedSecondary | ExplanationState::FallbackTemplate => {
                ExplanationState::FallbackTemplate
            }
        }
    }
}

/// An explanation and where it came from
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub content: String,

    /// Provider that answered; `None` for the template
    pub provider: Option<String>,

    pub model: Option<String>,

    pub fallback: bool,
}

/// Produces explanations from up to two providers
pub struct ExplanationGenerator {
    primary: Option<Arc<dyn LlmProvider>>,
    secondary: Option<Arc<dyn LlmProvider>>,
    system_prompt: Option<String>,
    options: GenerationOptions,
}

impl ExplanationGenerator {
    pub fn new(primary: Option<Arc<dyn LlmProvider>>, secondary: Option<Arc<dyn LlmProvider>>) -> Self {
        Self {
            primary,
            secondary,
            system_prompt: None,
            options: GenerationOptions {
                model: None,
                temperature: 0.7,
                max_tokens: 1000,
            },
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Names of the configured providers, in the order they are tried
    pub fn providers(&self) -> Vec<&str> {
        [&self.primary, &self.secondary]
            .into_iter()
            .flatten()
            .map(|p| p.name())
            .collect()
    }

    /// Explain a strategy to the owner of a portfolio. Never fails.
    pub async fn explain(&self, strategy: &YieldStrategy, portfolio: &Portfolio) -> Explanation {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system_prompt {
            messages.push(Message::system(system.clone()));
        }
        messages.push(Message::user(build_prompt(strategy, portfolio)));

        let mut state = ExplanationState::NotAttempted;
        loop {
            state = state.next();
            let provider = match state {
                ExplanationState::TriedPrimary => self.primary.as_ref(),
                ExplanationState::TriedSecondary => self.secondary.as_ref(),
                ExplanationState::NotAttempted | ExplanationState::FallbackTemplate => break,
            };

            let Some(provider) = provider else {
                tracing::debug!("{:?}: no provider configured, skipping", state);
                continue;
            };

            tracing::debug!("Requesting explanation from {}", provider.name());
            match provider.complete(&messages, &self.options).await {
                Ok(completion) if !completion.content.trim().is_empty() => {
                    return Explanation {
                        content: completion.content,
                        provider: Some(provider.name().to_string()),
                        model: Some(completion.model),
                        fallback: false,
                    };
                }
                Ok(_) => tracing::warn!("{} returned an empty explanation", provider.name()),
                Err(e) => tracing::warn!(
                    retryable = e.is_retryable(),
                    "{} explanation failed: {}",
                    provider.name(),
                    e
                ),
            }
        }

        Explanation {
            content: fallback_explanation(strategy, portfolio),
            provider: None,
            model: None,
            fallback: true,
        }
    }
}

/// The request sent to providers
pub fn build_prompt(strategy: &YieldStrategy, portfolio: &Portfolio) -> String {
    let steps = strategy
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {}", i + 1, step))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Explain this DeFi yield strategy for a user with a ${value} portfolio:

Strategy: {name}
Type: {kind}
Protocol: {protocol}
Chain: {chain}
Expected APY: {apy}%
Risk Level: {risk}
IL Exposure: {il}%

Steps:
{steps}

Provide a clear, concise explanation covering:
1. How the strategy works
2. Main risks and how to mitigate them
3. Exit strategy
4. Why it's suitable for this user",
        value = format_usd(portfolio.total_value_usd),
        name = strategy.name,
        kind = strategy.strategy_type,
        protocol = strategy.protocol,
        chain = strategy.chain,
        apy = strategy.expected_apy,
        risk = strategy.risk_level,
        il = strategy.il_exposure,
    )
}

/// Template explanation used when no provider answers
pub fn fallback_explanation(strategy: &YieldStrategy, portfolio: &Portfolio) -> String {
    let mut out = String::new();

    out.push_str(&format!("## {} Strategy Explanation\n\n", strategy.name));

    out.push_str("### Overview\n");
    out.push_str(&format!(
        "This is a {} strategy on {} ({}).\n\n",
        strategy.strategy_type.as_str().replace('_', " "),
        strategy.protocol,
        strategy.chain
    ));

    out.push_str("### Expected Returns\n");
    out.push_str(&format!("- **APY**: {}%\n", strategy.expected_apy));
    out.push_str(&format!("- **Risk Level**: {}\n", strategy.risk_level));
    out.push_str(&format!("- **IL Exposure**: {}%\n\n", strategy.il_exposure));

    out.push_str("### How It Works\n");
    for (i, step) in strategy.steps.iter().take(3).enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, step));
    }
    out.push('\n');

    out.push_str("### Key Risks\n");
    out.push_str("- **Smart Contract Risk**: Protocol bugs or exploits could lose funds\n");
    if strategy.il_exposure > rust_decimal::Decimal::ZERO {
        out.push_str(&format!(
            "- **Impermanent Loss**: Up to {}% from price divergence\n",
            strategy.il_exposure
        ));
    } else {
        out.push_str("- **Market Risk**: Asset prices can move against the position\n");
    }
    out.push_str(&format!(
        "- **Gas Costs**: About ${} to enter and exit\n\n",
        format_usd(strategy.gas_cost_usd)
    ));

    out.push_str("### Suitability\n");
    out.push_str(&format!(
        "With a ${} portfolio and {} risk tolerance, this strategy fits if you can commit at least ${}.\n\n",
        format_usd(portfolio.total_value_usd),
        portfolio.risk_tolerance,
        format_usd(strategy.minimum_investment)
    ));

    out.push_str("### Exit Strategy\n");
    for exit in strategy.exit_options.iter().take(2) {
        out.push_str(&format!("- {exit}\n"));
    }
    out.push('\n');

    out.push_str("Monitor the position regularly and exit if market conditions change.");
    out
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use agent_core::{AgentError, Completion};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::catalog;
    use crate::model::RiskLevel;
    use crate::strategy::StrategyBuilder;

    enum Reply {
        Text(&'static str),
        Fail,
    }

    struct FakeProvider {
        name: &'static str,
        reply: Reply,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn new(name: &'static str, reply: Reply) -> Arc<Self> {
            Arc::new(Self { name, reply, calls: AtomicUsize::new(0) })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmProvider for FakeProvider {
        fn name(&self) -> &str {
            self.name
        }

        fn default_model(&self) -> &str {
            "fake-1"
        }

        async fn complete(&self, messages: &[Message], options: &GenerationOptions) -> agent_core::Result<Completion> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(options.max_tokens, 1000);
            assert!(messages.last().is_some_and(|m| m.content.contains("Strategy: ")));

            match self.reply {
                Reply::Text(text) => Ok(Completion {
                    content: text.to_string(),
                    model: self.default_model().to_string(),
                    usage: None,
                    finish_reason: None,
                }),
                Reply::Fail => Err(AgentError::ProviderUnavailable(self.name.into())),
            }
        }
    }

    fn fixture() -> (YieldStrategy, Portfolio) {
        let portfolio = Portfolio::new("0xabc", dec!(12500), RiskLevel::Low);
        let template = catalog::template("stable_lp_concentrated").unwrap();
        let strategy = StrategyBuilder::new(Duration::from_secs(3600)).build(template, &portfolio);
        (strategy, portfolio)
    }

    #[test]
    fn test_state_progression() {
        let mut state = ExplanationState::NotAttempted;
        let mut seen = vec![];
        for _ in 0..4 {
            state = state.next();
            seen.push(state);
        }
        assert_eq!(
            seen,
            vec![
                ExplanationState::TriedPrimary,
                ExplanationState::TriedSecondary,
                ExplanationState::FallbackTemplate,
                ExplanationState::FallbackTemplate,
            ]
        );
    }

    #[tokio::test]
    async fn test_primary_answers() {
        let (strategy, portfolio) = fixture();
        let primary = FakeProvider::new("Anthropic", Reply::Text("Claude says hi"));
        let secondary = FakeProvider::new("OpenAI", Reply::Text("GPT says hi"));
        let generator = ExplanationGenerator::new(Some(primary.clone()), Some(secondary.clone()));

        let explanation = generator.explain(&strategy, &portfolio).await;
        assert_eq!(explanation.content, "Claude says hi");
        assert_eq!(explanation.provider.as_deref(), Some("Anthropic"));
        assert!(!explanation.fallback);
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_primary_falls_to_secondary() {
        let (strategy, portfolio) = fixture();
        let primary = FakeProvider::new("Anthropic", Reply::Fail);
        let secondary = FakeProvider::new("OpenAI", Reply::Text("GPT says hi"));
        let generator = ExplanationGenerator::new(Some(primary.clone()), Some(secondary.clone()));

        let explanation = generator.explain(&strategy, &portfolio).await;
        assert_eq!(explanation.provider.as_deref(), Some("OpenAI"));
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_reply_advances() {
        let (strategy, portfolio) = fixture();
        let primary = FakeProvider::new("Anthropic", Reply::Text("   "));
        let generator = ExplanationGenerator::new(Some(primary.clone()), None);

        let explanation = generator.explain(&strategy, &portfolio).await;
        assert!(explanation.fallback);
        assert_eq!(primary.calls(), 1);
    }

    #[tokio::test]
    async fn test_both_fail_uses_template() {
        let (strategy, portfolio) = fixture();
        let generator = ExplanationGenerator::new(
            Some(FakeProvider::new("Anthropic", Reply::Fail)),
            Some(FakeProvider::new("OpenAI", Reply::Fail)),
        );

        let explanation = generator.explain(&strategy, &portfolio).await;
        assert!(explanation.fallback);
        assert!(explanation.provider.is_none());
        assert!(explanation.content.contains("Concentrated Stablecoin LP"));
        assert!(explanation.content.contains("$12,500"));
    }

    #[tokio::test]
    async fn test_unconfigured_providers_are_skipped() {
        let (strategy, portfolio) = fixture();
        let secondary = FakeProvider::new("OpenAI", Reply::Text("GPT says hi"));
        let generator = ExplanationGenerator::new(None, Some(secondary.clone()));
        assert_eq!(generator.providers(), vec!["OpenAI"]);

        let explanation = generator.explain(&strategy, &portfolio).await;
        assert_eq!(explanation.content, "GPT says hi");

        let none = ExplanationGenerator::new(None, None);
        assert!(none.explain(&strategy, &portfolio).await.fallback);
    }

    #[test]
    fn test_prompt_contents() {
        let (strategy, portfolio) = fixture();
        let prompt = build_prompt(&strategy, &portfolio);

        assert!(prompt.contains("$12,500 portfolio"));
        assert!(prompt.contains("Type: liquidity_provision"));
        assert!(prompt.contains("Expected APY: 12.0%"));
        assert!(prompt.contains("1. Analyze current price range on Uniswap V3"));
        assert!(prompt.contains("5. Rebalance if price moves outside range"));
    }

    #[test]
    fn test_fallback_sections() {
        let (strategy, portfolio) = fixture();
        let text = fallback_explanation(&strategy, &portfolio);

        assert!(text.starts_with("## Concentrated Stablecoin LP Strategy Explanation"));
        assert!(text.contains("liquidity provision strategy on Uniswap V3 (Ethereum)"));
        assert!(text.contains("**Impermanent Loss**: Up to 0.5%"));
        assert!(text.contains("3. Provide liquidity equally in both tokens"));
        assert!(!text.contains("4. Monitor position daily"));
        assert!(text.contains("- Claim accumulated fees"));
        assert!(!text.contains("Swap back to preferred stablecoin"));
        assert!(text.contains("low risk tolerance"));
        assert!(text.contains("at least $1,000"));
    }

    #[test]
    fn test_fallback_layout() {
        let (strategy, portfolio) = fixture();
        let text = fallback_explanation(&strategy, &portfolio);

        assert!(text.contains("Explanation\n\n### Overview\nThis is a"));
        assert!(text.contains("\n\n### Expected Returns\n- **APY**: "));
        assert!(text.contains("\n\n### Exit Strategy\n- "));
        assert!(text.ends_with("\n\nMonitor the position regularly and exit if market conditions change."));
        let headings = ["### Overview", "### Expected Returns", "### How It Works", "### Key Risks", "### Suitability", "### Exit Strategy"];
        let positions: Vec<usize> = headings.iter().filter_map(|h| text.find(h)).collect();
        assert_eq!(positions.len(), headings.len());
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_fallback_market_risk_without_il() {
        let (mut strategy, portfolio) = fixture();
        strategy.il_exposure = rust_decimal::Decimal::ZERO;
        let text = fallback_explanation(&strategy, &portfolio);
        assert!(text.contains("**Market Risk**"));
        assert!(!text.contains("**Impermanent Loss**"));
    }
}
