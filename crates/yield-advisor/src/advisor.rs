//! Yield Advisor
//!
//! Long-lived context owning the cache, the LLM providers and the knowledge
//! base. Every public operation is infallible: provider and cache failures
//! are logged and degrade to the template explanation or a fresh compute.

use std::sync::Arc;

use agent_core::LlmProvider;
use rust_decimal::Decimal;

use crate::cache::{MemoryCache, StrategyCache};
use crate::catalog;
use crate::config::AdvisorConfig;
use crate::error::Result;
use crate::explain::{Explanation, ExplanationGenerator};
use crate::knowledge::KnowledgeBase;
use crate::model::{Alert, Portfolio, PortfolioAnalysis, Position, RiskMetrics, YieldStrategy};
use crate::opportunity::find_opportunities;
use crate::strategy::{select_strategies, StrategyBuilder};
use crate::{monitor, scoring, YIELD_ADVISOR_PROMPT};

/// Opportunities surfaced per portfolio analysis
const MAX_ANALYSIS_RECOMMENDATIONS: usize = 3;

pub struct YieldAdvisor {
    config: AdvisorConfig,
    cache: Arc<dyn StrategyCache>,
    explainer: ExplanationGenerator,
    knowledge_base: KnowledgeBase,
    builder: StrategyBuilder,
}

impl YieldAdvisor {
    pub fn builder() -> YieldAdvisorBuilder {
        YieldAdvisorBuilder::new()
    }

    /// Score a portfolio and list up to three improvement opportunities
    pub async fn analyze_portfolio(&self, portfolio: &Portfolio) -> PortfolioAnalysis {
        let current_apy = scoring::weighted_apy(&portfolio.positions);
        let mut opportunities = find_opportunities(portfolio);

        let optimization_potential = opportunities
            .iter()
            .map(|o| o.expected_apy())
            .max()
            .map_or(Decimal::ZERO, |best| best.saturating_sub(current_apy));

        opportunities.truncate(MAX_ANALYSIS_RECOMMENDATIONS);

        PortfolioAnalysis {
            total_value: portfolio.total_value_usd,
            risk_score: scoring::portfolio_risk_score(portfolio),
            diversification_score: scoring::diversification_score(portfolio),
            current_apy,
            optimization_potential,
            recommendations: opportunities,
        }
    }

    /// Up to five strategies for a portfolio, highest APY first.
    ///
    /// `max_gas_usd` defaults to the configured budget. Results are cached per
    /// (address, target, gas budget) for the configured TTL.
    pub async fn recommend_strategies(
        &self,
        portfolio: &Portfolio,
        target_apy: Option<Decimal>,
        max_gas_usd: Option<Decimal>,
    ) -> Vec<YieldStrategy> {
        let max_gas_usd = max_gas_usd.unwrap_or(self.config.default_max_gas_usd);
        let key = cache_key(&portfolio.address, target_apy, max_gas_usd);

        if let Some(cached) = self.cached_strategies(&key).await {
            tracing::debug!("Cache hit for {} ({})", key, self.cache.name());
            return cached;
        }
        tracing::debug!("Cache miss for {}", key);

        let strategies = select_strategies(
            catalog::templates(),
            &self.builder,
            portfolio,
            target_apy,
            max_gas_usd,
        );

        if !strategies.is_empty() {
            match serde_json::to_string(&strategies) {
                Ok(payload) => self.cache.set(&key, payload, self.config.cache.ttl()).await,
                Err(e) => tracing::warn!("Could not serialize strategies for cache: {}", e),
            }
        }

        strategies
    }

    async fn cached_strategies(&self, key: &str) -> Option<Vec<YieldStrategy>> {
        let payload = self.cache.get(key).await?;
        match serde_json::from_str::<Vec<YieldStrategy>>(&payload) {
            Ok(strategies) if !strategies.is_empty() => Some(strategies),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Discarding unreadable cache entry {}: {}", key, e);
                None
            }
        }
    }

    /// Natural-language explanation of a strategy; never empty
    pub async fn explain_strategy(&self, strategy: &YieldStrategy, portfolio: &Portfolio) -> String {
        self.explain_strategy_detailed(strategy, portfolio).await.content
    }

    /// Explanation together with the provider that produced it
    pub async fn explain_strategy_detailed(&self, strategy: &YieldStrategy, portfolio: &Portfolio) -> Explanation {
        self.explainer.explain(strategy, portfolio).await
    }

    pub async fn calculate_risk_metrics(&self, strategy: &YieldStrategy, investment_amount: Decimal) -> RiskMetrics {
        scoring::risk_metrics(strategy, investment_amount)
    }

    pub async fn monitor_positions(&self, positions: &[Position]) -> Vec<Alert> {
        monitor::monitor_positions(positions)
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Configured LLM providers, in fallback order
    pub fn providers(&self) -> Vec<&str> {
        self.explainer.providers()
    }

    pub fn cache_name(&self) -> &str {
        self.cache.name()
    }
}

/// `strategy:{address}:{target|none}:{max_gas}`
fn cache_key(address: &str, target_apy: Option<Decimal>, max_gas_usd: Decimal) -> String {
    let target = target_apy.map_or_else(|| "none".to_string(), |t| t.normalize().to_string());
    format!("strategy:{}:{}:{}", address, target, max_gas_usd.normalize())
}

/// Builder for `YieldAdvisor`
pub struct YieldAdvisorBuilder {
    config: AdvisorConfig,
    cache: Option<Arc<dyn StrategyCache>>,
    primary: Option<Arc<dyn LlmProvider>>,
    secondary: Option<Arc<dyn LlmProvider>>,
    knowledge_base: Option<KnowledgeBase>,
}

impl Default for YieldAdvisorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl YieldAdvisorBuilder {
    pub fn new() -> Self {
        Self {
            config: AdvisorConfig::default(),
            cache: None,
            primary: None,
            secondary: None,
            knowledge_base: None,
        }
    }

    pub fn config(mut self, config: AdvisorConfig) -> Self {
        self.config = config;
        self
    }

    /// Cache store; defaults to an in-process cache
    pub fn cache(mut self, cache: Arc<dyn StrategyCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Provider tried first for explanations
    pub fn primary_provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.primary = Some(provider);
        self
    }

    /// Provider tried when the primary fails
    pub fn secondary_provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.secondary = Some(provider);
        self
    }

    /// Knowledge base; defaults to loading the configured path
    pub fn knowledge_base(mut self, knowledge_base: KnowledgeBase) -> Self {
        self.knowledge_base = Some(knowledge_base);
        self
    }

    pub fn build(self) -> Result<YieldAdvisor> {
        self.config.validate()?;

        let knowledge_base = self
            .knowledge_base
            .unwrap_or_else(|| KnowledgeBase::load_or_default(&self.config.knowledge_base_path));

        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(MemoryCache::new(self.config.cache.max_capacity)) as Arc<dyn StrategyCache>);

        let system_prompt = format!(
            "{}\n\n## Risk Factors\n\n{}",
            YIELD_ADVISOR_PROMPT,
            knowledge_base.risk_summary()
        );
        let explainer = ExplanationGenerator::new(self.primary, self.secondary).with_system_prompt(system_prompt);

        tracing::info!(
            "Yield advisor ready: cache={}, providers={:?}",
            cache.name(),
            explainer.providers()
        );

        Ok(YieldAdvisor {
            builder: StrategyBuilder::new(self.config.cache.ttl()),
            config: self.config,
            cache,
            explainer,
            knowledge_base,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::model::{AlertKind, Opportunity, RiskLevel, Severity};

    /// Cache that never stores anything and counts calls
    #[derive(Default)]
    struct BrokenCache {
        gets: AtomicUsize,
        sets: AtomicUsize,
    }

    #[async_trait]
    impl StrategyCache for BrokenCache {
        async fn get(&self, _key: &str) -> Option<String> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            None
        }

        async fn set(&self, _key: &str, _value: String, _ttl: Duration) {
            self.sets.fetch_add(1, Ordering::SeqCst);
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    fn advisor_with(cache: Arc<dyn StrategyCache>) -> YieldAdvisor {
        YieldAdvisor::builder()
            .cache(cache)
            .knowledge_base(KnowledgeBase::default())
            .build()
            .unwrap()
    }

    fn advisor() -> YieldAdvisor {
        advisor_with(Arc::new(MemoryCache::default()))
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(cache_key("0xabc", None, dec!(100)), "strategy:0xabc:none:100");
        assert_eq!(cache_key("0xabc", Some(dec!(15.0)), dec!(100.00)), "strategy:0xabc:15:100");
        assert_eq!(cache_key("0xabc", Some(dec!(12.5)), dec!(75)), "strategy:0xabc:12.5:75");
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let mut config = AdvisorConfig::default();
        config.cache.ttl_secs = 0;
        assert!(YieldAdvisor::builder().config(config).build().is_err());
    }

    #[tokio::test]
    async fn test_analyze_empty_portfolio() {
        let portfolio = Portfolio::new("0x1", dec!(5000), RiskLevel::Low).with_chains(["Ethereum"]);
        let analysis = advisor().analyze_portfolio(&portfolio).await;

        assert_eq!(analysis.total_value, dec!(5000));
        assert_eq!(analysis.risk_score, dec!(45));
        assert_eq!(analysis.diversification_score, Decimal::ZERO);
        assert_eq!(analysis.current_apy, Decimal::ZERO);
        // All idle: deploy at 21%
        assert_eq!(analysis.optimization_potential, dec!(21));
        assert_eq!(analysis.recommendations.len(), 1);
    }

    #[tokio::test]
    async fn test_analyze_caps_recommendations() {
        let mut portfolio = Portfolio::new("0x1", dec!(10000), RiskLevel::Medium).with_chains(["Ethereum", "Arbitrum"]);
        for i in 0..4 {
            portfolio.positions.push(
                Position::new(format!("p{i}"))
                    .with_protocol("Aave V3")
                    .with_value(dec!(1000))
                    .with_apy(dec!(4)),
            );
        }

        let analysis = advisor().analyze_portfolio(&portfolio).await;
        assert_eq!(analysis.current_apy, dec!(4));
        assert_eq!(analysis.recommendations.len(), 3);
        assert!(matches!(analysis.recommendations[0], Opportunity::Upgrade { .. }));
        // The deploy opportunity is cut from the list but still sets the potential
        assert_eq!(analysis.optimization_potential, dec!(17));
    }

    #[tokio::test]
    async fn test_analyze_extreme_values() {
        let portfolio = Portfolio::new("0x1", dec!(1000), RiskLevel::Medium)
            .with_position(Position::new("a").with_value(dec!(5e19)).with_apy(dec!(5e10)))
            .with_position(Position::new("b").with_value(dec!(5e28)).with_apy(dec!(2)))
            .with_position(Position::new("c").with_value(dec!(5e28)).with_apy(dec!(2)));

        let analysis = advisor().analyze_portfolio(&portfolio).await;
        assert_eq!(analysis.current_apy, Decimal::ZERO);
        // Two upgrades, no idle capital left to deploy
        assert_eq!(analysis.recommendations.len(), 2);
        assert_eq!(analysis.optimization_potential, dec!(15));
    }

    #[tokio::test]
    async fn test_recommend_low_tolerance() {
        let portfolio = Portfolio::new("0x1", dec!(5000), RiskLevel::Low).with_chains(["Ethereum"]);
        let strategies = advisor().recommend_strategies(&portfolio, Some(dec!(15)), None).await;

        assert!(!strategies.is_empty());
        assert!(strategies.len() <= 5);
        assert!(strategies.iter().all(|s| s.risk_level < RiskLevel::High));
        assert!(strategies.windows(2).all(|w| w[0].expected_apy >= w[1].expected_apy));
        // threshold 12: bold 21, lrt 18, basis 15, stable lp 12
        assert_eq!(strategies.len(), 4);
    }

    #[tokio::test]
    async fn test_recommend_uses_cached_result() {
        let cache = Arc::new(MemoryCache::default());
        let advisor = advisor_with(cache.clone());
        let portfolio = Portfolio::new("0xcafe", dec!(20000), RiskLevel::Medium);

        let first = advisor.recommend_strategies(&portfolio, None, None).await;
        let second = advisor.recommend_strategies(&portfolio, None, None).await;
        assert_eq!(first, second);

        // Overwrite the entry to prove the second read comes from the cache
        let mut planted = first.clone();
        planted.truncate(1);
        planted[0].name = "Planted".into();
        cache
            .set(
                "strategy:0xcafe:none:100",
                serde_json::to_string(&planted).unwrap(),
                Duration::from_secs(60),
            )
            .await;

        let third = advisor.recommend_strategies(&portfolio, None, None).await;
        assert_eq!(third.len(), 1);
        assert_eq!(third[0].name, "Planted");
    }

    #[tokio::test]
    async fn test_recommend_ignores_bad_cache_entries() {
        let cache = Arc::new(MemoryCache::default());
        let advisor = advisor_with(cache.clone());
        let portfolio = Portfolio::new("0xcafe", dec!(20000), RiskLevel::Medium);

        cache.set("strategy:0xcafe:none:100", "{garbage".into(), Duration::from_secs(60)).await;
        assert_eq!(advisor.recommend_strategies(&portfolio, None, None).await.len(), 5);

        cache.set("strategy:0xcafe:none:100", "[]".into(), Duration::from_secs(60)).await;
        assert_eq!(advisor.recommend_strategies(&portfolio, None, None).await.len(), 5);
    }

    #[tokio::test]
    async fn test_recommend_with_broken_cache() {
        let cache = Arc::new(BrokenCache::default());
        let advisor = advisor_with(cache.clone());
        let portfolio = Portfolio::new("0x1", dec!(20000), RiskLevel::Medium);

        let first = advisor.recommend_strategies(&portfolio, None, None).await;
        let second = advisor.recommend_strategies(&portfolio, None, None).await;

        let names = |list: &[YieldStrategy]| list.iter().map(|s| s.name.clone()).collect::<Vec<_>>();
        assert_eq!(first.len(), 5);
        assert_eq!(names(&first), names(&second));
        assert_eq!(cache.gets.load(Ordering::SeqCst), 2);
        assert_eq!(cache.sets.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_recommend_gas_budget() {
        let cache = Arc::new(BrokenCache::default());
        let advisor = advisor_with(cache.clone());
        let portfolio = Portfolio::new("0x1", dec!(20000), RiskLevel::Medium);

        assert!(advisor.recommend_strategies(&portfolio, None, Some(dec!(20))).await.is_empty());
        // Nothing to cache
        assert_eq!(cache.sets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_explain_without_providers() {
        let advisor = advisor();
        assert!(advisor.providers().is_empty());

        let portfolio = Portfolio::new("0x1", dec!(7500), RiskLevel::Medium);
        let strategies = advisor.recommend_strategies(&portfolio, None, None).await;
        let text = advisor.explain_strategy(&strategies[0], &portfolio).await;

        assert!(text.contains(&strategies[0].name));
        assert!(text.contains("$7,500"));
    }

    #[tokio::test]
    async fn test_risk_metrics_and_monitoring() {
        let advisor = advisor();
        let portfolio = Portfolio::new("0x1", dec!(20000), RiskLevel::Medium);
        let strategies = advisor.recommend_strategies(&portfolio, None, None).await;
        let looping = strategies.iter().find(|s| s.name == "BOLD Recursive Lending").unwrap();

        let metrics = advisor.calculate_risk_metrics(looping, dec!(10000)).await;
        assert_eq!(metrics.liquidation_risk, dec!(0.15));
        assert_eq!(metrics.protocol_risk_score, dec!(25));

        let alerts = advisor
            .monitor_positions(&[Position::new("p1").with_current_apy(dec!(9)).with_health_factor(dec!(1.2))])
            .await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::LiquidationRisk);
        assert_eq!(alerts[0].severity, Severity::Critical);
    }

    #[test]
    fn test_knowledge_base_access() {
        assert_eq!(advisor().knowledge_base().chains.len(), 7);
    }
}
