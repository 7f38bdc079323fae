//! yield-advisor HTTP Server
//!
//! Axum-based JSON API over the yield advisor: portfolio analysis, strategy
//! recommendations, explanations, risk metrics and position monitoring.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{routing::{get, post}, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::LlmProvider;
use agent_runtime::{AnthropicProvider, OpenAiProvider};
use yield_advisor::{cache, AdvisorConfig, YieldAdvisor};

use crate::handlers::{
    analyze_portfolio, explain_strategy, health_check, knowledge, monitor_positions,
    recommend_strategies, risk_metrics,
};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = AdvisorConfig::from_env();
    let cache = cache::connect(&config.cache).await;

    let mut builder = YieldAdvisor::builder().config(config).cache(cache);

    // Providers are optional; explanations fall back to a template without them
    match AnthropicProvider::from_env() {
        Ok(provider) => {
            tracing::info!("✓ Anthropic configured ({})", provider.default_model());
            builder = builder.primary_provider(Arc::new(provider));
        }
        Err(e) => tracing::warn!("⚠ Anthropic disabled: {}", e),
    }
    match OpenAiProvider::from_env() {
        Ok(provider) => {
            tracing::info!("✓ OpenAI configured ({})", provider.default_model());
            builder = builder.secondary_provider(Arc::new(provider));
        }
        Err(e) => tracing::warn!("⚠ OpenAI disabled: {}", e),
    }

    let state = AppState {
        advisor: Arc::new(builder.build()?),
    };

    let app = router(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 yield-server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                  - Health check");
    tracing::info!("  POST /api/portfolio/analyze   - Portfolio analysis");
    tracing::info!("  POST /api/strategies/recommend - Strategy recommendations");
    tracing::info!("  POST /api/strategies/explain  - Strategy explanation");
    tracing::info!("  POST /api/strategies/risk     - Risk metrics");
    tracing::info!("  POST /api/positions/monitor   - Position alerts");
    tracing::info!("  GET  /api/knowledge           - Knowledge base");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/portfolio/analyze", post(analyze_portfolio))
        .route("/api/strategies/recommend", post(recommend_strategies))
        .route("/api/strategies/explain", post(explain_strategy))
        .route("/api/strategies/risk", post(risk_metrics))
        .route("/api/positions/monitor", post(monitor_positions))
        .route("/api/knowledge", get(knowledge))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
