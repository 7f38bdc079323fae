//! HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use yield_advisor::{
    Alert, Explanation, KnowledgeBase, Portfolio, PortfolioAnalysis, Position, RiskMetrics, YieldStrategy,
};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub cache: String,
    pub providers: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub portfolio: Portfolio,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub portfolio: Portfolio,
    /// Desired APY, percent
    #[serde(default)]
    pub target_apy: Option<Decimal>,
    /// Gas budget, USD; the server default applies when absent
    #[serde(default)]
    pub max_gas_usd: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub strategies: Vec<YieldStrategy>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    pub strategy: YieldStrategy,
    pub portfolio: Portfolio,
}

#[derive(Debug, Deserialize)]
pub struct RiskRequest {
    pub strategy: YieldStrategy,
    pub investment_amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct MonitorRequest {
    pub positions: Vec<Position>,
}

#[derive(Debug, Serialize)]
pub struct MonitorResponse {
    pub alerts: Vec<Alert>,
    pub count: usize,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(error: impl Into<String>, code: &str) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        cache: state.advisor.cache_name().to_string(),
        providers: state.advisor.providers().into_iter().map(String::from).collect(),
    })
}

/// Portfolio risk, diversification and opportunities
pub async fn analyze_portfolio(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Json<PortfolioAnalysis> {
    Json(state.advisor.analyze_portfolio(&payload.portfolio).await)
}

/// Ranked strategy recommendations
pub async fn recommend_strategies(
    State(state): State<AppState>,
    Json(payload): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, ApiError> {
    if payload.max_gas_usd.is_some_and(|g| g.is_sign_negative()) {
        return Err(bad_request("max_gas_usd must not be negative", "INVALID_GAS_BUDGET"));
    }

    let strategies = state
        .advisor
        .recommend_strategies(&payload.portfolio, payload.target_apy, payload.max_gas_usd)
        .await;

    tracing::info!(
        "Recommended {} strategies for {}",
        strategies.len(),
        payload.portfolio.address
    );

    Ok(Json(RecommendResponse {
        count: strategies.len(),
        strategies,
    }))
}

/// Natural-language strategy explanation
pub async fn explain_strategy(
    State(state): State<AppState>,
    Json(payload): Json<ExplainRequest>,
) -> Json<Explanation> {
    Json(
        state
            .advisor
            .explain_strategy_detailed(&payload.strategy, &payload.portfolio)
            .await,
    )
}

/// Risk metrics for a strategy at an investment size
pub async fn risk_metrics(
    State(state): State<AppState>,
    Json(payload): Json<RiskRequest>,
) -> Result<Json<RiskMetrics>, ApiError> {
    if payload.investment_amount.is_sign_negative() {
        return Err(bad_request("investment_amount must not be negative", "INVALID_AMOUNT"));
    }

    Ok(Json(
        state
            .advisor
            .calculate_risk_metrics(&payload.strategy, payload.investment_amount)
            .await,
    ))
}

/// Threshold alerts for open positions
pub async fn monitor_positions(
    State(state): State<AppState>,
    Json(payload): Json<MonitorRequest>,
) -> Json<MonitorResponse> {
    let alerts = state.advisor.monitor_positions(&payload.positions).await;
    Json(MonitorResponse {
        count: alerts.len(),
        alerts,
    })
}

/// Loaded knowledge base
pub async fn knowledge(State(state): State<AppState>) -> Json<KnowledgeBase> {
    Json(state.advisor.knowledge_base().clone())
}
