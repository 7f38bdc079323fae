//! Application State

use std::sync::Arc;

use yield_advisor::YieldAdvisor;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Advisor context: cache, providers, knowledge base
    pub advisor: Arc<YieldAdvisor>,
}
