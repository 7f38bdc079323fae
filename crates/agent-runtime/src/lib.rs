//! # agent-runtime
//!
//! Hosted LLM providers for the yield advisor.
//!
//! ## Providers
//!
//! - **Anthropic** (default): Claude via the Messages API
//! - **OpenAI** (default): GPT via the Chat Completions API
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::{AnthropicProvider, OpenAiProvider};
//!
//! let primary = AnthropicProvider::from_env().ok();
//! let secondary = OpenAiProvider::from_env().ok();
//! ```

#[cfg(feature = "anthropic")]
pub mod anthropic;

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "anthropic")]
pub use anthropic::{AnthropicConfig, AnthropicProvider};

#[cfg(feature = "openai")]
pub use openai::{OpenAiConfig, OpenAiProvider};

// Re-export core types for convenience
pub use agent_core::{AgentError, GenerationOptions, LlmProvider, Message, Result, Role};
