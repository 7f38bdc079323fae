//! # agent-core
//!
//! Provider-agnostic LLM abstraction shared by the advisor and its runtimes.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    yield-advisor                          │
//! │  ┌──────────────────┐      ┌──────────────────────────┐   │
//! │  │  Explanation     │──────│  Arc<dyn LlmProvider>    │   │
//! │  │  state machine   │      │  (Strategy)              │   │
//! │  └──────────────────┘      └──────────────────────────┘   │
//! └──────────────────────────────────────────────────────────┘
//!                                   │
//!                 ┌─────────────────┴─────────────────┐
//!          AnthropicProvider                   OpenAiProvider
//! ```
//!
//! The `LlmProvider` trait enables swapping between Anthropic, OpenAI,
//! or any other hosted provider without changing advisor logic.

pub mod provider;
pub mod message;
pub mod error;

pub use error::{AgentError, Result};
pub use message::{Message, Role};
pub use provider::{Completion, GenerationOptions, LlmProvider};
