//! Anthropic LLM Provider
//!
//! Implementation of `LlmProvider` for the Anthropic Messages API.

use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    message::{split_system, Message, Role},
    provider::{Completion, FinishReason, GenerationOptions, LlmProvider, TokenUsage},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic provider configuration
#[derive(Clone, Debug)]
pub struct AnthropicConfig {
    /// API key; the provider is unconfigured without one
    pub api_key: Option<String>,

    /// API base URL
    pub base_url: String,

    /// Default model
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.anthropic.com".into(),
            model: "claude-3-opus-20240229".into(),
            timeout_secs: 30,
        }
    }
}

impl AnthropicConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: std::env::var("ANTHROPIC_BASE_URL").unwrap_or(defaults.base_url),
            model: std::env::var("ANTHROPIC_MODEL").unwrap_or(defaults.model),
            timeout_secs: std::env::var("ANTHROPIC_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Anthropic Claude provider
pub struct AnthropicProvider {
    http: reqwest::Client,
    api_key: String,
    config: AnthropicConfig,
}

impl AnthropicProvider {
    /// Create from configuration; fails when no API key is set
    pub fn from_config(config: AnthropicConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AgentError::NotConfigured("Anthropic".into()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(e.to_string()))?;

        Ok(Self { http, api_key, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(AnthropicConfig::from_env())
    }

    /// Build the request body
    fn build_request(messages: &[Message], options: &GenerationOptions, model: &str) -> MessagesRequest {
        let (system, rest) = split_system(messages);

        MessagesRequest {
            model: model.to_string(),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            system,
            messages: rest
                .into_iter()
                .map(|m| WireMessage {
                    role: match m.role {
                        Role::Assistant => "assistant",
                        _ => "user",
                    },
                    content: m.content.clone(),
                })
                .collect(),
        }
    }

    /// Convert API response to agent completion
    fn convert_completion(response: MessagesResponse) -> Result<Completion> {
        let content: String = response
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        if content.trim().is_empty() {
            return Err(AgentError::EmptyCompletion("Anthropic".into()));
        }

        Ok(Completion {
            content,
            model: response.model,
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.input_tokens,
                completion_tokens: u.output_tokens,
                total_tokens: u.input_tokens + u.output_tokens,
            }),
            finish_reason: response.stop_reason.as_deref().map(FinishReason::parse),
        })
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "Anthropic"
    }

    fn default_model(&self) -> &str {
        &self.config.model
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let model = options.model_or(&self.config.model);
        let body = Self::build_request(messages, options, model);

        let response = self.http
            .post(format!("{}/v1/messages", self.config.base_url.trim_end_matches('/')))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(AgentError::from_status("anthropic", status.as_u16(), &text));
        }

        let parsed: MessagesResponse = serde_json::from_str(&text)
            .map_err(|e| AgentError::Parse(e.to_string()))?;

        Self::convert_completion(parsed)
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<WireMessage>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    model: String,
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}
