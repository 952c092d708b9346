//! Chat-completions insight provider.
//!
//! Works against any OpenAI-compatible `/chat/completions` endpoint. The
//! default configuration targets the DeepSeek API, matching the environment
//! variables the CLI reads (`AI_API_KEY`, `AI_BASE_URL`, `AI_MODEL_NAME`).

use super::InsightProvider;
use crate::error::{EtlError, Result};
use crate::types::{Insight, TokenUsage};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Default API base URL.
const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";

/// Default model for profile Q&A.
const DEFAULT_MODEL: &str = "deepseek-chat";

/// Default timeout for API requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default temperature (low for factual, grounded answers).
const DEFAULT_TEMPERATURE: f32 = 0.2;

const SYSTEM_PROMPT: &str = "You are a Senior GIS Expert specializing in forest \
cover analysis. Answer questions strictly based on the dataset profile provided. \
If the profile does not contain the information needed, say so instead of guessing.";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<Choice>>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: Option<u64>,
    completion_tokens: Option<u64>,
    total_tokens: Option<u64>,
}

/// Configuration for the chat-completions provider.
#[derive(Debug, Clone)]
pub struct InsightConfig {
    /// The model to use (e.g. "deepseek-chat").
    pub model: String,
    /// Base URL of the OpenAI-compatible API, without the endpoint path.
    pub base_url: String,
    /// Temperature for response generation (0.0 - 2.0).
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl InsightConfig {
    pub fn builder() -> InsightConfigBuilder {
        InsightConfigBuilder::default()
    }

    /// Full URL of the chat-completions endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Builder for [`InsightConfig`].
#[derive(Default)]
pub struct InsightConfigBuilder {
    model: Option<String>,
    base_url: Option<String>,
    temperature: Option<f32>,
    timeout_secs: Option<u64>,
}

impl InsightConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    pub fn build(self) -> InsightConfig {
        InsightConfig {
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// [`InsightProvider`] backed by an OpenAI-compatible chat API.
///
/// # Example
///
/// ```rust,ignore
/// use geosmart_etl::ai::{ChatCompletionsProvider, InsightProvider};
///
/// let provider = ChatCompletionsProvider::new(api_key)?;
/// let insight = provider.ask("processed/train_profile.json".as_ref(),
///                            "Which soil type dominates?")?;
/// println!("{}", insight.answer);
/// ```
pub struct ChatCompletionsProvider {
    api_key: String,
    config: InsightConfig,
    client: Client,
}

impl ChatCompletionsProvider {
    /// Create a provider with default configuration.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, InsightConfig::default())
    }

    /// Create a provider with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: InsightConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            api_key: api_key.into(),
            config,
            client,
        })
    }

    fn build_prompt(profile_json: &str, query: &str) -> String {
        format!(
            "DATASET PROFILE (JSON):\n{}\n\nQUESTION: {}",
            profile_json, query
        )
    }

    fn call_api(&self, prompt: &str) -> Result<ChatResponse> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: self.config.temperature,
        };

        debug!("Querying {} ({})", self.config.endpoint(), self.config.model);
        let response = self
            .client
            .post(self.config.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()?;

        if !response.status().is_success() {
            return Err(EtlError::InvalidConfig(format!(
                "Insight API error {}: {}",
                response.status(),
                response.text().unwrap_or_default()
            )));
        }

        Ok(response.json()?)
    }

    fn extract_insight(response: ChatResponse) -> Result<Insight> {
        let answer = response
            .choices
            .as_ref()
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.message.as_ref())
            .map(|msg| msg.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                EtlError::InvalidConfig("Insight API returned no answer content".to_string())
            })?;

        let usage = response
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens.unwrap_or(0),
                completion_tokens: u.completion_tokens.unwrap_or(0),
                total_tokens: u.total_tokens.unwrap_or(0),
            })
            .unwrap_or_default();

        Ok(Insight { answer, usage })
    }
}

impl InsightProvider for ChatCompletionsProvider {
    fn ask(&self, profile_path: &Path, query: &str) -> Result<Insight> {
        let profile_json = fs::read_to_string(profile_path)?;
        let prompt = Self::build_prompt(&profile_json, query);

        let response = self.call_api(&prompt)?;
        let insight = Self::extract_insight(response)?;

        info!(
            "Insight received ({} tokens total)",
            insight.usage.total_tokens
        );
        Ok(insight)
    }

    fn name(&self) -> &str {
        "chat-completions"
    }

    fn model(&self) -> Option<&str> {
        Some(&self.config.model)
    }
}
