//! OpenAI-backed copy generator.
//!
//! Single non-streaming chat completion per brief. The first line of
//! the completion is treated as the headline, the rest as the body.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{CopyDraft, CopyError, CopyGenerator, CopyRequest};

/// Configuration for the OpenAI copywriter.
#[derive(Clone)]
pub struct OpenAiConfig {
    api_key: SecretString,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Creates a configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Copy generator backed by the OpenAI chat completions API.
pub struct OpenAiCopywriter {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiCopywriter {
    pub fn new(config: OpenAiConfig) -> Result<Self, CopyError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CopyError::Unavailable(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn build_prompt(request: &CopyRequest) -> String {
        format!(
            "Write ad campaign copy for {placement}.\n\
             Topic: {topic}\n\
             Audience: {audience}\n\
             Key benefit: {benefit}\n\
             Respond with a headline on the first line and body copy after it.",
            placement = request.placement,
            topic = request.topic,
            audience = request.audience,
            benefit = request.benefit,
        )
    }

    fn split_draft(completion: &str) -> Result<CopyDraft, CopyError> {
        let mut lines = completion.trim().splitn(2, '\n');
        let headline = lines
            .next()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or_else(|| CopyError::Malformed("empty completion".to_string()))?;
        let body = lines.next().map(str::trim).unwrap_or("").to_string();

        Ok(CopyDraft {
            headline: headline.to_string(),
            body,
        })
    }
}

#[async_trait]
impl CopyGenerator for OpenAiCopywriter {
    async fn generate(&self, request: CopyRequest) -> Result<CopyDraft, CopyError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let payload = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Self::build_prompt(&request),
            }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|e| CopyError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, error = %body, "copy completion request failed");
            return Err(CopyError::Unavailable(format!("{status}: {body}")));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| CopyError::Malformed(e.to_string()))?;

        let content = completion
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| CopyError::Malformed("no choices in completion".to_string()))?;

        Self::split_draft(content)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
