//! OpenAI provider implementation using the Chat Completions API.
//!
//! Stateless: every fetch sends a single user message.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::prompt::PromptBuilder;
use crate::inference::types::{ChatMessage, log_rate_limits};
use crate::inference::{QuoteBackend, QuoteError, QuoteRequest, clean_quote};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";

// ============================================================================
// Chat Completions API Types
// ============================================================================

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Pulls the first candidate's text out of a response body.
fn extract_quote(body: &str) -> Result<String, QuoteError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| QuoteError::Decode(e.to_string()))?;
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(QuoteError::EmptyResponse)?;
    let quote = clean_quote(&content);
    if quote.is_empty() {
        return Err(QuoteError::EmptyResponse);
    }
    Ok(quote)
}

// ============================================================================
// Provider Implementation
// ============================================================================

pub struct OpenAiBackend {
    api_key: String,
    base_url: String,
    model: String,
    prompts: PromptBuilder,
    client: reqwest::Client,
}

impl OpenAiBackend {
    /// Creates a new OpenAI backend.
    ///
    /// # Arguments
    /// * `api_key` - OpenAI API key
    /// * `base_url` - Optional custom base URL (defaults to OpenAI's API)
    /// * `model` - Optional model name (defaults to `gpt-4`)
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        model: Option<String>,
        prompts: PromptBuilder,
    ) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            prompts,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl QuoteBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn fetch(&mut self, request: &QuoteRequest) -> Result<String, QuoteError> {
        let prompt = self
            .prompts
            .build(request.theme.as_deref(), &request.liked_history);
        if request.verbose {
            info!("Prompt used: {}", prompt);
        } else {
            debug!("Prompt used: {}", prompt);
        }

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage::user(prompt)],
        };

        info!(
            "OpenAI request: model={}, liked={}",
            self.model,
            request.liked_history.len()
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| QuoteError::Transport(e.to_string()))?;

        let status = response.status();
        debug!("OpenAI response status: {}", status);
        log_rate_limits(self.name(), response.headers(), request.verbose);

        let text = response
            .text()
            .await
            .map_err(|e| QuoteError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!("OpenAI API error: {} - {}", status.as_u16(), text);
            return Err(QuoteError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        debug!("OpenAI response body: {}", text);
        let quote = extract_quote(&text)?;
        info!("Retrieved quote: {}", quote);
        Ok(quote)
    }
}
