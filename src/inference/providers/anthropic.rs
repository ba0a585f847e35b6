//! Anthropic provider implementation using the Messages API.
//!
//! Each fetch adds a random [`Embellishment`] to the built prompt. With
//! `remember_conversation` the backend also replays every earlier prompt and
//! reply, so the model sees the whole dialogue:
//!
//! ```text
//! messages: [user p1, assistant q1, user p2, assistant q2, ..., user pN]
//! ```
//!
//! That history lives only in this struct and grows for the process lifetime.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::prompt::{Embellishment, PromptBuilder};
use crate::inference::types::{ChatMessage, log_rate_limits};
use crate::inference::{QuoteBackend, QuoteError, QuoteRequest, clean_quote};

pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_ANTHROPIC_MAX_TOKENS: u32 = 100;
const ANTHROPIC_VERSION: &str = "2023-06-01";

// ============================================================================
// Messages API Types
// ============================================================================

#[derive(Serialize, Debug)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize, Debug)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize, Debug)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

/// Pulls the first text block out of a response body.
fn extract_quote(body: &str) -> Result<String, QuoteError> {
    let response: MessagesResponse =
        serde_json::from_str(body).map_err(|e| QuoteError::Decode(e.to_string()))?;
    let text = response
        .content
        .into_iter()
        .find(|block| block.block_type == "text")
        .and_then(|block| block.text)
        .ok_or(QuoteError::EmptyResponse)?;
    let quote = clean_quote(&text);
    if quote.is_empty() {
        return Err(QuoteError::EmptyResponse);
    }
    Ok(quote)
}

// ============================================================================
// Provider Implementation
// ============================================================================

pub struct AnthropicBackend {
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    prompts: PromptBuilder,
    remember_conversation: bool,
    conversation: Vec<ChatMessage>,
    client: reqwest::Client,
}

impl AnthropicBackend {
    pub fn new(api_key: String, base_url: Option<String>, prompts: PromptBuilder) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_ANTHROPIC_BASE_URL.to_string()),
            model: DEFAULT_ANTHROPIC_MODEL.to_string(),
            max_tokens: DEFAULT_ANTHROPIC_MAX_TOKENS,
            prompts,
            remember_conversation: false,
            conversation: Vec::new(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Replays earlier prompts and replies on every request.
    pub fn remembering_conversation(mut self, remember: bool) -> Self {
        self.remember_conversation = remember;
        self
    }

    /// Prompts and replies kept so far (empty unless remembering).
    pub fn conversation(&self) -> &[ChatMessage] {
        &self.conversation
    }

    fn messages_for(&self, prompt: &str) -> Vec<ChatMessage> {
        let mut messages = if self.remember_conversation {
            self.conversation.clone()
        } else {
            Vec::new()
        };
        messages.push(ChatMessage::user(prompt));
        messages
    }
}

#[async_trait]
impl QuoteBackend for AnthropicBackend {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn fetch(&mut self, request: &QuoteRequest) -> Result<String, QuoteError> {
        let base = self
            .prompts
            .build(request.theme.as_deref(), &request.liked_history);
        let embellishment = Embellishment::random(&mut rand::thread_rng());
        let prompt = embellishment.apply(&base);
        if request.verbose {
            info!("Prompt used: {}", prompt);
        } else {
            debug!("Prompt used: {}", prompt);
        }

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: self.messages_for(&prompt),
        };

        info!(
            "Anthropic request: model={}, messages={}, inspiration={}, letter={}",
            self.model,
            body.messages.len(),
            embellishment.inspiration,
            embellishment.letter
        );

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| QuoteError::Transport(e.to_string()))?;

        let status = response.status();
        debug!("Anthropic response status: {}", status);
        log_rate_limits(self.name(), response.headers(), request.verbose);

        let text = response
            .text()
            .await
            .map_err(|e| QuoteError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!("Anthropic API error: {} - {}", status.as_u16(), text);
            return Err(QuoteError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        debug!("Anthropic response body: {}", text);
        let quote = extract_quote(&text)?;
        info!("Retrieved quote: {}", quote);

        if self.remember_conversation {
            self.conversation.push(ChatMessage::user(prompt));
            self.conversation.push(ChatMessage::assistant(quote.clone()));
        }

        Ok(quote)
    }
}
