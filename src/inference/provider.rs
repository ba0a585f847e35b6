use async_trait::async_trait;
use thiserror::Error;

/// Everything a backend needs to generate one quote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteRequest {
    pub theme: Option<String>,
    /// Quotes the user accepted so far, oldest first.
    pub liked_history: Vec<String>,
    pub verbose: bool,
}

/// Errors that can occur while fetching a quote.
/// Only `Configuration` is fatal; the rest are shown and retried.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Backend misconfigured (missing API key, bad URL).
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Network-level failure (DNS, connection refused, reset).
    #[error("network error: {0}")]
    Transport(String),
    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// 2xx response without a usable candidate.
    #[error("response contained no quote")]
    EmptyResponse,
    /// 2xx response whose body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl QuoteError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, QuoteError::Configuration(_))
    }
}

#[async_trait]
pub trait QuoteBackend: Send {
    /// Returns the name of the backend.
    fn name(&self) -> &str;

    /// Returns the model identifier sent with every request.
    fn model(&self) -> &str;

    /// Issues one generation request and returns the cleaned quote.
    async fn fetch(&mut self, request: &QuoteRequest) -> Result<String, QuoteError>;
}

/// Trims whitespace and one layer of enclosing double quotes.
pub fn clean_quote(raw: &str) -> String {
    let trimmed = raw.trim();
    let unwrapped = [('"', '"'), ('“', '”')].iter().find_map(|(open, close)| {
        trimmed
            .strip_prefix(*open)
            .and_then(|rest| rest.strip_suffix(*close))
    });
    unwrapped.unwrap_or(trimmed).trim().to_string()
}

/// Fails with a configuration error unless the key holds something.
pub(crate) fn require_api_key(key: Option<&str>, var: &str) -> Result<String, QuoteError> {
    match key.map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => Err(QuoteError::Configuration(format!("{var} not set"))),
    }
}
