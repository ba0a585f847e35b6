use serde::{Deserialize, Serialize};

/// Speaker of a chat message. Both supported APIs use the same names.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Response headers worth surfacing when diagnosing rate limits.
pub const RATE_LIMIT_HEADERS: &[&str] = &[
    "x-ratelimit-limit-requests",
    "x-ratelimit-remaining-requests",
    "x-ratelimit-reset-requests",
    "anthropic-ratelimit-requests-limit",
    "anthropic-ratelimit-requests-remaining",
    "anthropic-ratelimit-requests-reset",
    "retry-after",
];

/// Logs the rate-limit headers present on a response. Verbose requests log
/// them at info level, others at debug.
pub fn log_rate_limits(backend: &str, headers: &reqwest::header::HeaderMap, verbose: bool) {
    let level = if verbose {
        log::Level::Info
    } else {
        log::Level::Debug
    };
    let mut found = false;
    for name in RATE_LIMIT_HEADERS {
        if let Some(value) = headers.get(*name).and_then(|v| v.to_str().ok()) {
            log::log!(level, "{} {}: {}", backend, name, value);
            found = true;
        }
    }
    if !found {
        log::log!(level, "{} sent no rate limit headers", backend);
    }
}
