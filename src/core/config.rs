//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.quotes/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use clap::ValueEnum;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::BackendKind;
use crate::core::prompt::DEFAULT_MAX_WORDS;
use crate::inference::providers::anthropic::{
    DEFAULT_ANTHROPIC_BASE_URL, DEFAULT_ANTHROPIC_MAX_TOKENS, DEFAULT_ANTHROPIC_MODEL,
};
use crate::inference::providers::openai::{DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct QuotesConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub anthropic: AnthropicConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_backend: Option<BackendKind>,
    pub max_words: Option<u32>,
    pub database_path: Option<String>,
    pub exit_on_unmapped_key: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AnthropicConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub remember_conversation: Option<bool>,
}

pub const DEFAULT_DATABASE_PATH: &str = "quotes.db";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub backend: BackendKind,
    pub max_words: u32,
    pub database_path: PathBuf,
    pub exit_on_unmapped_key: bool,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_base_url: String,
    pub anthropic_model: String,
    pub anthropic_max_tokens: u32,
    pub remember_conversation: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.quotes/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".quotes").join("config.toml"))
}

/// Load config from `~/.quotes/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `QuotesConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<QuotesConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(QuotesConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<QuotesConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(QuotesConfig::default());
    }

    let contents = fs::read_to_string(path)?;
    let config: QuotesConfig = toml::from_str(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {}", redacted(&config));
    Ok(config)
}

/// Config as a debug string with API keys masked.
fn redacted(config: &QuotesConfig) -> String {
    let mask = |key: &Option<String>| key.as_ref().map(|_| "***");
    format!(
        "general={:?} openai(key={:?}, base_url={:?}, model={:?}) \
         anthropic(key={:?}, base_url={:?}, model={:?}, max_tokens={:?}, remember={:?})",
        config.general,
        mask(&config.openai.api_key),
        config.openai.base_url,
        config.openai.model,
        mask(&config.anthropic.api_key),
        config.anthropic.base_url,
        config.anthropic.model,
        config.anthropic.max_tokens,
        config.anthropic.remember_conversation,
    )
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Quotes Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_backend = "openai"         # "openai" or "anthropic"
# max_words = 10                     # word ceiling given to the model
# database_path = "quotes.db"        # Or set QUOTES_DB env var
# exit_on_unmapped_key = true        # Up/Down end the session when true

# [openai]
# api_key = "sk-..."                 # Or set OPENAI_API_KEY env var
# base_url = "https://api.openai.com/v1"
# model = "gpt-4"

# [anthropic]
# api_key = "sk-ant-..."             # Or set ANTHROPIC_API_KEY env var
# base_url = "https://api.anthropic.com/v1"
# model = "claude-3-haiku-20240307"
# max_tokens = 100
# remember_conversation = false      # replay earlier prompts and replies
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_backend` is the `--backend` flag (None = not specified).
pub fn resolve(config: &QuotesConfig, cli_backend: Option<BackendKind>) -> ResolvedConfig {
    resolve_with(config, cli_backend, |name| std::env::var(name).ok())
}

/// Same as [`resolve`] with an explicit environment lookup.
pub fn resolve_with<F>(config: &QuotesConfig, cli_backend: Option<BackendKind>, env: F) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    // Backend: CLI → env → config → default
    let backend = cli_backend
        .or_else(|| {
            env("QUOTES_BACKEND").and_then(|s| match BackendKind::from_str(&s, true) {
                Ok(kind) => Some(kind),
                Err(_) => {
                    warn!("Ignoring unknown QUOTES_BACKEND value: {}", s);
                    None
                }
            })
        })
        .or(config.general.default_backend)
        .unwrap_or_default();

    // Database: env → config → default
    let database_path = env("QUOTES_DB")
        .or_else(|| config.general.database_path.clone())
        .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());

    // API keys: env → config
    let openai_api_key = env("OPENAI_API_KEY").or_else(|| config.openai.api_key.clone());
    let anthropic_api_key = env("ANTHROPIC_API_KEY").or_else(|| config.anthropic.api_key.clone());

    // Base URLs: env → config → default
    let openai_base_url = env("OPENAI_BASE_URL")
        .or_else(|| config.openai.base_url.clone())
        .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());
    let anthropic_base_url = env("ANTHROPIC_BASE_URL")
        .or_else(|| config.anthropic.base_url.clone())
        .unwrap_or_else(|| DEFAULT_ANTHROPIC_BASE_URL.to_string());

    ResolvedConfig {
        backend,
        max_words: config.general.max_words.unwrap_or(DEFAULT_MAX_WORDS),
        database_path: PathBuf::from(database_path),
        exit_on_unmapped_key: config.general.exit_on_unmapped_key.unwrap_or(true),
        openai_api_key,
        openai_base_url,
        openai_model: config
            .openai
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
        anthropic_api_key,
        anthropic_base_url,
        anthropic_model: config
            .anthropic
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
        anthropic_max_tokens: config
            .anthropic
            .max_tokens
            .unwrap_or(DEFAULT_ANTHROPIC_MAX_TOKENS),
        remember_conversation: config.anthropic.remember_conversation.unwrap_or(false),
    }
}
