pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{QuoteBackend, QuoteError, QuoteRequest, clean_quote};
pub use providers::{AnthropicBackend, OpenAiBackend};
pub use types::{ChatMessage, Role};

use log::info;

use crate::BackendKind;
use crate::core::config::ResolvedConfig;
use crate::core::prompt::PromptBuilder;
use provider::require_api_key;

/// Build a backend from a resolved config's backend choice and credentials.
///
/// Fails before any network I/O when the selected backend has no API key.
pub fn build_backend(config: &ResolvedConfig) -> Result<Box<dyn QuoteBackend>, QuoteError> {
    let prompts = PromptBuilder::new(config.max_words);
    let backend: Box<dyn QuoteBackend> = match config.backend {
        BackendKind::OpenAi => {
            let api_key = require_api_key(config.openai_api_key.as_deref(), "OPENAI_API_KEY")?;
            Box::new(OpenAiBackend::new(
                api_key,
                Some(config.openai_base_url.clone()),
                Some(config.openai_model.clone()),
                prompts,
            ))
        }
        BackendKind::Anthropic => {
            let api_key =
                require_api_key(config.anthropic_api_key.as_deref(), "ANTHROPIC_API_KEY")?;
            Box::new(
                AnthropicBackend::new(api_key, Some(config.anthropic_base_url.clone()), prompts)
                    .with_model(config.anthropic_model.clone())
                    .with_max_tokens(config.anthropic_max_tokens)
                    .remembering_conversation(config.remember_conversation),
            )
        }
    };
    info!("Using backend {} with model {}", backend.name(), backend.model());
    Ok(backend)
}
