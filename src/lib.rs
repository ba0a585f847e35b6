//! Quotes library exports for testing

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod core;
pub mod inference;
pub mod term;

#[cfg(test)]
pub mod test_support;

/// Which text-generation service to ask for quotes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    #[value(name = "openai")]
    OpenAi,
    Anthropic,
}
