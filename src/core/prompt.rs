//! # Prompt Construction
//!
//! Shapes the instruction text sent to a backend. `PromptBuilder::build` is a
//! pure function of its inputs; anything random (inspiration topic, starting
//! letter) is an [`Embellishment`] drawn by the backend at call time and
//! appended afterwards.

use rand::Rng;
use rand::seq::SliceRandom;

pub const DEFAULT_MAX_WORDS: u32 = 10;

/// Topics a backend may draw on to vary its output.
pub const INSPIRATIONS: &[&str] = &[
    "science",
    "philosophy",
    "nature",
    "history",
    "mythology",
    "technology",
    "art",
    "literature",
    "music",
    "psychology",
    "astronomy",
    "economics",
    "engineering",
    "spirituality",
    "sociology",
    "biology",
    "geography",
    "politics",
    "architecture",
    "medicine",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptBuilder {
    max_words: u32,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WORDS)
    }
}

impl PromptBuilder {
    pub fn new(max_words: u32) -> Self {
        Self { max_words }
    }

    pub fn max_words(&self) -> u32 {
        self.max_words
    }

    /// Builds the prompt for one request.
    ///
    /// `liked` is the session's accepted quotes in acceptance order; when
    /// non-empty they are listed verbatim so the backend can match their style.
    pub fn build(&self, theme: Option<&str>, liked: &[String]) -> String {
        let subject = match theme.map(str::trim) {
            Some(theme) if !theme.is_empty() => format!("embodies the themes of {theme}"),
            _ => "uses a random theme".to_string(),
        };

        let mut prompt = format!(
            "Provide a short, compelling quote that {subject}. \
             Keep it under {} words. \
             Express a single idea; do not combine concepts.",
            self.max_words
        );

        if !liked.is_empty() {
            prompt.push_str("\n\nThe user liked these previous quotes:\n");
            for (i, quote) in liked.iter().enumerate() {
                prompt.push_str(&format!("{}. \"{}\"\n", i + 1, quote));
            }
            prompt.push_str(
                "Write a new quote that is stylistically similar to the ones above \
                 but not identical to any of them.",
            );
        }

        prompt
    }
}

/// Per-call randomness a backend adds on top of the built prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embellishment {
    pub inspiration: &'static str,
    pub letter: char,
}

impl Embellishment {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let inspiration = INSPIRATIONS.choose(rng).copied().unwrap_or("nature");
        let letter = char::from(b'A' + rng.gen_range(0..26u8));
        Self {
            inspiration,
            letter,
        }
    }

    /// Appends the embellishment to a prompt built by [`PromptBuilder`].
    pub fn apply(&self, prompt: &str) -> String {
        format!(
            "{prompt}\n\nDraw inspiration from {}. \
             The first word of the quote should start with the letter {}.",
            self.inspiration, self.letter
        )
    }
}
