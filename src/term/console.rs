use std::io::{self, Write};

use crossterm::style::Stylize;
use log::warn;

use crate::core::notice::{Console, Notice};

/// Writes notices as colored status lines.
pub struct TerminalConsole<W: Write> {
    out: W,
}

impl TerminalConsole<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalConsole<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Plain-text line for a notice, before styling.
pub fn message(notice: &Notice<'_>) -> String {
    match notice {
        Notice::Welcome => {
            "✨ Welcome to Quotes! Press → to save, ← to discard. Ctrl+C to exit. ✨".to_string()
        }
        Notice::Loading => "🔄 Generating quote...".to_string(),
        Notice::Quote(text) => format!("\n  \"{text}\"\n"),
        Notice::Saved(id) => format!("✅ Quote saved with ID {id}!"),
        Notice::Discarded => "🗑  Discarded.".to_string(),
        Notice::FetchFailed(e) => format!("❌ Could not fetch a quote: {e}"),
        Notice::StoreFailed(e) => format!("❌ Could not save the quote: {e}"),
        Notice::RetryPrompt => "Press any key to retry, or Ctrl+C to exit.".to_string(),
        Notice::Goodbye => "👋 Goodbye! Come back for more wisdom! ✨".to_string(),
    }
}

impl<W: Write> Console for TerminalConsole<W> {
    fn show(&mut self, notice: Notice<'_>) {
        let text = message(&notice);
        let styled = match notice {
            Notice::Welcome => text.cyan(),
            Notice::Loading | Notice::RetryPrompt => text.yellow(),
            Notice::Quote(_) => text.white().bold(),
            Notice::Saved(_) => text.green(),
            Notice::Discarded => text.dark_grey(),
            Notice::FetchFailed(_) | Notice::StoreFailed(_) => text.red(),
            Notice::Goodbye => text.magenta(),
        };
        if let Err(e) = writeln!(self.out, "{styled}").and_then(|_| self.out.flush()) {
            warn!("Failed to write to console: {}", e);
        }
    }
}
