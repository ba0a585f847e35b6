//! # Acquisition Loop
//!
//! Fetch a quote, show it, let the user keep or drop it, repeat.
//!
//! ```text
//!                 Ok(text)                      Right: append → history
//!   ┌──────────┐ ─────────▶ ┌──────────────────┐ ──────────────────────┐
//!   │ Fetching │            │ AwaitingDecision │  Left: discard        │
//!   └──────────┘ ◀───────── └──────────────────┘ ──────────────────────┤
//!     │   ▲   Err: show, any key                 │ Exit                │
//!     │   └──────────────────────────────────────┼─────────────────────┘
//!     │ Ctrl+C at retry prompt                   ▼
//!     └────────────────────────────────▶ ┌────────────┐
//!                                        │ Terminated │
//!                                        └────────────┘
//! ```
//!
//! Strictly sequential: one fetch at a time, input is never read while a
//! fetch is outstanding, and a quote reaches `SessionHistory` only after
//! the store confirmed the write. There is no timeout on fetches and no
//! limit on retries.

use log::{debug, error, info, warn};
use thiserror::Error;

use crate::core::history::SessionHistory;
use crate::core::keys::{EventSource, InputError, NavigationEvent};
use crate::core::notice::{Console, Notice};
use crate::core::store::{AcceptedQuote, QuoteStore};
use crate::inference::{QuoteBackend, QuoteError, QuoteRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopState {
    Fetching,
    /// A quote is on screen, waiting for the user.
    AwaitingDecision(String),
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    UserExit,
}

/// Failures that end the session.
#[derive(Debug, Error)]
pub enum LoopError {
    #[error(transparent)]
    Backend(QuoteError),
    #[error(transparent)]
    Input(#[from] InputError),
}

/// Per-session settings taken from the command line and config.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub theme: Option<String>,
    pub verbose: bool,
    /// Up, Down and unknown keys end the session instead of being ignored.
    pub exit_on_unmapped_key: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            theme: None,
            verbose: false,
            exit_on_unmapped_key: true,
        }
    }
}

pub struct AcquisitionLoop<S: QuoteStore, I: EventSource, C: Console> {
    backend: Box<dyn QuoteBackend>,
    store: S,
    input: I,
    console: C,
    options: SessionOptions,
    history: SessionHistory,
    state: LoopState,
}

impl<S: QuoteStore, I: EventSource, C: Console> AcquisitionLoop<S, I, C> {
    pub fn new(
        backend: Box<dyn QuoteBackend>,
        store: S,
        input: I,
        console: C,
        options: SessionOptions,
    ) -> Self {
        Self {
            backend,
            store,
            input,
            console,
            options,
            history: SessionHistory::new(),
            state: LoopState::Fetching,
        }
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    /// Runs until the user exits or a fatal error occurs.
    pub async fn run(&mut self) -> Result<ExitReason, LoopError> {
        self.console.show(Notice::Welcome);
        while self.state != LoopState::Terminated {
            self.step().await?;
        }
        info!("Session ended with {} saved quote(s)", self.history.len());
        self.console.show(Notice::Goodbye);
        Ok(ExitReason::UserExit)
    }

    /// Performs one state transition.
    pub async fn step(&mut self) -> Result<(), LoopError> {
        let current = std::mem::replace(&mut self.state, LoopState::Terminated);
        self.state = match current {
            LoopState::Fetching => self.fetch().await?,
            LoopState::AwaitingDecision(text) => self.decide(text)?,
            LoopState::Terminated => LoopState::Terminated,
        };
        debug!("Loop state: {:?}", self.state);
        Ok(())
    }

    async fn fetch(&mut self) -> Result<LoopState, LoopError> {
        self.console.show(Notice::Loading);
        let request = QuoteRequest {
            theme: self.options.theme.clone(),
            liked_history: self.history.items().to_vec(),
            verbose: self.options.verbose,
        };

        match self.backend.fetch(&request).await {
            Ok(text) => {
                self.console.show(Notice::Quote(&text));
                Ok(LoopState::AwaitingDecision(text))
            }
            Err(e) if e.is_fatal() => {
                error!("Fatal backend error: {}", e);
                Err(LoopError::Backend(e))
            }
            Err(e) => {
                warn!("Fetch from {} failed: {}", self.backend.name(), e);
                self.console.show(Notice::FetchFailed(&e));
                self.console.show(Notice::RetryPrompt);
                match self.input.next_key()? {
                    NavigationEvent::Exit => Ok(LoopState::Terminated),
                    _ => Ok(LoopState::Fetching),
                }
            }
        }
    }

    fn decide(&mut self, text: String) -> Result<LoopState, LoopError> {
        let next = match self.input.next_event()? {
            NavigationEvent::Left => {
                debug!("Discarded: {}", text);
                self.console.show(Notice::Discarded);
                LoopState::Fetching
            }
            NavigationEvent::Right => {
                self.accept(text);
                LoopState::Fetching
            }
            NavigationEvent::Exit => LoopState::Terminated,
            other if self.options.exit_on_unmapped_key => {
                info!("Unmapped key {} at decision, exiting", other);
                LoopState::Terminated
            }
            other => {
                debug!("Ignoring {} at decision", other);
                LoopState::AwaitingDecision(text)
            }
        };
        Ok(next)
    }

    fn accept(&mut self, text: String) {
        let quote = AcceptedQuote::now(text);
        match self.store.append(&quote) {
            Ok(id) => {
                info!("Saved quote {}: {}", id, quote.text);
                self.console.show(Notice::Saved(id));
                self.history.push(quote.text);
            }
            Err(e) => {
                error!("Failed to save quote: {}", e);
                self.console.show(Notice::StoreFailed(e.to_string()));
            }
        }
    }
}
