//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::keys::{EventSource, InputError, NavigationEvent};
use crate::core::notice::{Console, Notice};
use crate::core::store::{AcceptedQuote, QuoteStore, StoreError};
use crate::inference::{QuoteBackend, QuoteError, QuoteRequest};

/// Backend that replays canned results and records every request.
/// Once the script runs out it keeps failing with a transport error.
pub struct ScriptedBackend {
    results: VecDeque<Result<String, QuoteError>>,
    requests: Arc<Mutex<Vec<QuoteRequest>>>,
}

impl ScriptedBackend {
    pub fn new(results: Vec<Result<String, QuoteError>>) -> Self {
        Self {
            results: results.into(),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Arc<Mutex<Vec<QuoteRequest>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl QuoteBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "test-model"
    }

    async fn fetch(&mut self, request: &QuoteRequest) -> Result<String, QuoteError> {
        self.requests.lock().unwrap().push(request.clone());
        self.results
            .pop_front()
            .unwrap_or_else(|| Err(QuoteError::Transport("script exhausted".to_string())))
    }
}

/// Event source fed from a list. Yields `Exit` when the list runs out.
pub struct ScriptedInput {
    events: VecDeque<NavigationEvent>,
    calls: Arc<Mutex<Vec<&'static str>>>,
    fail_terminal: bool,
}

impl ScriptedInput {
    pub fn new(events: Vec<NavigationEvent>) -> Self {
        Self {
            events: events.into(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_terminal: false,
        }
    }

    /// Every read fails as if the terminal mode could not be restored.
    pub fn failing_terminal() -> Self {
        Self {
            fail_terminal: true,
            ..Self::new(Vec::new())
        }
    }

    /// Names of the methods called so far, in order.
    pub fn calls(&self) -> Arc<Mutex<Vec<&'static str>>> {
        Arc::clone(&self.calls)
    }

    fn next(&mut self, call: &'static str) -> Result<NavigationEvent, InputError> {
        self.calls.lock().unwrap().push(call);
        if self.fail_terminal {
            return Err(InputError::TerminalMode(io::Error::other("tcsetattr failed")));
        }
        Ok(self.events.pop_front().unwrap_or(NavigationEvent::Exit))
    }
}

impl EventSource for ScriptedInput {
    fn next_event(&mut self) -> Result<NavigationEvent, InputError> {
        self.next("next_event")
    }

    fn next_key(&mut self) -> Result<NavigationEvent, InputError> {
        self.next("next_key")
    }
}

/// In-memory store that records appends, or fails every one of them.
#[derive(Default)]
pub struct RecordingStore {
    appended: Vec<String>,
    attempts: usize,
    fail: bool,
}

impl RecordingStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn appended(&self) -> Vec<String> {
        self.appended.clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl QuoteStore for RecordingStore {
    fn append(&mut self, quote: &AcceptedQuote) -> Result<i64, StoreError> {
        self.attempts += 1;
        if self.fail {
            return Err(StoreError::Database(rusqlite::Error::InvalidQuery));
        }
        self.appended.push(quote.text.clone());
        Ok(self.appended.len() as i64)
    }
}

/// Console that keeps a short description of every notice.
#[derive(Default)]
pub struct RecordingConsole {
    lines: Vec<String>,
}

impl RecordingConsole {
    pub fn lines(&self) -> Vec<String> {
        self.lines.clone()
    }
}

impl Console for RecordingConsole {
    fn show(&mut self, notice: Notice<'_>) {
        let line = match notice {
            Notice::Welcome => "welcome".to_string(),
            Notice::Loading => "loading".to_string(),
            Notice::Quote(text) => format!("quote: {text}"),
            Notice::Saved(id) => format!("saved: {id}"),
            Notice::Discarded => "discarded".to_string(),
            Notice::FetchFailed(e) => format!("fetch failed: {e}"),
            Notice::StoreFailed(e) => format!("store failed: {e}"),
            Notice::RetryPrompt => "retry prompt".to_string(),
            Notice::Goodbye => "goodbye".to_string(),
        };
        self.lines.push(line);
    }
}
