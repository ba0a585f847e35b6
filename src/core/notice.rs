//! # Notices
//!
//! Everything the acquisition loop shows the user is a `Notice`. How it looks
//! on screen is up to the [`Console`] implementation (see `term::console`).

use crate::inference::QuoteError;

#[derive(Debug)]
pub enum Notice<'a> {
    Welcome,
    Loading,
    Quote(&'a str),
    Saved(i64),
    Discarded,
    FetchFailed(&'a QuoteError),
    StoreFailed(String),
    RetryPrompt,
    Goodbye,
}

pub trait Console {
    fn show(&mut self, notice: Notice<'_>);
}
