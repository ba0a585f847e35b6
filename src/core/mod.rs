//! # Core Application Logic
//!
//! This module contains the quote acquisition logic.
//! It knows nothing about any specific terminal library.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • AcquisitionLoop      │
//!                    │  • KeyDecoder           │
//!                    │  • PromptBuilder        │
//!                    │  • QuoteStore           │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    term    │      │ inference  │      │   SQLite   │
//!     │ (crossterm)│      │ (reqwest)  │      │ (rusqlite) │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`acquisition`]: the fetch → decide → persist loop
//! - [`keys`]: raw bytes → `NavigationEvent`
//! - [`prompt`]: the instruction text sent to a backend
//! - [`history`]: quotes accepted this session
//! - [`store`]: durable storage of accepted quotes
//! - [`notice`]: everything the loop shows the user
//! - [`config`]: settings file, env vars and CLI flags

pub mod acquisition;
pub mod config;
pub mod history;
pub mod keys;
pub mod notice;
pub mod prompt;
pub mod store;
