//! # Terminal Adapter
//!
//! The crossterm-specific layer: raw-mode keystroke reading and colored
//! output. This is the only module that knows about crossterm.

pub mod console;
pub mod event;

pub use console::TerminalConsole;
pub use event::{CrosstermTerminal, InputDecoder, RawModeGuard, TerminalMode};
