//! # Key Decoding
//!
//! Turns the raw byte stream of an unbuffered terminal into navigation events.
//!
//! ```text
//!            0x1B              0x5B             A/B/C/D
//!   Idle ───────────▶ SawEscape ──────▶ SawEscapeBracket ──────▶ Up/Down/Right/Left
//!    ▲                    │                    │
//!    └──── other byte ────┴──── other byte ────┘
//!
//!   0x03 (Ctrl+C) from any state ──▶ Exit
//! ```
//!
//! A bare ESC press looks exactly like the start of an arrow sequence, so the
//! decoder keeps waiting after it. Nothing here touches the terminal; the
//! blocking reader lives in `term::event`.

use std::fmt;

use thiserror::Error;

const CTRL_C: u8 = 0x03;
const ESC: u8 = 0x1B;
const BRACKET: u8 = 0x5B;

/// Longest sequence the decoder will buffer before giving up on it.
const MAX_PENDING: usize = 3;

/// What the user asked for with a single keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEvent {
    Up,
    Down,
    Left,
    Right,
    Exit,
    Unrecognized,
}

impl fmt::Display for NavigationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NavigationEvent::Up => "up",
            NavigationEvent::Down => "down",
            NavigationEvent::Left => "left",
            NavigationEvent::Right => "right",
            NavigationEvent::Exit => "exit",
            NavigationEvent::Unrecognized => "unrecognized",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeState {
    #[default]
    Idle,
    SawEscape,
    SawEscapeBracket,
}

/// Byte-at-a-time escape sequence decoder.
#[derive(Debug, Default)]
pub struct KeyDecoder {
    state: DecodeState,
    pending: Vec<u8>,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DecodeState {
        self.state
    }

    /// Bytes buffered for the sequence currently being decoded.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    pub fn is_idle(&self) -> bool {
        self.state == DecodeState::Idle && self.pending.is_empty()
    }

    /// Feeds one byte. Returns an event once a complete sequence is recognized.
    pub fn feed(&mut self, byte: u8) -> Option<NavigationEvent> {
        if byte == CTRL_C {
            self.reset();
            return Some(NavigationEvent::Exit);
        }

        match self.state {
            DecodeState::Idle => {
                if byte == ESC {
                    self.pending.push(byte);
                    self.state = DecodeState::SawEscape;
                }
                // Plain keys are not navigation.
                None
            }
            DecodeState::SawEscape => {
                if byte == BRACKET {
                    self.pending.push(byte);
                    self.state = DecodeState::SawEscapeBracket;
                } else {
                    self.reset();
                }
                None
            }
            DecodeState::SawEscapeBracket => {
                self.pending.push(byte);
                let event = match byte {
                    0x41 => Some(NavigationEvent::Up),
                    0x42 => Some(NavigationEvent::Down),
                    0x43 => Some(NavigationEvent::Right),
                    0x44 => Some(NavigationEvent::Left),
                    _ => None,
                };
                if event.is_some() || self.pending.len() >= MAX_PENDING {
                    self.reset();
                }
                event
            }
        }
    }

    pub fn reset(&mut self) {
        self.state = DecodeState::Idle;
        self.pending.clear();
    }
}

#[derive(Debug, Error)]
pub enum InputError {
    /// The terminal could not be switched into or out of raw mode.
    #[error("terminal mode error: {0}")]
    TerminalMode(#[source] std::io::Error),
    #[error("failed to read from terminal: {0}")]
    Read(#[source] std::io::Error),
}

/// Source of navigation events for the acquisition loop.
pub trait EventSource {
    /// Blocks until an arrow key or Ctrl+C arrives.
    fn next_event(&mut self) -> Result<NavigationEvent, InputError>;

    /// Blocks until any key arrives. Ctrl+C yields `Exit`, arrows yield their
    /// event, every other key yields `Unrecognized`.
    fn next_key(&mut self) -> Result<NavigationEvent, InputError>;
}
