use std::io::{self, ErrorKind, Read};

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::{debug, error, trace};

use crate::core::keys::{EventSource, InputError, KeyDecoder, NavigationEvent};

/// Switches the controlling terminal between its saved mode and raw mode.
pub trait TerminalMode {
    fn enable_raw(&mut self) -> io::Result<()>;
    fn restore(&mut self) -> io::Result<()>;
}

/// The real terminal. crossterm saves the original termios on enable and
/// puts it back on disable.
#[derive(Debug, Default)]
pub struct CrosstermTerminal;

impl TerminalMode for CrosstermTerminal {
    fn enable_raw(&mut self) -> io::Result<()> {
        enable_raw_mode()
    }

    fn restore(&mut self) -> io::Result<()> {
        disable_raw_mode()
    }
}

/// Holds raw mode for the duration of one read. The saved mode is restored
/// exactly once: by `release` on the normal path, by `Drop` otherwise.
pub struct RawModeGuard<'a, T: TerminalMode> {
    terminal: &'a mut T,
    restored: bool,
}

impl<'a, T: TerminalMode> RawModeGuard<'a, T> {
    pub fn acquire(terminal: &'a mut T) -> Result<Self, InputError> {
        terminal.enable_raw().map_err(InputError::TerminalMode)?;
        trace!("raw mode acquired");
        Ok(Self {
            terminal,
            restored: false,
        })
    }

    pub fn release(mut self) -> Result<(), InputError> {
        self.restored = true;
        trace!("raw mode released");
        self.terminal.restore().map_err(InputError::TerminalMode)
    }
}

impl<T: TerminalMode> Drop for RawModeGuard<'_, T> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        if let Err(e) = self.terminal.restore() {
            error!("Failed to restore terminal mode: {}", e);
        }
    }
}

/// Blocking keystroke reader over a byte source.
pub struct InputDecoder<R: Read, T: TerminalMode> {
    reader: R,
    terminal: T,
    decoder: KeyDecoder,
}

impl InputDecoder<io::Stdin, CrosstermTerminal> {
    pub fn stdin() -> Self {
        Self::new(io::stdin(), CrosstermTerminal)
    }
}

impl<R: Read, T: TerminalMode> InputDecoder<R, T> {
    pub fn new(reader: R, terminal: T) -> Self {
        Self {
            reader,
            terminal,
            decoder: KeyDecoder::new(),
        }
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    /// Reads bytes in raw mode until `stop` produces an event.
    fn read_until<F>(&mut self, mut stop: F) -> Result<NavigationEvent, InputError>
    where
        F: FnMut(&KeyDecoder, Option<NavigationEvent>) -> Option<NavigationEvent>,
    {
        let guard = RawModeGuard::acquire(&mut self.terminal)?;
        let result = read_event(&mut self.reader, &mut self.decoder, &mut stop);
        match result {
            Ok(event) => {
                guard.release()?;
                Ok(event)
            }
            // Guard drops here and restores the terminal.
            Err(e) => Err(e),
        }
    }
}

fn read_event<R, F>(
    reader: &mut R,
    decoder: &mut KeyDecoder,
    stop: &mut F,
) -> Result<NavigationEvent, InputError>
where
    R: Read,
    F: FnMut(&KeyDecoder, Option<NavigationEvent>) -> Option<NavigationEvent>,
{
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => {
                debug!("Input closed, treating as exit");
                decoder.reset();
                return Ok(NavigationEvent::Exit);
            }
            Ok(_) => {
                trace!("Input byte: {:#04x}", byte[0]);
                let decoded = decoder.feed(byte[0]);
                if let Some(event) = stop(decoder, decoded) {
                    debug!("Key event: {}", event);
                    return Ok(event);
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                decoder.reset();
                return Err(InputError::Read(e));
            }
        }
    }
}

impl<R: Read, T: TerminalMode> EventSource for InputDecoder<R, T> {
    fn next_event(&mut self) -> Result<NavigationEvent, InputError> {
        self.read_until(|_, decoded| decoded)
    }

    fn next_key(&mut self) -> Result<NavigationEvent, InputError> {
        self.read_until(|decoder, decoded| match decoded {
            Some(event) => Some(event),
            // A complete key went by without forming a navigation sequence.
            None if decoder.is_idle() => Some(NavigationEvent::Unrecognized),
            None => None,
        })
    }
}
