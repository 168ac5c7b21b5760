//! Terminal mode control for the progress bar
//!
//! While the bar is up the terminal is put in raw input mode with the cursor
//! hidden. Raw mode also stops the terminal from turning Ctrl+C into SIGINT,
//! so a key watcher thread reads key events and raises the interrupt itself.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossterm::cursor;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::signals::Interrupt;

/// Set while some `CrosstermTerminal` holds the terminal in raw mode
static RAW_ACTIVE: AtomicBool = AtomicBool::new(false);

/// How often the key watcher wakes up to see if it should exit
const KEY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Enter/leave the interactive terminal mode used while a bar is shown
pub trait TerminalMode: Send {
    /// Enter raw input mode and hide the cursor
    fn enter(&mut self) -> io::Result<()>;

    /// Return to the previous input mode and show the cursor
    fn restore(&mut self) -> io::Result<()>;
}

/// Real terminal backend on stderr
pub struct CrosstermTerminal {
    interrupt: Interrupt,
    watcher: Option<KeyWatcher>,
}

impl CrosstermTerminal {
    pub fn new(interrupt: Interrupt) -> Self {
        Self {
            interrupt,
            watcher: None,
        }
    }
}

impl TerminalMode for CrosstermTerminal {
    fn enter(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        RAW_ACTIVE.store(true, Ordering::SeqCst);
        crossterm::execute!(io::stderr(), cursor::Hide)?;
        self.watcher = Some(KeyWatcher::spawn(self.interrupt.clone()));
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        if let Some(watcher) = self.watcher.take() {
            watcher.stop();
        }
        let raw = disable_raw_mode();
        RAW_ACTIVE.store(false, Ordering::SeqCst);
        let shown = crossterm::execute!(io::stderr(), cursor::Show);
        raw.and(shown)
    }
}

/// Best-effort terminal restore for forced exits
///
/// Used by the Ctrl+C handler when the process is about to exit without
/// unwinding. Does nothing unless a bar currently holds the terminal.
pub fn force_restore() {
    if RAW_ACTIVE.swap(false, Ordering::SeqCst) {
        let _ = disable_raw_mode();
        let mut stderr = io::stderr();
        let _ = crossterm::execute!(stderr, cursor::Show);
        let _ = stderr.flush();
    }
}

/// Background thread turning Ctrl+C key presses into interrupts
struct KeyWatcher {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl KeyWatcher {
    fn spawn(interrupt: Interrupt) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();

        let handle = std::thread::spawn(move || {
            while flag.load(Ordering::SeqCst) {
                match event::poll(KEY_POLL_INTERVAL) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(_) => break,
                }
                match event::read() {
                    Ok(Event::Key(key)) if is_interrupt_key(&key) => {
                        interrupt.raise();
                        break;
                    }
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    fn stop(mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Ctrl+C or Ctrl+D
fn is_interrupt_key(key: &KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('d'))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    /// Counts of terminal transitions seen by a [`RecordingTerminal`]
    #[derive(Debug, Default)]
    pub struct TerminalLog {
        pub entered: AtomicUsize,
        pub restored: AtomicUsize,
        /// Currently in raw mode
        pub raw: AtomicBool,
    }

    impl TerminalLog {
        pub fn entered(&self) -> usize {
            self.entered.load(Ordering::SeqCst)
        }

        pub fn restored(&self) -> usize {
            self.restored.load(Ordering::SeqCst)
        }

        pub fn is_raw(&self) -> bool {
            self.raw.load(Ordering::SeqCst)
        }
    }

    /// Terminal backend that only records what it was asked to do
    #[derive(Debug, Default, Clone)]
    pub struct RecordingTerminal {
        pub log: Arc<TerminalLog>,
        pub fail_enter: bool,
    }

    impl TerminalMode for RecordingTerminal {
        fn enter(&mut self) -> io::Result<()> {
            if self.fail_enter {
                return Err(io::Error::new(io::ErrorKind::Unsupported, "not a terminal"));
            }
            self.log.entered.fetch_add(1, Ordering::SeqCst);
            self.log.raw.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn restore(&mut self) -> io::Result<()> {
            self.log.restored.fetch_add(1, Ordering::SeqCst);
            self.log.raw.store(false, Ordering::SeqCst);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_keys() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let ctrl_d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        let plain_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        let ctrl_x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);

        assert!(is_interrupt_key(&ctrl_c));
        assert!(is_interrupt_key(&ctrl_d));
        assert!(!is_interrupt_key(&plain_c));
        assert!(!is_interrupt_key(&ctrl_x));
    }

    #[test]
    fn test_force_restore_without_raw_mode_is_noop() {
        // Nothing entered raw mode in this test binary
        RAW_ACTIVE.store(false, Ordering::SeqCst);
        force_restore();
        assert!(!RAW_ACTIVE.load(Ordering::SeqCst));
    }
}
