//! Interrupt/signal handling for graceful shutdown
//!
//! Ctrl+C is delivered as an event rather than a process exit: the handler
//! raises an [`Interrupt`], and the transfer loop picks it up alongside the
//! response stream so the terminal can be restored before anything exits.

use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Process-wide interrupt raised by the Ctrl+C handler
static INTERRUPT: Lazy<Interrupt> = Lazy::new(Interrupt::new);

/// A cloneable, raise-once interrupt event
///
/// Can be raised from any thread (signal handler, key watcher) and awaited
/// from the async transfer loop.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    inner: Arc<InterruptInner>,
}

#[derive(Debug, Default)]
struct InterruptInner {
    raised: AtomicBool,
    notify: Notify,
}

impl Interrupt {
    /// Create a fresh, unraised interrupt
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the interrupt and wake whoever is waiting on it
    pub fn raise(&self) {
        self.inner.raised.store(true, Ordering::SeqCst);
        self.inner.notify.notify_one();
    }

    /// Check whether the interrupt has been raised
    #[inline]
    pub fn is_raised(&self) -> bool {
        self.inner.raised.load(Ordering::SeqCst)
    }

    /// Wait until the interrupt is raised
    ///
    /// Resolves immediately if it already was.
    pub async fn raised(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_raised() {
                return;
            }
            notified.await;
            if self.is_raised() {
                return;
            }
        }
    }
}

/// The process-wide interrupt wired to Ctrl+C
pub fn global() -> &'static Interrupt {
    &INTERRUPT
}

/// Set the interrupted flag (called from signal handler)
#[inline]
pub fn set_interrupted() {
    INTERRUPT.raise();
}
