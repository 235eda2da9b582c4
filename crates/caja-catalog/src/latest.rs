//! # Debounce and Latest-Only Guards
//!
//! Type-ahead requests overlap: the cashier keeps typing while earlier
//! requests are still in flight. Every request is tagged with a
//! [`Ticket`]; when its response arrives it is applied only if no newer
//! ticket has been issued since. Nothing is aborted, stale results are
//! simply dropped.
//!
//! ## Timeline
//! ```text
//! keystroke  "7"      "78"     "784"
//!             │        │        │
//! ticket      #1       #2       #3
//!             │        │        │
//! debounce    ├─300ms─►✗        │         #1 superseded before it fired
//!                      ├─300ms─►✗         #2 superseded before it fired
//!                               ├─300ms──► GET ──► #3 still latest ──► apply
//! ```
//!
//! A response for #3 arriving after ticket #4 was issued is discarded the
//! same way.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Latest-Only Sequencer
// =============================================================================

/// Issues monotonically increasing tickets; only the newest is current.
#[derive(Debug, Clone, Default)]
pub struct LatestOnly {
    latest: Arc<AtomicU64>,
}

/// Sequence number of one request.
#[derive(Debug, Clone)]
pub struct Ticket {
    seq: u64,
    latest: Arc<AtomicU64>,
}

impl LatestOnly {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new ticket, superseding every earlier one.
    pub fn issue(&self) -> Ticket {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket {
            seq,
            latest: Arc::clone(&self.latest),
        }
    }

    /// Supersedes every outstanding ticket without starting a request.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Checks that no newer ticket was issued.
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.seq
    }

    /// Passes `value` through only while this ticket is current.
    pub fn accept<T>(&self, value: T) -> Option<T> {
        self.is_current().then_some(value)
    }
}

// =============================================================================
// Debouncer
// =============================================================================

/// Waits out a quiet period, then runs the request if it is still the
/// latest one.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    sequencer: LatestOnly,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            sequencer: LatestOnly::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Drops whatever is pending, e.g. when the input is cleared.
    pub fn cancel(&self) {
        self.sequencer.invalidate();
    }

    /// Debounces `request`.
    ///
    /// Returns `None` when a newer call superseded this one, either during
    /// the quiet period (no request is made) or while the request was in
    /// flight (its result is dropped).
    pub async fn run<F, Fut, T>(&self, request: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let ticket = self.sequencer.issue();
        tokio::time::sleep(self.delay).await;

        if !ticket.is_current() {
            return None;
        }

        let result = request().await;
        ticket.accept(result)
    }
}
