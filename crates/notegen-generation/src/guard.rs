//! Single-flight concurrency guard
//!
//! At most one full-document generation may be in flight. Acquisition is
//! non-blocking: a second request is rejected immediately, never queued,
//! because two insertions racing for the same cursor are unsafe. The guard
//! carries the originating cursor position so the host can draw a busy
//! indicator there; the mark is set on acquire and cleared on release.
//!
//! Release is a scoped resource: the returned [`GuardSlot`] releases on
//! drop, so every exit path (success, failure, panic) ends with the guard
//! free.

use std::sync::Arc;

use parking_lot::Mutex;
use notegen_core::Position;
use tracing::debug;

#[derive(Default)]
struct GuardState {
    in_flight: bool,
    cursor_mark: Option<Position>,
}

/// Process-wide single-flight state for full-document generations.
#[derive(Default)]
pub struct ConcurrencyGuard {
    state: Mutex<GuardState>,
}

impl ConcurrencyGuard {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Try to take the guard. Returns `None` immediately if a generation is
    /// already in flight. `cursor` is where the busy indicator renders.
    pub fn try_acquire(self: &Arc<Self>, cursor: Option<Position>) -> Option<GuardSlot> {
        let mut state = self.state.lock();
        if state.in_flight {
            return None;
        }
        state.in_flight = true;
        state.cursor_mark = cursor;
        debug!("generation guard acquired");
        Some(GuardSlot {
            guard: Arc::clone(self),
        })
    }

    /// Whether a generation is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.state.lock().in_flight
    }

    /// Position of the busy indicator, when one is showing.
    pub fn cursor_mark(&self) -> Option<Position> {
        self.state.lock().cursor_mark
    }

    /// Idempotent: releasing a free guard is a no-op.
    fn release(&self) {
        let mut state = self.state.lock();
        if state.in_flight {
            debug!("generation guard released");
        }
        state.in_flight = false;
        state.cursor_mark = None;
    }
}

/// Held while a generation is in flight; releases the guard when dropped.
pub struct GuardSlot {
    guard: Arc<ConcurrencyGuard>,
}

impl GuardSlot {
    /// Release explicitly. Dropping has the same effect.
    pub fn release(self) {}
}

impl Drop for GuardSlot {
    fn drop(&mut self) {
        self.guard.release();
    }
}
