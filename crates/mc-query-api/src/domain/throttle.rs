//! Broadcast throttle: at most one notification pass in flight.
//!
//! Blocks can commit faster than slow subscribers take delivery. The
//! throttle admits the first batch immediately and merges everything
//! that arrives while that broadcast runs into a single queued batch,
//! so delivery load is bounded by subscriber speed instead of block
//! rate. Commit order is preserved because merging always appends the
//! newer batch onto the older one.

use parking_lot::Mutex;

use crate::domain::batch::BroadcastBatch;

#[derive(Debug)]
enum ThrottleState {
    /// No broadcast running; the next batch starts one.
    Idle,
    /// A broadcast is running; later batches merge into `queued`.
    Broadcasting { queued: Option<BroadcastBatch> },
    /// Shut down; all batches are dropped.
    Closed,
}

/// Admission control for broadcast passes.
#[derive(Debug)]
pub struct BroadcastThrottle {
    state: Mutex<ThrottleState>,
}

impl BroadcastThrottle {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ThrottleState::Idle),
        }
    }

    /// Offer a batch for broadcast.
    ///
    /// Returns `Some` when the caller should run a broadcast with the
    /// returned batch now, `None` when the batch was queued behind an
    /// in-flight broadcast or dropped because the throttle is closed.
    #[must_use]
    pub fn admit(&self, batch: BroadcastBatch) -> Option<BroadcastBatch> {
        let mut state = self.state.lock();
        match &mut *state {
            ThrottleState::Idle => {
                *state = ThrottleState::Broadcasting { queued: None };
                Some(batch)
            }
            ThrottleState::Broadcasting { queued } => {
                match queued {
                    Some(pending) => pending.merge(batch),
                    None => *queued = Some(batch),
                }
                None
            }
            ThrottleState::Closed => None,
        }
    }

    /// Report that the in-flight broadcast finished.
    ///
    /// Returns the merged batch queued while it ran, in which case the
    /// caller must immediately broadcast that batch too; `None` means
    /// the throttle went idle.
    #[must_use]
    pub fn on_complete(&self) -> Option<BroadcastBatch> {
        let mut state = self.state.lock();
        match &mut *state {
            ThrottleState::Broadcasting { queued } => match queued.take() {
                Some(next) => Some(next),
                None => {
                    *state = ThrottleState::Idle;
                    None
                }
            },
            // Completion after close or while idle changes nothing.
            ThrottleState::Idle | ThrottleState::Closed => None,
        }
    }

    /// Stop admitting batches and discard anything queued.
    pub fn close(&self) {
        *self.state.lock() = ThrottleState::Closed;
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(*self.state.lock(), ThrottleState::Idle)
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(*self.state.lock(), ThrottleState::Closed)
    }
}

impl Default for BroadcastThrottle {
    fn default() -> Self {
        Self::new()
    }
}
