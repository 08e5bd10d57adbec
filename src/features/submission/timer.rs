use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Handle to the close scheduled by one submit attempt.
///
/// Once invalidated, the close it guards can no longer fire.
#[derive(Debug, Clone)]
pub struct CloseTimer {
    attempt: u64,
    token: CancellationToken,
}

impl CloseTimer {
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn invalidate(&self) {
        self.token.cancel();
    }

    pub fn is_invalidated(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the timer is invalidated
    pub fn invalidated(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}

/// Holds the single live close timer of a modal
#[derive(Debug, Default)]
pub struct CloseTimerSlot {
    attempts: AtomicU64,
    current: Mutex<Option<CloseTimer>>,
}

impl CloseTimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new attempt, invalidating whatever timer was live before
    pub fn arm(&self) -> CloseTimer {
        let timer = CloseTimer {
            attempt: self.attempts.fetch_add(1, Ordering::SeqCst) + 1,
            token: CancellationToken::new(),
        };

        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = current.replace(timer.clone()) {
            tracing::debug!(
                "Invalidating close timer of attempt {} (superseded by attempt {})",
                previous.attempt,
                timer.attempt
            );
            previous.invalidate();
        }

        timer
    }

    /// Invalidate the live timer. Returns whether one was pending.
    pub fn invalidate(&self) -> bool {
        let taken = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match taken {
            Some(timer) => {
                tracing::debug!("Invalidating close timer of attempt {}", timer.attempt);
                timer.invalidate();
                true
            }
            None => false,
        }
    }

    /// Claim the right to fire `timer`'s close.
    ///
    /// Succeeds at most once per timer, and only while it is still the live,
    /// non-invalidated one. The slot is emptied on success.
    pub fn take_for_close(&self, timer: &CloseTimer) -> bool {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let is_live = current
            .as_ref()
            .is_some_and(|live| live.attempt == timer.attempt);

        if is_live && !timer.is_invalidated() {
            *current = None;
            true
        } else {
            false
        }
    }

    /// Drop `timer` from the slot without firing it
    pub fn release(&self, timer: &CloseTimer) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if current
            .as_ref()
            .is_some_and(|live| live.attempt == timer.attempt)
        {
            *current = None;
        }
        timer.invalidate();
    }

    pub fn has_pending(&self) -> bool {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready, task};

    #[test]
    fn test_arm_invalidates_previous_timer() {
        let slot = CloseTimerSlot::new();
        let first = slot.arm();
        let second = slot.arm();

        assert!(first.is_invalidated());
        assert!(!second.is_invalidated());
        assert_eq!(second.attempt(), first.attempt() + 1);
        assert!(!slot.take_for_close(&first));
        assert!(slot.take_for_close(&second));
    }

    #[test]
    fn test_take_for_close_only_once() {
        let slot = CloseTimerSlot::new();
        let timer = slot.arm();
        assert!(slot.take_for_close(&timer));
        assert!(!slot.take_for_close(&timer));
        assert!(!slot.has_pending());
    }

    #[test]
    fn test_invalidate_blocks_close() {
        let slot = CloseTimerSlot::new();
        let timer = slot.arm();
        assert!(slot.invalidate());
        assert!(!slot.invalidate());
        assert!(timer.is_invalidated());
        assert!(!slot.take_for_close(&timer));
    }

    #[test]
    fn test_release_clears_only_its_own_timer() {
        let slot = CloseTimerSlot::new();
        let stale = slot.arm();
        let live = slot.arm();
        slot.release(&stale);
        assert!(slot.has_pending());
        slot.release(&live);
        assert!(!slot.has_pending());
        assert!(live.is_invalidated());
    }

    #[test]
    fn test_invalidated_future_wakes_waiter() {
        let slot = CloseTimerSlot::new();
        let timer = slot.arm();

        let mut waiting = task::spawn(timer.invalidated());
        assert_pending!(waiting.poll());

        slot.invalidate();
        assert!(waiting.is_woken());
        assert_ready!(waiting.poll());
    }
}
