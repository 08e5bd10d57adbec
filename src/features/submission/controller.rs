use std::future::Future;

use tokio::task::{JoinError, JoinHandle};
use tokio::time::{sleep, sleep_until, Instant};

use crate::core::config::SubmissionConfig;
use crate::core::error::{AppError, Result};
use crate::features::submission::timer::CloseTimerSlot;

/// A save that may still be running after the modal was dealt with
#[derive(Debug)]
pub struct PendingSave<T> {
    state: SaveState<T>,
}

#[derive(Debug)]
enum SaveState<T> {
    Running(JoinHandle<Result<T>>),
    Finished(Result<T>),
}

impl<T> PendingSave<T> {
    fn running(handle: JoinHandle<Result<T>>) -> Self {
        Self {
            state: SaveState::Running(handle),
        }
    }

    fn finished(result: Result<T>) -> Self {
        Self {
            state: SaveState::Finished(result),
        }
    }

    pub fn is_finished(&self) -> bool {
        match &self.state {
            SaveState::Running(handle) => handle.is_finished(),
            SaveState::Finished(_) => true,
        }
    }

    /// Wait for the save and return how it ended
    pub async fn outcome(self) -> Result<T> {
        match self.state {
            SaveState::Running(handle) => handle.await?,
            SaveState::Finished(result) => result,
        }
    }
}

/// How one submit attempt ended from the modal's point of view
#[derive(Debug)]
pub enum SubmitOutcome<T> {
    /// The save succeeded and the modal was closed
    Closed(T),
    /// The modal was closed at the upper bound while the save was still running
    ClosedWhileSaving(PendingSave<T>),
    /// The save failed before the modal closed; it stays open
    Rejected(AppError),
    /// The close was invalidated by a newer attempt, a reopen or a cancel
    Superseded(PendingSave<T>),
}

enum Step<T> {
    Invalidated,
    Saved(Result<T>),
    TimerElapsed,
}

fn flatten<T>(joined: std::result::Result<Result<T>, JoinError>) -> Result<T> {
    joined.unwrap_or_else(|e| Err(AppError::from(e)))
}

/// Runs a save and closes the modal inside the configured visibility window.
///
/// The close never fires before `min_visible` has elapsed since the click,
/// never later than `max_close`, never after a rejection that arrived before
/// it, and at most once per attempt.
#[derive(Debug)]
pub struct BoundedSubmission {
    window: SubmissionConfig,
    timers: CloseTimerSlot,
}

impl BoundedSubmission {
    pub fn new(window: SubmissionConfig) -> Self {
        Self {
            window,
            timers: CloseTimerSlot::new(),
        }
    }

    /// Invalidate the close of the in-flight attempt, if any
    pub fn invalidate_pending(&self) -> bool {
        self.timers.invalidate()
    }

    pub fn has_pending_close(&self) -> bool {
        self.timers.has_pending()
    }

    /// Start `action` and schedule `on_close` within the visibility window.
    ///
    /// The save runs as its own task, so closing early never cancels it.
    pub async fn submit_and_schedule<T, Fut, C>(&self, action: Fut, on_close: C) -> SubmitOutcome<T>
    where
        T: Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
        C: FnOnce() + Send,
    {
        let clicked_at = Instant::now();
        let timer = self.timers.arm();
        let attempt = timer.attempt();
        let mut save = tokio::spawn(action);

        tracing::debug!("Submit attempt {} started", attempt);

        let first = tokio::select! {
            biased;
            _ = timer.invalidated() => Step::Invalidated,
            joined = &mut save => Step::Saved(flatten(joined)),
            _ = sleep(self.window.min_visible) => Step::TimerElapsed,
        };

        let mut saved = match first {
            Step::Invalidated => {
                tracing::debug!("Attempt {} superseded before the minimum elapsed", attempt);
                return SubmitOutcome::Superseded(PendingSave::running(save));
            }
            Step::Saved(Err(e)) => {
                self.timers.release(&timer);
                tracing::warn!("Attempt {} rejected: {}", attempt, e);
                return SubmitOutcome::Rejected(e);
            }
            Step::Saved(Ok(value)) => Some(value),
            Step::TimerElapsed => None,
        };

        let deadline = clicked_at + self.window.max_close;
        let remaining = self.window.max_close.saturating_sub(clicked_at.elapsed());
        tracing::debug!(
            "Attempt {} closes in {}ms (save finished: {})",
            attempt,
            remaining.as_millis(),
            saved.is_some()
        );

        loop {
            let step = match saved {
                Some(_) => tokio::select! {
                    biased;
                    _ = timer.invalidated() => Step::Invalidated,
                    _ = sleep_until(deadline) => Step::TimerElapsed,
                },
                None => tokio::select! {
                    biased;
                    _ = timer.invalidated() => Step::Invalidated,
                    joined = &mut save => Step::Saved(flatten(joined)),
                    _ = sleep_until(deadline) => Step::TimerElapsed,
                },
            };

            match step {
                Step::Invalidated => {
                    tracing::debug!("Attempt {} superseded before closing", attempt);
                    let pending = match saved {
                        Some(value) => PendingSave::finished(Ok(value)),
                        None => PendingSave::running(save),
                    };
                    return SubmitOutcome::Superseded(pending);
                }
                Step::Saved(Err(e)) => {
                    self.timers.release(&timer);
                    tracing::warn!("Attempt {} rejected: {}", attempt, e);
                    return SubmitOutcome::Rejected(e);
                }
                Step::Saved(Ok(value)) => saved = Some(value),
                Step::TimerElapsed => break,
            }
        }

        if !self.timers.take_for_close(&timer) {
            let pending = match saved {
                Some(value) => PendingSave::finished(Ok(value)),
                None => PendingSave::running(save),
            };
            return SubmitOutcome::Superseded(pending);
        }

        on_close();
        tracing::info!(
            "Modal closed {}ms after submit attempt {}",
            clicked_at.elapsed().as_millis(),
            attempt
        );

        match saved {
            Some(value) => SubmitOutcome::Closed(value),
            None => SubmitOutcome::ClosedWhileSaving(PendingSave::running(save)),
        }
    }
}
