//! Bounded close of the submission modal.
//!
//! A save runs as its own task while the modal close is scheduled inside a
//! `[min_visible, max_close]` window measured from the submit click. Each
//! attempt owns a close timer that reopening, cancelling or resubmitting
//! invalidates.

mod controller;
mod timer;

pub use controller::{BoundedSubmission, PendingSave, SubmitOutcome};
