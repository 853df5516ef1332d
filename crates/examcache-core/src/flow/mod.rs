//! Test-taking flow over the offline cache and the remote store.
//!
//! An attempt moves through `Loading -> InProgress -> Submitting -> Completed`,
//! or aborts during loading when the test is neither cached nor fetchable.
//! Submission falls back to the pending-results queue whenever the remote
//! write fails.

pub mod attempt;
pub mod controller;
pub mod error;
pub mod notice;
pub mod timer;

pub use attempt::{Attempt, AttemptState, LoadSource};
pub use controller::{ExamFlow, LoadOutcome, Navigation, SubmitOutcome, SubmitTrigger, TickOutcome};
pub use error::FlowError;
pub use notice::{Notice, Notifier};
pub use timer::{Countdown, CountdownTick};
