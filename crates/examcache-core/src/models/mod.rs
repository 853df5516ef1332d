//! Data models for tests, answers and results.
//!
//! - `Question`, `CachedTest`, `TestDefinition`: test content as fetched and cached
//! - `AnswerRecord`, `ScoredResult`: the scored submission written remotely
//!   or queued locally as a `PendingResult`
//! - `ProgressRecord`: the in-flight answer map for an attempt

pub mod result;
pub mod test;

pub use result::{AnswerRecord, PendingResult, ProgressRecord, ScoredResult, SubmittedResult};
pub use test::{CachedTest, Question, TestDefinition};
