//! Drives a test attempt against the offline store and the remote store.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::api::RemoteStore;
use crate::cache::OfflineStore;
use crate::models::{CachedTest, ProgressRecord, ScoredResult};

use super::{Attempt, AttemptState, CountdownTick, FlowError, LoadSource, Notice, Notifier};

/// Where the caller should send the student next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Dashboard,
    ResultView { result_id: String, test_id: String },
}

#[derive(Debug)]
pub enum LoadOutcome {
    Ready(Attempt),
    Aborted { navigate: Navigation },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    Manual,
    TimeUp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub result: ScoredResult,
    /// The result went to the pending queue instead of the remote store.
    pub offline: bool,
    pub navigate: Navigation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Running(u32),
    Idle,
    /// Time ran out and the attempt was submitted.
    Submitted(SubmitOutcome),
}

/// Test-taking controller for one student.
pub struct ExamFlow<R> {
    store: OfflineStore,
    remote: R,
    notifier: Arc<dyn Notifier>,
    student_id: String,
}

impl<R: RemoteStore> ExamFlow<R> {
    pub fn new(
        store: OfflineStore,
        remote: R,
        notifier: Arc<dyn Notifier>,
        student_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            remote,
            notifier,
            student_id: student_id.into(),
        }
    }

    pub fn store(&self) -> &OfflineStore {
        &self.store
    }

    /// Load a test, preferring the local cache over the remote store.
    pub async fn load(&self, test_id: &str) -> LoadOutcome {
        let test_id = test_id.trim();
        if test_id.is_empty() {
            warn!("No test id given");
            return LoadOutcome::Aborted {
                navigate: Navigation::Dashboard,
            };
        }

        match self.store.get_test(test_id) {
            Ok(Some(test)) => {
                info!(test_id, cached = %test.age_display(), "Loaded test from local cache");
                let answers = self.saved_progress(test_id);
                return LoadOutcome::Ready(Attempt::new(test, answers, LoadSource::Cache));
            }
            Ok(None) => debug!(test_id, "Test not cached, fetching from remote"),
            Err(e) => warn!(test_id, error = %e, "Cached test unreadable, fetching from remote"),
        }

        match self.remote.fetch_test(test_id).await {
            Ok(definition) => {
                let test = CachedTest::new(definition);
                if let Err(e) = self.store.save_test(&test) {
                    if e.is_quota_exceeded() {
                        self.notifier.notify(Notice::StorageFull);
                    }
                }
                LoadOutcome::Ready(Attempt::new(test, ProgressRecord::new(), LoadSource::Remote))
            }
            Err(e) => {
                error!(test_id, error = %format!("{:#}", e), "Could not load test");
                self.notifier.notify(Notice::LoadFailed);
                LoadOutcome::Aborted {
                    navigate: Navigation::Dashboard,
                }
            }
        }
    }

    fn saved_progress(&self, test_id: &str) -> ProgressRecord {
        match self.store.get_progress(test_id) {
            Ok(Some(answers)) => answers,
            Ok(None) => ProgressRecord::new(),
            Err(e) => {
                warn!(test_id, error = %e, "Saved progress unreadable, starting fresh");
                ProgressRecord::new()
            }
        }
    }

    /// Record an answer and mirror the whole answer map into the cache.
    /// A failed cache write is logged and otherwise ignored.
    pub fn answer(&self, attempt: &mut Attempt, question_index: usize, option: u32) -> Result<(), FlowError> {
        attempt.select(question_index, option)?;

        let test_id = &attempt.test().id;
        if let Err(e) = self.store.save_progress(test_id, attempt.answers()) {
            warn!(test_id = %test_id, error = %e, "Failed to save progress");
        }
        Ok(())
    }

    /// Advance the countdown by one second, submitting when it runs out.
    pub async fn tick(&self, attempt: &mut Attempt) -> TickOutcome {
        if attempt.state() != AttemptState::InProgress {
            return TickOutcome::Idle;
        }

        match attempt.countdown_mut().tick() {
            CountdownTick::Running(remaining) => TickOutcome::Running(remaining),
            CountdownTick::Idle => TickOutcome::Idle,
            CountdownTick::Expired => {
                info!(test_id = %attempt.test().id, "Time is up, submitting");
                match self.submit(attempt, SubmitTrigger::TimeUp).await {
                    Ok(outcome) => TickOutcome::Submitted(outcome),
                    Err(e) => {
                        debug!(error = %e, "Forced submission skipped");
                        TickOutcome::Idle
                    }
                }
            }
        }
    }

    /// Score the attempt and write the result remotely, queueing it locally
    /// if the write fails for any reason.
    pub async fn submit(&self, attempt: &mut Attempt, trigger: SubmitTrigger) -> Result<SubmitOutcome, FlowError> {
        attempt.ensure_in_progress()?;
        attempt.set_state(AttemptState::Submitting);

        let result = ScoredResult::grade(attempt.test(), attempt.answers(), &self.student_id, Utc::now());
        info!(
            test_id = %result.test_id,
            ?trigger,
            score = result.score,
            total = result.total_questions,
            "Submitting result"
        );

        match self.remote.insert_result(&result).await {
            Ok(submitted) => {
                if let Err(e) = self.store.clear_test(&result.test_id) {
                    warn!(test_id = %result.test_id, error = %e, "Failed to clear cached test");
                }
                attempt.set_state(AttemptState::Completed { offline: false });
                Ok(SubmitOutcome {
                    navigate: Navigation::ResultView {
                        result_id: submitted.id,
                        test_id: result.test_id.clone(),
                    },
                    offline: false,
                    result,
                })
            }
            Err(e) => {
                info!(error = %format!("{:#}", e), "Submission failed, saving locally");
                self.queue_result(&result);
                attempt.set_state(AttemptState::Completed { offline: true });
                Ok(SubmitOutcome {
                    result,
                    offline: true,
                    navigate: Navigation::Dashboard,
                })
            }
        }
    }

    fn queue_result(&self, result: &ScoredResult) {
        if !self.store.is_available() {
            warn!(test_id = %result.test_id, "No local storage, result cannot be queued");
            self.notifier.notify(Notice::PendingSaveFailed);
            return;
        }

        match self.store.save_pending_result(result) {
            Ok(()) => self.notifier.notify(Notice::SavedOffline),
            Err(e) => {
                error!(test_id = %result.test_id, error = %e, "Failed to queue result");
                self.notifier.notify(Notice::PendingSaveFailed);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
