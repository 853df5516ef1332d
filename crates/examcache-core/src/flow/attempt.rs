use crate::models::{CachedTest, ProgressRecord, Question};

use super::{Countdown, FlowError};

/// Where the attempt's test definition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Cache,
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    InProgress,
    Submitting,
    /// `offline` is set when the result went to the pending queue.
    Completed { offline: bool },
}

/// In-memory state of one test attempt.
#[derive(Debug, Clone)]
pub struct Attempt {
    test: CachedTest,
    answers: ProgressRecord,
    countdown: Countdown,
    state: AttemptState,
    source: LoadSource,
}

impl Attempt {
    /// Start an attempt with the full duration on the clock. Saved progress
    /// is restored; elapsed time is not.
    pub fn new(test: CachedTest, answers: ProgressRecord, source: LoadSource) -> Self {
        let countdown = Countdown::from_secs(test.duration_secs());
        Self {
            test,
            answers,
            countdown,
            state: AttemptState::InProgress,
            source,
        }
    }

    pub fn test(&self) -> &CachedTest {
        &self.test
    }

    pub fn questions(&self) -> &[Question] {
        &self.test.questions
    }

    pub fn answers(&self) -> &ProgressRecord {
        &self.answers
    }

    pub fn answer_for(&self, question_index: usize) -> Option<u32> {
        let question = self.test.questions.get(question_index)?;
        self.answers.get(&question.id).copied()
    }

    pub fn answered_count(&self) -> usize {
        self.test
            .questions
            .iter()
            .filter(|q| self.answers.contains_key(&q.id))
            .count()
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub(crate) fn countdown_mut(&mut self) -> &mut Countdown {
        &mut self.countdown
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: AttemptState) {
        self.state = state;
    }

    pub fn source(&self) -> LoadSource {
        self.source
    }

    /// Served from the local cache rather than the remote store.
    pub fn is_offline_mode(&self) -> bool {
        self.source == LoadSource::Cache
    }

    pub(crate) fn ensure_in_progress(&self) -> Result<(), FlowError> {
        match self.state {
            AttemptState::InProgress => Ok(()),
            other => Err(FlowError::NotInProgress(other)),
        }
    }

    /// Record `option` for the question at `question_index`.
    pub(crate) fn select(&mut self, question_index: usize, option: u32) -> Result<(), FlowError> {
        self.ensure_in_progress()?;

        let len = self.test.questions.len();
        let question = self
            .test
            .questions
            .get(question_index)
            .ok_or(FlowError::QuestionOutOfRange {
                index: question_index,
                len,
            })?;

        if !question.has_option(option) {
            return Err(FlowError::OptionOutOfRange {
                question_id: question.id.clone(),
                option,
                len: question.options.len(),
            });
        }

        self.answers.insert(question.id.clone(), option);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn attempt() -> Attempt {
        let test = CachedTest {
            id: "t1".to_string(),
            title: "Geography".to_string(),
            duration: 2,
            questions: vec![
                Question {
                    id: "q1".to_string(),
                    text: "Capital of France?".to_string(),
                    options: vec!["Paris".into(), "Rome".into()],
                    correct_answer: 0,
                },
                Question {
                    id: "q2".to_string(),
                    text: "Capital of Italy?".to_string(),
                    options: vec!["Paris".into(), "Rome".into()],
                    correct_answer: 1,
                },
            ],
            cached_at: Utc::now(),
        };
        Attempt::new(test, ProgressRecord::new(), LoadSource::Remote)
    }

    #[test]
    fn test_new_attempt_starts_full_clock() {
        let attempt = attempt();
        assert_eq!(attempt.state(), AttemptState::InProgress);
        assert_eq!(attempt.countdown().remaining_secs(), 120);
        assert!(!attempt.is_offline_mode());
    }

    #[test]
    fn test_select_records_and_replaces() {
        let mut attempt = attempt();
        attempt.select(1, 0).unwrap();
        attempt.select(1, 1).unwrap();
        assert_eq!(attempt.answer_for(1), Some(1));
        assert_eq!(attempt.answer_for(0), None);
        assert_eq!(attempt.answered_count(), 1);
    }

    #[test]
    fn test_select_rejects_out_of_range() {
        let mut attempt = attempt();
        assert_eq!(
            attempt.select(5, 0),
            Err(FlowError::QuestionOutOfRange { index: 5, len: 2 })
        );
        assert!(matches!(
            attempt.select(0, 2),
            Err(FlowError::OptionOutOfRange { option: 2, len: 2, .. })
        ));
        assert!(attempt.answers().is_empty());
    }

    #[test]
    fn test_select_rejected_after_completion() {
        let mut attempt = attempt();
        attempt.set_state(AttemptState::Completed { offline: false });
        assert_eq!(
            attempt.select(0, 0),
            Err(FlowError::NotInProgress(AttemptState::Completed { offline: false }))
        );
    }
}
