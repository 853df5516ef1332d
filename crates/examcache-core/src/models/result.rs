//! Answer maps and scored results.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::CachedTest;

/// Wire value recorded for a question the student did not answer.
pub const SKIPPED: i64 = -1;

/// Question id -> selected option index for one attempt.
pub type ProgressRecord = BTreeMap<String, u32>;

/// A scored result waiting in the local queue for synchronization.
pub type PendingResult = ScoredResult;

/// The answer given to one question, `None` when skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: String,
    #[serde(with = "skipped_sentinel")]
    pub answer_index: Option<u32>,
}

impl AnswerRecord {
    pub fn is_skipped(&self) -> bool {
        self.answer_index.is_none()
    }
}

/// A fully scored submission for one test attempt.
///
/// `submitted_at` doubles as the identity of the entry in the pending queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub test_id: String,
    pub student_id: String,
    pub score: u32,
    pub total_questions: u32,
    pub answers: Vec<AnswerRecord>,
    pub submitted_at: DateTime<Utc>,
}

impl ScoredResult {
    /// Score `answers` against `test`, one record per question in display order.
    pub fn grade(
        test: &CachedTest,
        answers: &ProgressRecord,
        student_id: &str,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let mut score = 0;
        let records = test
            .questions
            .iter()
            .map(|q| {
                let selected = answers.get(&q.id).copied();
                if q.is_correct(selected) {
                    score += 1;
                }
                AnswerRecord {
                    question_id: q.id.clone(),
                    answer_index: selected,
                }
            })
            .collect();

        Self {
            test_id: test.id.clone(),
            student_id: student_id.to_string(),
            score,
            total_questions: test.questions.len() as u32,
            answers: records,
            submitted_at,
        }
    }
}

/// The row returned by the remote store after inserting a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedResult {
    pub id: String,
}

mod skipped_sentinel {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(index) => serializer.serialize_i64(i64::from(*index)),
            None => serializer.serialize_i64(SKIPPED),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        let raw = Option::<i64>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(n) if n < 0 => Ok(None),
            Some(n) => u32::try_from(n)
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("answer index out of range: {}", n))),
        }
    }
}
