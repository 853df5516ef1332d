use thiserror::Error;

use super::AttemptState;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FlowError {
    #[error("Attempt is not in progress (state: {0:?})")]
    NotInProgress(AttemptState),

    #[error("Question {index} out of range ({len} questions)")]
    QuestionOutOfRange { index: usize, len: usize },

    #[error("Option {option} out of range for question {question_id} ({len} options)")]
    OptionOutOfRange {
        question_id: String,
        option: u32,
        len: usize,
    },
}
