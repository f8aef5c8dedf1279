// src/grading.rs

use chrono::{DateTime, Utc};

use crate::models::question::AnswerRecord;

/// Recorded in place of the user's answer when the submission was blank.
pub const SKIPPED_ANSWER: &str = "(skipped)";

/// Trims surrounding whitespace and case-folds.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Compares a submitted answer with the reference answer.
///
/// Both sides are normalized first. A blank submission is never correct.
pub fn grade(submitted: &str, correct_answer: &str) -> bool {
    let submitted = normalize(submitted);
    if submitted.is_empty() {
        return false;
    }
    submitted == normalize(correct_answer)
}

/// Outcome of grading one submission, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grade {
    /// The raw submitted text, or [`SKIPPED_ANSWER`] for a blank submission.
    pub user_answer: String,
    pub is_correct: bool,
}

impl Grade {
    pub fn is_skipped(&self) -> bool {
        self.user_answer == SKIPPED_ANSWER
    }

    pub fn into_record(self, reviewed_at: DateTime<Utc>) -> AnswerRecord {
        AnswerRecord {
            user_answer: self.user_answer,
            is_correct: self.is_correct,
            reviewed_at,
        }
    }
}

pub fn evaluate(submitted: &str, correct_answer: &str) -> Grade {
    if submitted.trim().is_empty() {
        return Grade {
            user_answer: SKIPPED_ANSWER.to_string(),
            is_correct: false,
        };
    }

    Grade {
        user_answer: submitted.to_string(),
        is_correct: grade(submitted, correct_answer),
    }
}
