// src/models/question.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Difficulty rating of a question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDifficulty(pub String);

impl fmt::Display for InvalidDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` is not a valid difficulty (expected easy, medium or hard)",
            self.0
        )
    }
}

impl std::error::Error for InvalidDifficulty {}

impl From<InvalidDifficulty> for AppError {
    fn from(err: InvalidDifficulty) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl FromStr for Difficulty {
    type Err = InvalidDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(InvalidDifficulty(other.to_string())),
        }
    }
}

/// Lets `sqlx` decode the TEXT column straight into the enum.
impl TryFrom<String> for Difficulty {
    type Error = InvalidDifficulty;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(alias = "_id")]
    pub id: Uuid,

    /// Free-text grouping label.
    pub subject: String,

    /// The prompt. May hold rich-text markup from the editor; stored verbatim.
    pub question: String,

    pub correct_answer: String,

    #[sqlx(try_from = "String")]
    pub difficulty: Difficulty,

    /// Last submitted answer, or the skip sentinel.
    pub user_answer: Option<String>,

    #[serde(default)]
    pub is_answered: bool,

    /// Result of the most recent grading. Only meaningful when `is_answered`.
    pub is_correct: Option<bool>,

    pub last_reviewed: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new question.
///
/// Missing text fields deserialize as empty so they fail validation with a 400
/// instead of a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "subject must not be empty"))]
    pub subject: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "question must not be empty"))]
    pub question: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "correctAnswer must not be empty"))]
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

/// DTO for a partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "subject must not be empty"))]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "question must not be empty"))]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "correctAnswer must not be empty"))]
    pub correct_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

/// A validated, trimmed question ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub subject: String,
    pub question: String,
    pub correct_answer: String,
    pub difficulty: Difficulty,
}

/// A validated, trimmed set of field overwrites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionChanges {
    pub subject: Option<String>,
    pub question: Option<String>,
    pub correct_answer: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl QuestionChanges {
    pub fn apply_to(self, question: &mut Question) {
        if let Some(subject) = self.subject {
            question.subject = subject;
        }
        if let Some(text) = self.question {
            question.question = text;
        }
        if let Some(answer) = self.correct_answer {
            question.correct_answer = answer;
        }
        if let Some(difficulty) = self.difficulty {
            question.difficulty = difficulty;
        }
    }
}

/// The answer-history fields written by one submission, as a single unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub user_answer: String,
    pub is_correct: bool,
    pub reviewed_at: DateTime<Utc>,
}

impl AnswerRecord {
    pub fn apply_to(self, question: &mut Question) {
        question.user_answer = Some(self.user_answer);
        question.is_answered = true;
        question.is_correct = Some(self.is_correct);
        question.last_reviewed = Some(self.reviewed_at);
    }
}

impl TryFrom<CreateQuestionRequest> for NewQuestion {
    type Error = AppError;

    fn try_from(req: CreateQuestionRequest) -> Result<Self, Self::Error> {
        let req = CreateQuestionRequest {
            subject: req.subject.trim().to_string(),
            question: req.question.trim().to_string(),
            correct_answer: req.correct_answer.trim().to_string(),
            difficulty: req.difficulty,
        };
        req.validate()?;

        let difficulty = match req.difficulty.as_deref() {
            Some(raw) => raw.parse()?,
            None => Difficulty::default(),
        };

        Ok(NewQuestion {
            subject: req.subject,
            question: req.question,
            correct_answer: req.correct_answer,
            difficulty,
        })
    }
}

impl TryFrom<UpdateQuestionRequest> for QuestionChanges {
    type Error = AppError;

    fn try_from(req: UpdateQuestionRequest) -> Result<Self, Self::Error> {
        let trim = |field: Option<String>| field.map(|s| s.trim().to_string());
        let req = UpdateQuestionRequest {
            subject: trim(req.subject),
            question: trim(req.question),
            correct_answer: trim(req.correct_answer),
            difficulty: req.difficulty,
        };
        req.validate()?;

        let difficulty = req
            .difficulty
            .as_deref()
            .map(str::parse::<Difficulty>)
            .transpose()?;

        Ok(QuestionChanges {
            subject: req.subject,
            question: req.question,
            correct_answer: req.correct_answer,
            difficulty,
        })
    }
}

/// DTO for submitting an answer. A missing or null answer counts as skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    #[serde(default)]
    pub user_answer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerResponse {
    pub question: Question,
    pub is_correct: bool,
}

/// Plain confirmation body, e.g. after a delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
