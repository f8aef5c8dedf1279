// src/store/mod.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::question::{AnswerRecord, NewQuestion, Question, QuestionChanges},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryQuestionStore;
pub use postgres::PgQuestionStore;

/// Persistent collection of question records.
///
/// Inputs arrive already validated; implementations only report
/// `NotFound` and storage failures.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// All questions, newest first. `subject` filters by exact match.
    async fn list(&self, subject: Option<&str>) -> Result<Vec<Question>, AppError>;

    /// Distinct subjects, sorted ascending.
    async fn list_subjects(&self) -> Result<Vec<String>, AppError>;

    async fn get(&self, id: Uuid) -> Result<Question, AppError>;

    async fn create(&self, new: NewQuestion) -> Result<Question, AppError>;

    async fn update(&self, id: Uuid, changes: QuestionChanges) -> Result<Question, AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;

    /// Writes the four answer-history fields in one atomic step.
    async fn record_answer(&self, id: Uuid, answer: AnswerRecord) -> Result<Question, AppError>;
}
