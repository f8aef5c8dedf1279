// src/store/memory.rs

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::QuestionStore;
use crate::{
    error::AppError,
    models::question::{AnswerRecord, NewQuestion, Question, QuestionChanges},
};

/// In-process store used when no database is configured.
///
/// Records are kept in creation order; every mutation holds the write lock
/// for its whole read-modify-write.
#[derive(Debug, Default)]
pub struct MemoryQuestionStore {
    questions: RwLock<Vec<Question>>,
}

impl MemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn position(questions: &[Question], id: Uuid) -> Result<usize, AppError> {
    questions
        .iter()
        .position(|q| q.id == id)
        .ok_or_else(AppError::question_not_found)
}

#[async_trait]
impl QuestionStore for MemoryQuestionStore {
    async fn list(&self, subject: Option<&str>) -> Result<Vec<Question>, AppError> {
        let questions = self.questions.read().await;
        Ok(questions
            .iter()
            .rev()
            .filter(|q| subject.is_none_or(|s| q.subject == s))
            .cloned()
            .collect())
    }

    async fn list_subjects(&self) -> Result<Vec<String>, AppError> {
        let questions = self.questions.read().await;
        let mut subjects: Vec<String> = questions.iter().map(|q| q.subject.clone()).collect();
        subjects.sort();
        subjects.dedup();
        Ok(subjects)
    }

    async fn get(&self, id: Uuid) -> Result<Question, AppError> {
        let questions = self.questions.read().await;
        let idx = position(&questions, id)?;
        Ok(questions[idx].clone())
    }

    async fn create(&self, new: NewQuestion) -> Result<Question, AppError> {
        let now = Utc::now();
        let question = Question {
            id: Uuid::new_v4(),
            subject: new.subject,
            question: new.question,
            correct_answer: new.correct_answer,
            difficulty: new.difficulty,
            user_answer: None,
            is_answered: false,
            is_correct: None,
            last_reviewed: None,
            created_at: now,
            updated_at: now,
        };

        self.questions.write().await.push(question.clone());
        Ok(question)
    }

    async fn update(&self, id: Uuid, changes: QuestionChanges) -> Result<Question, AppError> {
        let mut questions = self.questions.write().await;
        let idx = position(&questions, id)?;
        let question = &mut questions[idx];
        changes.apply_to(question);
        question.updated_at = Utc::now();
        Ok(question.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut questions = self.questions.write().await;
        let idx = position(&questions, id)?;
        questions.remove(idx);
        Ok(())
    }

    async fn record_answer(&self, id: Uuid, answer: AnswerRecord) -> Result<Question, AppError> {
        let mut questions = self.questions.write().await;
        let idx = position(&questions, id)?;
        let question = &mut questions[idx];
        answer.apply_to(question);
        question.updated_at = Utc::now();
        Ok(question.clone())
    }
}
