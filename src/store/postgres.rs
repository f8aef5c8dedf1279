// src/store/postgres.rs

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};
use uuid::Uuid;

use super::QuestionStore;
use crate::{
    error::AppError,
    models::question::{AnswerRecord, NewQuestion, Question, QuestionChanges},
};

const QUESTION_COLUMNS: &str = "id, subject, question, correct_answer, difficulty, user_answer, \
     is_answered, is_correct, last_reviewed, created_at, updated_at";

const CONNECT_ATTEMPTS: u32 = 5;

/// PostgreSQL-backed store. Every operation is a single statement.
#[derive(Debug, Clone)]
pub struct PgQuestionStore {
    pool: PgPool,
}

impl PgQuestionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects with retry, then applies the embedded migrations.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let mut retry_count = 0;
        let pool = loop {
            match PgPoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(3))
                .connect(database_url)
                .await
            {
                Ok(pool) => break pool,
                Err(e) => {
                    retry_count += 1;
                    if retry_count >= CONNECT_ATTEMPTS {
                        return Err(AppError::InternalServerError(format!(
                            "failed to connect to database after {} attempts: {}",
                            CONNECT_ATTEMPTS, e
                        )));
                    }
                    tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                    tokio::time::sleep(Duration::from_secs(2)).await;
                }
            }
        };
        tracing::info!("Database connected...");

        tracing::info!("Running migrations...");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::InternalServerError(format!("migration failed: {}", e)))?;
        tracing::info!("Migrations applied successfully.");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl QuestionStore for PgQuestionStore {
    async fn list(&self, subject: Option<&str>) -> Result<Vec<Question>, AppError> {
        let sql = format!(
            "SELECT {QUESTION_COLUMNS} FROM questions \
             WHERE ($1::TEXT IS NULL OR subject = $1) \
             ORDER BY created_at DESC"
        );
        let questions = sqlx::query_as::<_, Question>(&sql)
            .bind(subject)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list questions: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

        Ok(questions)
    }

    async fn list_subjects(&self) -> Result<Vec<String>, AppError> {
        let subjects =
            sqlx::query_scalar::<_, String>("SELECT DISTINCT subject FROM questions ORDER BY subject")
                .fetch_all(&self.pool)
                .await?;

        Ok(subjects)
    }

    async fn get(&self, id: Uuid) -> Result<Question, AppError> {
        let sql = format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1");
        sqlx::query_as::<_, Question>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(AppError::question_not_found)
    }

    async fn create(&self, new: NewQuestion) -> Result<Question, AppError> {
        let sql = format!(
            "INSERT INTO questions (id, subject, question, correct_answer, difficulty) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {QUESTION_COLUMNS}"
        );
        let question = sqlx::query_as::<_, Question>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new.subject)
            .bind(&new.question)
            .bind(&new.correct_answer)
            .bind(new.difficulty.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create question: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

        Ok(question)
    }

    async fn update(&self, id: Uuid, changes: QuestionChanges) -> Result<Question, AppError> {
        let sql = format!(
            "UPDATE questions SET \
                subject = COALESCE($2, subject), \
                question = COALESCE($3, question), \
                correct_answer = COALESCE($4, correct_answer), \
                difficulty = COALESCE($5, difficulty), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {QUESTION_COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&sql)
            .bind(id)
            .bind(changes.subject)
            .bind(changes.question)
            .bind(changes.correct_answer)
            .bind(changes.difficulty.map(|d| d.as_str()))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(AppError::question_not_found)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::question_not_found());
        }
        Ok(())
    }

    async fn record_answer(&self, id: Uuid, answer: AnswerRecord) -> Result<Question, AppError> {
        let sql = format!(
            "UPDATE questions SET \
                user_answer = $2, \
                is_answered = TRUE, \
                is_correct = $3, \
                last_reviewed = $4, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {QUESTION_COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&sql)
            .bind(id)
            .bind(answer.user_answer)
            .bind(answer.is_correct)
            .bind(answer.reviewed_at)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(AppError::question_not_found)
    }
}
