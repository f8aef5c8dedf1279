// src/handlers/answers.rs

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
};
use chrono::Utc;

use super::questions::parse_id;
use crate::{
    error::AppError,
    grading,
    models::question::{SubmitAnswerRequest, SubmitAnswerResponse},
    state::SharedStore,
};

/// Grades a submitted answer and records it on the question.
///
/// * Compares trimmed, case-folded text against the reference answer.
/// * Stores the raw answer, or the skip sentinel when it is blank.
/// * Persists answer, verdict and review time in one write.
pub async fn submit_answer(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    req: Result<Json<SubmitAnswerRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let Json(req) = req?;
    let user_answer = req.user_answer.unwrap_or_default();
    let question = store.get(id).await?;

    let grade = grading::evaluate(&user_answer, &question.correct_answer);
    let is_correct = grade.is_correct;
    if grade.is_skipped() {
        tracing::debug!("Question {} skipped", id);
    }

    let question = store.record_answer(id, grade.into_record(Utc::now())).await?;

    Ok(Json(SubmitAnswerResponse {
        question,
        is_correct,
    }))
}
