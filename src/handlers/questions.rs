// src/handlers/questions.rs

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::question::{
        CreateQuestionRequest, MessageResponse, NewQuestion, QuestionChanges,
        UpdateQuestionRequest,
    },
    state::SharedStore,
};

/// Query parameters for listing questions.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub subject: Option<String>,
}

/// Parses a path identifier. Anything that is not a UUID cannot name a record.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::question_not_found())
}

/// Lists questions, newest first, optionally filtered by exact subject.
/// An empty `subject` means no filter.
pub async fn list_questions(
    State(store): State<SharedStore>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let subject = params.subject.as_deref().filter(|s| !s.is_empty());
    let questions = store.list(subject).await?;

    Ok(Json(questions))
}

/// Lists the distinct subjects.
pub async fn list_subjects(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    let subjects = store.list_subjects().await?;

    Ok(Json(subjects))
}

/// Retrieves a single question by ID.
pub async fn get_question(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let question = store.get(parse_id(&id)?).await?;

    Ok(Json(question))
}

/// Creates a question.
///
/// * Trims the text fields and rejects blank ones.
/// * Defaults difficulty to `medium`.
pub async fn create_question(
    State(store): State<SharedStore>,
    payload: Result<Json<CreateQuestionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let new = NewQuestion::try_from(payload)?;
    let question = store.create(new).await?;
    tracing::info!("Created question {} in subject '{}'", question.id, question.subject);

    Ok((StatusCode::CREATED, Json(question)))
}

/// Overwrites the provided fields of a question.
/// Validation runs before the store is touched, so a rejected update leaves the record as is.
pub async fn update_question(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateQuestionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let Json(payload) = payload?;
    let changes = QuestionChanges::try_from(payload)?;
    let question = store.update(id, changes).await?;

    Ok(Json(question))
}

/// Deletes a question permanently.
pub async fn delete_question(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    store.delete(id).await?;
    tracing::info!("Deleted question {}", id);

    Ok(Json(MessageResponse {
        message: "Question deleted successfully".to_string(),
    }))
}
