// src/client/mod.rs

//! Client-side data layer for the question service: an HTTP client, a
//! subject-keyed persistent cache, and the revision view state built on both.

use std::fmt;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

use crate::models::question::{
    CreateQuestionRequest, MessageResponse, Question, SubmitAnswerRequest, SubmitAnswerResponse,
    UpdateQuestionRequest,
};

pub mod cache;
pub mod revision;

pub use cache::{FileStore, KeyValueStore, MemoryStore, SubjectCache};
pub use revision::RevisionSession;

#[derive(Debug)]
pub enum ClientError {
    /// Transport failure or undecodable response body.
    Http(reqwest::Error),

    /// The service answered with a non-success status.
    Api { status: StatusCode, message: String },

    Url(url::ParseError),

    Io(std::io::Error),

    Json(serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Http(e) => write!(f, "request failed: {}", e),
            ClientError::Api { status, message } => write!(f, "{} ({})", message, status),
            ClientError::Url(e) => write!(f, "invalid url: {}", e),
            ClientError::Io(e) => write!(f, "storage error: {}", e),
            ClientError::Json(e) => write!(f, "invalid json: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err)
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::Url(err)
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Io(err)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Json(err)
    }
}

/// HTTP client for the question service.
#[derive(Debug, Clone)]
pub struct QuestionClient {
    http: reqwest::Client,
    base: Url,
}

impl QuestionClient {
    /// `base_url` is the service root, e.g. `http://127.0.0.1:5000`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { http, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }

    pub async fn list_questions(&self, subject: Option<&str>) -> Result<Vec<Question>, ClientError> {
        let mut url = self.endpoint("api/questions")?;
        if let Some(subject) = subject {
            url.query_pairs_mut().append_pair("subject", subject);
        }
        decode(self.http.get(url).send().await?).await
    }

    pub async fn list_subjects(&self) -> Result<Vec<String>, ClientError> {
        let url = self.endpoint("api/subjects")?;
        decode(self.http.get(url).send().await?).await
    }

    pub async fn get_question(&self, id: Uuid) -> Result<Question, ClientError> {
        let url = self.endpoint(&format!("api/questions/{}", id))?;
        decode(self.http.get(url).send().await?).await
    }

    pub async fn create_question(&self, req: &CreateQuestionRequest) -> Result<Question, ClientError> {
        let url = self.endpoint("api/questions")?;
        decode(self.http.post(url).json(req).send().await?).await
    }

    pub async fn update_question(
        &self,
        id: Uuid,
        req: &UpdateQuestionRequest,
    ) -> Result<Question, ClientError> {
        let url = self.endpoint(&format!("api/questions/{}", id))?;
        decode(self.http.put(url).json(req).send().await?).await
    }

    pub async fn delete_question(&self, id: Uuid) -> Result<String, ClientError> {
        let url = self.endpoint(&format!("api/questions/{}", id))?;
        let body: MessageResponse = decode(self.http.delete(url).send().await?).await?;
        Ok(body.message)
    }

    pub async fn submit_answer(
        &self,
        id: Uuid,
        user_answer: &str,
    ) -> Result<SubmitAnswerResponse, ClientError> {
        let url = self.endpoint(&format!("api/questions/{}/answer", id))?;
        let req = SubmitAnswerRequest {
            user_answer: Some(user_answer.to_string()),
        };
        decode(self.http.post(url).json(&req).send().await?).await
    }
}

/// Decodes a success body, or turns the service's `{"message"}` error body into `ClientError::Api`.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let message = response
        .json::<MessageResponse>()
        .await
        .map(|body| body.message)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string());

    Err(ClientError::Api { status, message })
}
