// tests/router_tests.rs

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use cs_revision::{config::Config, create_router, state::AppState, store::MemoryQuestionStore};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    create_router(AppState::new(MemoryQuestionStore::new(), Config::default()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn create_returns_201_with_record() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/questions",
        Some(json!({"subject": "Math", "question": "2+2?", "correctAnswer": "4", "difficulty": "easy"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["subject"], "Math");
    assert!(body["id"].is_string());
}

#[tokio::test]
async fn validation_failure_is_400_with_message() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/questions",
        Some(json!({"subject": "Math", "question": "2+2?", "correctAnswer": "4", "difficulty": "extreme"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("extreme"));
}

#[tokio::test]
async fn malformed_id_is_404() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/questions/12345", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Question not found");
}

#[tokio::test]
async fn empty_store_lists_are_empty_arrays() {
    let app = app();

    let (status, questions) = send(&app, Method::GET, "/api/questions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(questions, json!([]));

    let (status, subjects) = send(&app, Method::GET, "/api/subjects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(subjects, json!([]));
}

#[tokio::test]
async fn submit_answer_response_shape() {
    let app = app();
    let (_, created) = send(
        &app,
        Method::POST,
        "/api/questions",
        Some(json!({"subject": "Math", "question": "2+2?", "correctAnswer": "4"})),
    )
    .await;
    let uri = format!("/api/questions/{}/answer", created["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::POST, &uri, Some(json!({"userAnswer": "five"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isCorrect"], false);
    assert_eq!(body["question"]["userAnswer"], "five");
    assert_eq!(body["question"]["isCorrect"], false);
    assert_eq!(body["question"]["correctAnswer"], "4");
}

#[tokio::test]
async fn cors_allows_configured_origin() {
    let app = app();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/questions")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:5173")
    );
}

async fn send_raw(app: &Router, method: Method, uri: &str, content_type: Option<&str>, body: &str) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn unreadable_bodies_are_400_with_message() {
    let app = app();
    let (_, created) = send(
        &app,
        Method::POST,
        "/api/questions",
        Some(json!({"subject": "Math", "question": "2+2?", "correctAnswer": "4"})),
    )
    .await;
    let item = format!("/api/questions/{}", created["id"].as_str().unwrap());

    let cases = [
        // Wrongly typed field
        (Method::POST, "/api/questions".to_string(), Some("application/json"),
            r#"{"subject": 5, "question": "q", "correctAnswer": "a"}"#),
        // Truncated JSON
        (Method::POST, "/api/questions".to_string(), Some("application/json"), r#"{"subject":"s""#),
        // No content type
        (Method::POST, "/api/questions".to_string(), None,
            r#"{"subject": "s", "question": "q", "correctAnswer": "a"}"#),
        (Method::PUT, item.clone(), Some("application/json"), r#"{"difficulty": 3}"#),
        (Method::POST, format!("{}/answer", item), Some("text/plain"), r#"{"userAnswer": "4"}"#),
    ];

    for (method, uri, content_type, body) in cases {
        let (status, error) = send_raw(&app, method.clone(), &uri, content_type, body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {} {:?}", method, uri, body);
        assert!(
            error["message"].as_str().is_some_and(|m| !m.is_empty()),
            "{} {} gave {}",
            method,
            uri,
            error
        );
    }

    // Nothing was written by the rejected requests
    let (_, questions) = send(&app, Method::GET, "/api/questions", None).await;
    assert_eq!(questions.as_array().map(|q| q.len()), Some(1));
    let (_, fetched) = send(&app, Method::GET, &item, None).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn null_user_answer_counts_as_skipped() {
    let app = app();
    let (_, created) = send(
        &app,
        Method::POST,
        "/api/questions",
        Some(json!({"subject": "Math", "question": "2+2?", "correctAnswer": "4"})),
    )
    .await;
    let uri = format!("/api/questions/{}/answer", created["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::POST, &uri, Some(json!({"userAnswer": null}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isCorrect"], false);
    assert_eq!(body["question"]["isAnswered"], true);
    assert_eq!(body["question"]["userAnswer"], cs_revision::grading::SKIPPED_ANSWER);
}
