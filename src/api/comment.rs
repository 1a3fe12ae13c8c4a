//! `POST /api/createComment`

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::CommentPayload;
use crate::client::{ClientError, ContentStore};
use crate::content::NewComment;
use crate::server::AppState;

/// Error body: `{ message, err }`
#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub message: String,
    pub err: Value,
}

impl ErrorPayload {
    fn response(status: StatusCode, message: &str, err: Value) -> Response {
        let body = ErrorPayload {
            message: message.to_string(),
            err,
        };
        (status, Json(body)).into_response()
    }
}

/// Persist a new unapproved comment linked to `payload.post_id`
///
/// Returns the id of the created document. Every call creates a new record;
/// repeated submissions are not deduplicated.
pub async fn write_comment(
    store: &dyn ContentStore,
    payload: &CommentPayload,
) -> Result<String, ClientError> {
    let doc = NewComment::new(
        &payload.post_id,
        &payload.name,
        &payload.email,
        &payload.comment,
    );
    let created = store.create(serde_json::to_value(doc)?).await?;
    let id = created
        .get("_id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    tracing::info!("Comment {} created for post {}", id, payload.post_id);
    Ok(id)
}

/// Comment Writer endpoint
///
/// The body is read as text and parsed as JSON regardless of content type.
pub async fn create_comment(State(state): State<Arc<AppState>>, body: String) -> Response {
    let payload: CommentPayload = match serde_json::from_str(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!("Rejected comment body: {}", e);
            return ErrorPayload::response(
                StatusCode::BAD_REQUEST,
                "Malformed comment payload",
                json!({ "kind": "decode", "detail": e.to_string() }),
            );
        }
    };

    let missing = payload.missing_fields();
    if !missing.is_empty() {
        let fields: Vec<_> = missing.iter().map(|f| f.key()).collect();
        return ErrorPayload::response(
            StatusCode::BAD_REQUEST,
            "Missing required fields",
            json!({ "kind": "validation", "fields": fields }),
        );
    }

    match write_comment(state.store.as_ref(), &payload).await {
        Ok(_) => StatusCode::OK.into_response(),
        Err(e) => {
            tracing::error!("Couldn't submit comment for post {}: {}", payload.post_id, e);
            ErrorPayload::response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Couldn't submit comment",
                e.to_json(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::memory::MemoryStore;
    use crate::config::SiteConfig;
    use crate::page::{fetch_post, PageOutcome};
    use crate::server::router;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn state(store: Arc<MemoryStore>) -> Arc<AppState> {
        Arc::new(AppState::new(SiteConfig::default(), store))
    }

    fn request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/createComment")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const JANE: &str =
        r#"{"_id":"post1","name":"Jane","email":"jane@x.com","comment":"Great read!"}"#;

    #[tokio::test]
    async fn test_creates_one_unapproved_comment() {
        let store = Arc::new(MemoryStore::with_posts(&[("post1", "hello", "Hello")]));
        let app = router(state(store.clone()));

        let response = app.oneshot(request(JANE)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());

        let comments = store.comments();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0]["approved"], false);
        assert_eq!(comments[0]["post"]["_ref"], "post1");
        assert_eq!(comments[0]["post"]["_type"], "reference");
        assert_eq!(comments[0]["name"], "Jane");
    }

    #[tokio::test]
    async fn test_resubmission_creates_duplicates() {
        let store = Arc::new(MemoryStore::with_posts(&[("post1", "hello", "Hello")]));
        let state = state(store.clone());

        for _ in 0..2 {
            let response = router(state.clone()).oneshot(request(JANE)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(store.comments().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let app = router(state(store.clone()));

        let response = app.oneshot(request("not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["err"]["kind"], "decode");
        assert_eq!(store.create_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_fields_are_rejected() {
        let store = Arc::new(MemoryStore::new());
        let app = router(state(store.clone()));

        let response = app
            .oneshot(request(r#"{"_id":"post1","name":"Jane","email":"jane@x.com"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["err"]["fields"], json!(["comment"]));
        assert_eq!(store.create_count(), 0);
    }

    #[tokio::test]
    async fn test_write_failure_returns_500() {
        let store = Arc::new(MemoryStore::new());
        store.fail_writes(true);
        let app = router(state(store.clone()));

        let response = app.oneshot(request(JANE)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Couldn't submit comment");
        assert_eq!(body["err"]["kind"], "status");
    }

    #[tokio::test]
    async fn test_comment_visible_only_after_approval() {
        let store = Arc::new(MemoryStore::with_posts(&[("post1", "hello", "Hello")]));
        let app = router(state(store.clone()));

        let response = app.oneshot(request(JANE)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let PageOutcome::Found(post) = fetch_post(store.as_ref(), "hello").await.unwrap() else {
            panic!("expected post");
        };
        assert!(post.comments.is_empty());

        let id = store.comments()[0]["_id"].as_str().unwrap().to_string();
        store.approve(&id);

        let PageOutcome::Found(post) = fetch_post(store.as_ref(), "hello").await.unwrap() else {
            panic!("expected post");
        };
        assert_eq!(post.comments.len(), 1);
        assert_eq!(post.comments[0].name, "Jane");
        assert_eq!(post.comments[0].comment, "Great read!");
    }
}
