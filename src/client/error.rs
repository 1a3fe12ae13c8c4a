//! Content store errors

use serde_json::{json, Value};
use thiserror::Error;

/// Errors returned by a [`ContentStore`](super::ContentStore)
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure talking to the content store
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The content store answered with a non-success status
    #[error("content store returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the JSON we expected
    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A mutation was attempted without a write token
    #[error("a write token is required to create documents")]
    MissingToken,

    /// The client was configured without a project id
    #[error("no content store project id configured")]
    MissingProjectId,

    /// The image field does not point at a resolvable asset
    #[error("invalid image reference: {0}")]
    InvalidImageRef(String),

    /// The store cannot answer this request
    #[error("unsupported request: {0}")]
    Unsupported(String),
}

impl ClientError {
    /// Short machine-readable name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Http(_) => "http",
            ClientError::Status { .. } => "status",
            ClientError::Decode(_) => "decode",
            ClientError::MissingToken => "missing_token",
            ClientError::MissingProjectId => "missing_project_id",
            ClientError::InvalidImageRef(_) => "invalid_image_ref",
            ClientError::Unsupported(_) => "unsupported",
        }
    }

    /// Diagnostic object for error payloads
    pub fn to_json(&self) -> Value {
        let mut err = json!({
            "kind": self.kind(),
            "detail": self.to_string(),
        });
        if let ClientError::Status { status, .. } = self {
            err["status"] = json!(status);
        }
        err
    }
}
