//! Comment form state
//!
//! ```text
//! Editing --(valid, submit)--> Pending --(ok)----> Submitted
//!    ^                            |
//!    +--(invalid)                 +--(error)--> Failed --(submit)--> ...
//! ```
//!
//! A form that fails validation never reaches the submitter.

use async_trait::async_trait;

use crate::api::{write_comment, CommentPayload, Field};
use crate::client::{ClientError, ContentStore};

/// Where a comment form is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Pending,
    Submitted,
    Failed,
}

/// Sends a validated comment to the Comment Writer
#[async_trait]
pub trait CommentSubmitter: Send + Sync {
    async fn submit(&self, payload: &CommentPayload) -> Result<(), ClientError>;
}

/// Submits in-process through the content store
pub struct WriterSubmitter<'a> {
    store: &'a dyn ContentStore,
}

impl<'a> WriterSubmitter<'a> {
    pub fn new(store: &'a dyn ContentStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<'a> CommentSubmitter for WriterSubmitter<'a> {
    async fn submit(&self, payload: &CommentPayload) -> Result<(), ClientError> {
        write_comment(self.store, payload).await.map(|_| ())
    }
}

/// A reader's comment form for one post
#[derive(Debug, Clone)]
pub struct CommentForm {
    pub input: CommentPayload,
    state: FormState,
    errors: Vec<Field>,
}

impl CommentForm {
    /// Empty form for `post_id`
    pub fn new(post_id: &str) -> Self {
        Self::with_input(CommentPayload {
            post_id: post_id.to_string(),
            ..Default::default()
        })
    }

    /// Form holding what the reader typed
    pub fn with_input(input: CommentPayload) -> Self {
        Self {
            input,
            state: FormState::Editing,
            errors: Vec::new(),
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Fields that blocked the last submission
    pub fn errors(&self) -> &[Field] {
        &self.errors
    }

    /// Check that every field is filled in
    pub fn validate(&self) -> Result<&CommentPayload, Vec<Field>> {
        let missing = self.input.missing_fields();
        if missing.is_empty() {
            Ok(&self.input)
        } else {
            Err(missing)
        }
    }

    /// Validate and send the comment, returning the resulting state
    pub async fn submit(&mut self, submitter: &dyn CommentSubmitter) -> FormState {
        if self.state == FormState::Submitted {
            return self.state;
        }

        let missing = self.input.missing_fields();
        if !missing.is_empty() {
            self.errors = missing;
            self.state = FormState::Editing;
            return self.state;
        }

        self.errors.clear();
        self.state = FormState::Pending;

        self.state = match submitter.submit(&self.input).await {
            Ok(()) => FormState::Submitted,
            Err(e) => {
                tracing::warn!("Comment submission failed: {}", e);
                FormState::Failed
            }
        };
        self.state
    }
}
