//! Single post fetch

use serde_json::json;

use super::queries;
use crate::client::{ClientError, ContentStore, QueryParams};
use crate::content::Post;

/// Outcome of looking up a post by slug
#[derive(Debug, Clone)]
pub enum PageOutcome {
    Found(Post),
    NotFound,
}

impl PageOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, PageOutcome::Found(_))
    }
}

/// Fetch one post with its author and approved comments
pub async fn fetch_post(store: &dyn ContentStore, slug: &str) -> Result<PageOutcome, ClientError> {
    let mut params = QueryParams::new();
    params.insert("slug".to_string(), json!(slug));

    let result = store.fetch(queries::POST_BY_SLUG, &params).await?;
    if result.is_null() {
        tracing::debug!("No post for slug {:?}", slug);
        return Ok(PageOutcome::NotFound);
    }

    let post: Post = serde_json::from_value(result)?;
    Ok(PageOutcome::Found(post))
}
