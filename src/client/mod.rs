//! Content store client
//!
//! [`ContentStore`] is the seam between the blog and the headless content
//! store. [`SanityClient`] talks to the real backend; pages and handlers only
//! see the trait, so an in-memory store can stand in for it under test.

mod error;
mod image;
#[cfg(test)]
pub mod memory;
mod sanity;

pub use error::ClientError;
pub use image::ImageUrlBuilder;
pub use sanity::SanityClient;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;

use crate::content::ImageRef;

/// Named query parameters, bound as `$name` in queries
pub type QueryParams = IndexMap<String, Value>;

/// A headless content store
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Run a read query and return its parsed result
    async fn fetch(&self, query: &str, params: &QueryParams) -> Result<Value, ClientError>;

    /// Create a document, returning its assigned `_id` and `_type`
    async fn create(&self, doc: Value) -> Result<Value, ClientError>;

    /// Resolve an image field to a fetchable URL
    fn image_url(&self, image: &ImageRef) -> Result<String, ClientError>;
}
