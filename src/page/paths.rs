//! Path enumeration for prerendering

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;

use super::queries;
use crate::client::{ClientError, ContentStore, QueryParams};
use crate::content::Slug;

/// What to do with a slug that was not enumerated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Render on the first request and cache the result
    Blocking,
}

/// Result of path enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPaths {
    pub paths: Vec<String>,
    pub fallback: Fallback,
}

impl StaticPaths {
    /// Slugs behind the enumerated paths, decoded
    pub fn slugs(&self) -> impl Iterator<Item = String> + '_ {
        self.paths
            .iter()
            .filter_map(|p| p.strip_prefix(POST_PREFIX))
            .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
    }
}

const POST_PREFIX: &str = "/post/";

/// Everything but RFC 3986 unreserved characters is escaped in a path segment
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// URL path of a post page, with the slug encoded as one path segment
pub fn post_path(slug: &str) -> String {
    format!(
        "{}{}",
        POST_PREFIX,
        utf8_percent_encode(slug, SEGMENT_ENCODE_SET)
    )
}

#[derive(Debug, Deserialize)]
struct PathRow {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    slug: Option<Slug>,
}

/// List one page path per post slug
pub async fn enumerate_paths(store: &dyn ContentStore) -> Result<StaticPaths, ClientError> {
    let result = store.fetch(queries::POST_PATHS, &QueryParams::new()).await?;
    let rows: Vec<PathRow> = if result.is_null() {
        Vec::new()
    } else {
        serde_json::from_value(result)?
    };

    let paths = rows
        .into_iter()
        .filter_map(|row| match row.slug {
            Some(slug) if !slug.current.is_empty() => Some(post_path(&slug.current)),
            _ => {
                tracing::debug!("Post {} has no slug, skipping", row.id);
                None
            }
        })
        .collect();

    Ok(StaticPaths {
        paths,
        fallback: Fallback::Blocking,
    })
}
