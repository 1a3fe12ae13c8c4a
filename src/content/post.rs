//! Post, Author and Comment models as returned by the content store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::Block;

/// A blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Document id
    #[serde(rename = "_id")]
    pub id: String,

    /// Creation timestamp
    #[serde(rename = "_createdAt")]
    pub created_at: DateTime<Utc>,

    /// Post title
    #[serde(default)]
    pub title: String,

    /// Short description shown under the title
    #[serde(default)]
    pub description: Option<String>,

    /// Hero image
    #[serde(rename = "mainImage", default)]
    pub main_image: Option<ImageRef>,

    /// URL path segment
    #[serde(default)]
    pub slug: Option<Slug>,

    /// Dereferenced author projection
    #[serde(default)]
    pub author: Option<Author>,

    /// Rich-text body
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: Vec<Block>,

    /// Approved comments, in query order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comments: Vec<Comment>,
}

impl Post {
    /// The slug value, if the post has one
    pub fn slug(&self) -> Option<&str> {
        self.slug
            .as_ref()
            .map(|s| s.current.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// Post author, referenced by the post and projected into it by the query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Option<ImageRef>,
}

/// A reader comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub comment: String,
    /// Set by moderators only
    #[serde(default)]
    pub approved: Option<bool>,
    /// Parent post
    #[serde(default)]
    pub post: Option<Reference>,
}

impl Comment {
    /// Whether a reader viewing `post_id` may see this comment
    pub fn is_visible_on(&self, post_id: &str) -> bool {
        self.approved == Some(true) && self.post.as_ref().is_some_and(|r| r.reference == post_id)
    }
}

/// Slug object (`{ current: "..." }`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    pub current: String,
}

/// A document reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "_type", default = "reference_type")]
    pub kind: String,
    #[serde(rename = "_ref")]
    pub reference: String,
}

impl Reference {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            kind: reference_type(),
            reference: id.into(),
        }
    }
}

fn reference_type() -> String {
    "reference".to_string()
}

/// An image field: an asset reference, optionally already expanded with a URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub asset: Option<ImageAsset>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// Asset part of an image field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    #[serde(rename = "_ref", default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl ImageRef {
    /// Image pointing at an asset id like `image-<hash>-<w>x<h>-<fmt>`
    pub fn from_asset(reference: impl Into<String>) -> Self {
        Self {
            asset: Some(ImageAsset {
                reference: Some(reference.into()),
                url: None,
            }),
            alt: None,
        }
    }
}

/// Comment document written by the comment endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewComment {
    #[serde(rename = "_type")]
    kind: &'static str,
    pub post: Reference,
    pub name: String,
    pub email: String,
    pub comment: String,
    pub approved: bool,
}

impl NewComment {
    /// Unapproved comment on `post_id`
    pub fn new(post_id: &str, name: &str, email: &str, comment: &str) -> Self {
        Self {
            kind: "comment",
            post: Reference::new(post_id),
            name: name.to_string(),
            email: email.to_string(),
            comment: comment.to_string(),
            approved: false,
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
