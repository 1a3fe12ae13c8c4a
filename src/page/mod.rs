//! Post page: path enumeration, post fetch, revalidation cache,
//! comment form and HTML view

mod cache;
mod fetch;
mod form;
mod paths;
pub mod queries;
mod view;

pub use cache::{CacheEntry, PostCache};
pub use fetch::{fetch_post, PageOutcome};
pub use form::{CommentForm, CommentSubmitter, FormState, WriterSubmitter};
pub use paths::{enumerate_paths, post_path, Fallback, StaticPaths};
pub use view::{layout, render_error, render_not_found, PostView};
