//! Content module - documents read from and written to the content store

mod block;
mod post;

pub use block::{Block, CodeBlock, MarkDef, Span, TextBlock};
pub use post::{Author, Comment, ImageAsset, ImageRef, NewComment, Post, Reference, Slug};
