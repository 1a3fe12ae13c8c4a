//! Server endpoints

mod comment;
mod payload;

pub use comment::{create_comment, write_comment, ErrorPayload};
pub use payload::{CommentPayload, Field};
