//! Helper functions shared by the page views
//!
//! Small HTML and date formatting utilities used when building markup.

mod date;
mod html;

pub use date::*;
pub use html::*;
