//! Remove prerendered post pages

use anyhow::Result;
use std::fs;

use crate::Blog;

/// Delete `public/post`, leaving other static files in place
pub fn run(blog: &Blog) -> Result<()> {
    let posts_dir = blog.public_dir.join("post");
    if posts_dir.exists() {
        fs::remove_dir_all(&posts_dir)?;
        tracing::info!("Deleted: {:?}", posts_dir);
    }

    Ok(())
}
