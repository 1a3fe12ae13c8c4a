//! List post paths

use anyhow::Result;

use crate::page::enumerate_paths;
use crate::Blog;

/// Print every post path the store knows about
pub async fn run(blog: &Blog) -> Result<()> {
    let paths = enumerate_paths(blog.store.as_ref()).await?;

    println!("Posts ({}):", paths.paths.len());
    for path in &paths.paths {
        println!("  {}", path);
    }

    Ok(())
}
