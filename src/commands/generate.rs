//! Prerender post pages to static files

use anyhow::Result;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::page::{enumerate_paths, fetch_post, CommentForm, PageOutcome, PostView};
use crate::render::RichTextRenderer;
use crate::Blog;

/// Write `public/post/<slug>/index.html` for every enumerated post
///
/// Returns the number of pages written. A slug that no longer resolves, or
/// that is not a single plain path component, is skipped; any other store
/// error aborts the run.
pub async fn run(blog: &Blog) -> Result<usize> {
    let start = std::time::Instant::now();
    let store = blog.store.as_ref();
    let renderer = RichTextRenderer::post_body();

    let paths = enumerate_paths(store).await?;
    tracing::info!("Enumerated {} post paths", paths.paths.len());

    let mut written = 0;
    for slug in paths.slugs() {
        let Some(out_dir) = page_dir(&blog.public_dir, &slug) else {
            tracing::warn!("Post slug {:?} is not a valid directory name, skipping", slug);
            continue;
        };

        let post = match fetch_post(store, &slug).await? {
            PageOutcome::Found(post) => post,
            PageOutcome::NotFound => {
                tracing::warn!("Post {:?} disappeared during generation, skipping", slug);
                continue;
            }
        };

        let form = CommentForm::new(&post.id);
        let view = PostView {
            config: &blog.config,
            store,
            renderer: &renderer,
            post: &post,
            form: &form,
        };

        write_page(&out_dir, &view.render())?;
        tracing::debug!("Generated: {:?}", out_dir);
        written += 1;
    }

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} pages in {:.2}s",
        written,
        duration.as_secs_f64()
    );
    Ok(written)
}

/// `public/post/<slug>` when `slug` names exactly one directory
fn page_dir(public_dir: &Path, slug: &str) -> Option<PathBuf> {
    if slug.contains(['/', '\\']) {
        return None;
    }
    let mut components = Path::new(slug).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) => Some(public_dir.join("post").join(name)),
        _ => None,
    }
}

fn write_page(dir: &Path, html: &str) -> Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join("index.html"), html)?;
    Ok(())
}
