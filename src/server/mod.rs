//! HTTP server: post pages, comment form and the comment endpoint

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::{self, CommentPayload};
use crate::client::ContentStore;
use crate::config::SiteConfig;
use crate::page::{
    enumerate_paths, render_error, render_not_found, CommentForm, PageOutcome, PostCache, PostView,
    WriterSubmitter,
};
use crate::render::RichTextRenderer;
use crate::Blog;

/// State shared by every request
pub struct AppState {
    pub config: SiteConfig,
    pub store: Arc<dyn ContentStore>,
    pub cache: PostCache,
    pub renderer: RichTextRenderer,
}

impl AppState {
    pub fn new(config: SiteConfig, store: Arc<dyn ContentStore>) -> Self {
        let cache = PostCache::new(Duration::from_secs(config.revalidate));
        Self {
            config,
            store,
            cache,
            renderer: RichTextRenderer::post_body(),
        }
    }

    /// Fetch every enumerated post into the cache
    pub async fn warm(&self) -> Result<usize> {
        let paths = enumerate_paths(self.store.as_ref()).await?;
        let mut warmed = 0;
        for slug in paths.slugs() {
            match self.cache.get_or_fetch(&self.store, &slug).await {
                Ok(PageOutcome::Found(_)) => warmed += 1,
                Ok(PageOutcome::NotFound) => {}
                Err(e) => tracing::warn!("Failed to prerender {}: {}", slug, e),
            }
        }
        Ok(warmed)
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let public_dir = state.config.public_dir.clone();

    Router::new()
        .route("/post/:slug", get(post_page).post(submit_comment))
        .route("/api/createComment", post(api::create_comment))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let mut config = blog.config.clone();
    config.public_dir = blog.public_dir.to_string_lossy().into_owned();
    let state = Arc::new(AppState::new(config, blog.store.clone()));

    match state.warm().await {
        Ok(count) => tracing::info!("Prerendered {} posts", count),
        Err(e) => tracing::warn!("Path enumeration failed, pages will render on demand: {}", e),
    }

    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Look up a post, mapping the outcome to an error page when absent
async fn load_post(state: &AppState, slug: &str) -> Result<crate::content::Post, Response> {
    match state.cache.get_or_fetch(&state.store, slug).await {
        Ok(PageOutcome::Found(post)) => Ok(post),
        Ok(PageOutcome::NotFound) => {
            Err((StatusCode::NOT_FOUND, Html(render_not_found(&state.config))).into_response())
        }
        Err(e) => {
            tracing::error!("Failed to load post {:?}: {}", slug, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_error(&state.config)),
            )
                .into_response())
        }
    }
}

fn render_page(state: &AppState, post: &crate::content::Post, form: &CommentForm) -> Response {
    let view = PostView {
        config: &state.config,
        store: state.store.as_ref(),
        renderer: &state.renderer,
        post,
        form,
    };
    Html(view.render()).into_response()
}

/// `GET /post/:slug`
async fn post_page(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    let post = match load_post(&state, &slug).await {
        Ok(post) => post,
        Err(response) => return response,
    };
    render_page(&state, &post, &CommentForm::new(&post.id))
}

/// `POST /post/:slug`: urlencoded comment form
async fn submit_comment(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Form(mut input): Form<CommentPayload>,
) -> Response {
    let post = match load_post(&state, &slug).await {
        Ok(post) => post,
        Err(response) => return response,
    };

    // The comment always belongs to the page it was posted on
    input.post_id = post.id.clone();
    let mut form = CommentForm::with_input(input);
    form.submit(&WriterSubmitter::new(state.store.as_ref()))
        .await;

    render_page(&state, &post, &form)
}
