//! Per-request handling: load posts, build the router, dispatch, decorate.

use std::sync::Arc;

use codex_edge_sdk::{HandlerResult, Request, Router, RouterError};

use crate::cache::ResponseCache;
use crate::cors::CorsPolicy;
use crate::routes::{handle_default_route, handle_post_route, handle_posts_route};
use crate::store::{get_all_posts, KvStore, Post};

/// Collaborators injected into request handling
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<dyn KvStore>,
    pub cache: ResponseCache,
    pub cors: CorsPolicy,
}

impl AppContext {
    pub fn new(store: Arc<dyn KvStore>, cache: ResponseCache, cors: CorsPolicy) -> Self {
        Self { store, cache, cors }
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("cache", &self.cache)
            .field("cors", &self.cors)
            .finish_non_exhaustive()
    }
}

/// Register the API routes over a snapshot of the posts.
pub fn build_router(posts: Vec<Post>, cache: &ResponseCache) -> Result<Router, RouterError> {
    let posts = Arc::new(posts);
    let mut router = Router::new();

    router.get("/", handle_default_route())?;
    router.get("/posts", handle_posts_route(posts.clone(), cache.clone()))?;
    router.get("/posts/:slug", handle_post_route(posts, cache.clone()))?;

    Ok(router)
}

/// Handle one request end to end.
///
/// Errors are store failures, route table setup failures or handler
/// failures; the caller decides how to render them.
pub async fn handle_request(ctx: &AppContext, req: Request) -> HandlerResult {
    let posts = get_all_posts(ctx.store.as_ref()).await?;

    let router = build_router(posts, &ctx.cache).map_err(|e| {
        tracing::error!(error = %e, "Failed to build route table");
        codex_edge_sdk::HandlerError::Internal(e.to_string())
    })?;

    let mut response = router.handle_route(&req).await?;

    // clients should not mistake the response for plain text
    response.set_header("content-type", "application/json");
    ctx.cors.apply(&req, &mut response);

    Ok(response)
}
