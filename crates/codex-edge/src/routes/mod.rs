//! Route handlers for the posts API
//!
//! Each constructor closes over the collaborators the handler needs and
//! returns a value the router can register.

mod default;
mod post;
mod posts;

pub use default::handle_default_route;
pub use post::handle_post_route;
pub use posts::handle_posts_route;

use codex_edge_sdk::{HandlerResult, Request};

use crate::cache::ResponseCache;

/// Return the cached response for `req`, or compute a fresh one. Successful
/// fresh responses are cached; cache failures are logged and treated as
/// misses.
async fn cached_or<F>(cache: &ResponseCache, req: &Request, compute: F) -> HandlerResult
where
    F: FnOnce() -> HandlerResult,
{
    match cache.lookup(req).await {
        Ok(Some(res)) => return Ok(res),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Response cache lookup failed"),
    }

    let res = compute()?;
    if res.is_success() {
        if let Err(e) = cache.store(req, &res).await {
            tracing::warn!(error = %e, "Failed to cache response");
        }
    }
    Ok(res)
}
