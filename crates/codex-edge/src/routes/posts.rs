use std::sync::Arc;

use codex_edge_sdk::prelude::*;

use super::cached_or;
use crate::cache::ResponseCache;
use crate::encoding::fix_utf8_encoding;
use crate::store::Post;

/// `GET /posts`: every post in the store.
pub fn handle_posts_route(posts: Arc<Vec<Post>>, cache: ResponseCache) -> impl Handler {
    handler::from_fn(move |req: Request, _params| {
        let posts = posts.clone();
        let cache = cache.clone();
        async move {
            cached_or(&cache, &req, || {
                let body = serde_json::to_string(posts.as_slice())?;
                Ok(Response::new(200).with_body(fix_utf8_encoding(&body)))
            })
            .await
        }
    })
}
