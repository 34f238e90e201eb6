use std::sync::Arc;

use codex_edge_sdk::prelude::*;

use super::cached_or;
use crate::cache::ResponseCache;
use crate::encoding::fix_utf8_encoding;
use crate::store::Post;

/// `GET /posts/:slug`: a single post by slug.
pub fn handle_post_route(posts: Arc<Vec<Post>>, cache: ResponseCache) -> impl Handler {
    handler::from_fn(move |req: Request, params: Option<Params>| {
        let posts = posts.clone();
        let cache = cache.clone();
        async move {
            let Some(slug) = params.and_then(|p| p.get("slug").cloned()) else {
                return Ok(Response::not_found_msg("Need params"));
            };

            cached_or(&cache, &req, || {
                let Some(post) = posts.iter().find(|p| p.slug == slug) else {
                    return Ok(Response::not_found_msg(format!(
                        "The post {} cannot be found",
                        slug
                    )));
                };
                let body = serde_json::to_string(post)?;
                Ok(Response::new(200).with_body(fix_utf8_encoding(&body)))
            })
            .await
        }
    })
}
