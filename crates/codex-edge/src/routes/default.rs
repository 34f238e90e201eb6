use codex_edge_sdk::prelude::*;

/// `GET /`: describes the API.
pub fn handle_default_route() -> impl Handler {
    handler::sync(|_req, _params| {
        Ok(Response::ok(json!({
            "name": "codex",
            "routes": ["/posts", "/posts/:slug"],
        })))
    })
}
