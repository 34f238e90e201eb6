//! Request router
//!
//! Routes are registered up front and matched in registration order; the
//! first route whose method and path both match handles the request. When
//! nothing matches the router answers `404 No route found for <url>` itself.
//!
//! Registration takes `&mut self` and dispatch takes `&self`, so the route
//! table cannot change once requests are being dispatched against it. The
//! intended lifecycle is: build the table, then dispatch.
//!
//! # Example
//!
//! ```
//! use codex_edge_sdk::prelude::*;
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let mut router = Router::new();
//! router
//!     .get("/post/:postName", handler::sync(|_req, params| {
//!         let name = params.and_then(|p| p.get("postName").cloned()).unwrap_or_default();
//!         Ok(Response::text(200, name))
//!     }))
//!     .unwrap();
//!
//! let req = Request::get("http://example.com/post/hello-there").unwrap();
//! let res = router.handle_route(&req).await.unwrap();
//! assert_eq!(res.body.as_deref(), Some("hello-there"));
//! # });
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{HandlerResult, RouterError};
use crate::handler::Handler;
use crate::pattern::{CompiledPattern, Pattern};
use crate::{Request, Response};

/// HTTP methods a route can be registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Options => "OPTIONS",
        }
    }

    /// Case-insensitive comparison against a raw request method.
    pub fn matches(&self, method: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(method)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Method::Get.matches(s) {
            Ok(Method::Get)
        } else if Method::Options.matches(s) {
            Ok(Method::Options)
        } else {
            Err(format!("Unsupported method: {}", s))
        }
    }
}

/// One registered endpoint
pub struct Route {
    matcher: CompiledPattern,
    method: Method,
    name: String,
    handler: Arc<dyn Handler>,
}

impl Route {
    /// String form of the pattern the route was registered with
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn param_names(&self) -> &[String] {
        self.matcher.param_names()
    }

    pub fn matcher(&self) -> &CompiledPattern {
        &self.matcher
    }

    fn matches(&self, req: &Request) -> bool {
        self.method.matches(&req.method) && self.matcher.is_match(req.path())
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("method", &self.method)
            .field("matcher", &self.matcher.as_str())
            .field("param_names", &self.matcher.param_names())
            .finish()
    }
}

/// Ordered route table with first-match dispatch
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a GET route.
    pub fn get(
        &mut self,
        pattern: impl Into<Pattern>,
        handler: impl Handler,
    ) -> Result<(), RouterError> {
        self.route(Method::Get, pattern, handler)
    }

    /// Register a route for an explicit method.
    ///
    /// Fails with [`RouterError::DuplicateRoute`] when a route with the same
    /// name exists (regardless of method) and with
    /// [`RouterError::InvalidPattern`] when the pattern cannot be compiled.
    /// The table is untouched on failure.
    pub fn route(
        &mut self,
        method: Method,
        pattern: impl Into<Pattern>,
        handler: impl Handler,
    ) -> Result<(), RouterError> {
        let pattern: Pattern = pattern.into();
        let name = pattern.name();

        if self.routes.iter().any(|r| r.name == name) {
            return Err(RouterError::DuplicateRoute(name));
        }

        let matcher = pattern.compile()?;

        tracing::debug!(
            method = %method,
            route = %name,
            matcher = %matcher.as_str(),
            "Registered route"
        );

        self.routes.push(Route {
            matcher,
            method,
            name,
            handler: Arc::new(handler),
        });
        Ok(())
    }

    /// Registered routes in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Test a pattern and method against a request without dispatching.
    ///
    /// A pattern that fails to compile never matches.
    pub fn matches(&self, pattern: impl Into<Pattern>, method: Method, req: &Request) -> bool {
        if !method.matches(&req.method) {
            return false;
        }
        let pattern: Pattern = pattern.into();
        pattern
            .compile()
            .map(|compiled| compiled.is_match(req.path()))
            .unwrap_or(false)
    }

    /// Dispatch a request to the first matching route.
    ///
    /// Exactly one handler is invoked per call, or none when no route
    /// matches. Any `Err` comes from that handler and is returned as-is.
    pub async fn handle_route(&self, req: &Request) -> HandlerResult {
        let Some(route) = self.routes.iter().find(|r| r.matches(req)) else {
            tracing::debug!(
                method = %req.method,
                path = %req.path(),
                "No route found"
            );
            return Ok(not_found(req));
        };

        let params = if route.param_names().is_empty() {
            None
        } else {
            let extracted = route.matcher.extract(req.path());
            if extracted.is_none() {
                tracing::error!(
                    route = %route.name,
                    path = %req.path(),
                    "Route matched but parameter extraction failed"
                );
            }
            extracted
        };

        tracing::debug!(
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path(),
            route = %route.name,
            "Dispatching request"
        );

        route.handler.call(req.clone(), params).await
    }
}

fn not_found(req: &Request) -> Response {
    Response::not_found_msg(format!("No route found for {}", req.url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{self, Params};
    use crate::HandlerError;
    use regex_lite::Regex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn text(body: &'static str) -> impl Handler {
        handler::sync(move |_, _| Ok(Response::text(200, body)))
    }

    fn get(url: &str) -> Request {
        Request::get(url).unwrap()
    }

    #[test]
    fn test_register_get_route() {
        let mut router = Router::new();
        router.get("/one", text("one")).unwrap();

        assert_eq!(router.len(), 1);
        assert_eq!(router.routes()[0].name(), "/one");
        assert_eq!(router.routes()[0].method(), Method::Get);
    }

    #[test]
    fn test_multiple_routes_keep_registration_order() {
        let mut router = Router::new();
        for route in ["/one", "/two", "/three"] {
            router.get(route, text(route)).unwrap();
        }

        let names: Vec<&str> = router.routes().iter().map(Route::name).collect();
        assert_eq!(names, ["/one", "/two", "/three"]);
    }

    #[test]
    fn test_duplicate_route_rejected() {
        let mut router = Router::new();
        router.get("/same", text("first")).unwrap();

        let err = router.get("/same", text("second")).unwrap_err();
        assert_eq!(err, RouterError::DuplicateRoute("/same".into()));
        assert_eq!(router.len(), 1);

        // different method, same name: still a duplicate
        let err = router.route(Method::Options, "/same", text("third")).unwrap_err();
        assert!(matches!(err, RouterError::DuplicateRoute(_)));
        assert_eq!(router.len(), 1);
    }

    #[test]
    fn test_duplicate_check_uses_string_form() {
        // Duplicates are decided by the pattern's string form, not by the
        // compiled matcher: these two compile to the same expression.
        let mut router = Router::new();
        router.get("/posts/:slug", text("slug")).unwrap();
        router.get("/posts/:id", text("id")).unwrap();
        assert_eq!(
            router.routes()[0].matcher().as_str(),
            router.routes()[1].matcher().as_str()
        );
        assert_eq!(router.len(), 2);

        // an expression and a literal with the same source are also distinct
        router.get(Regex::new("/x").unwrap(), text("re")).unwrap();
        router.get("/x", text("lit")).unwrap();
        assert_eq!(router.len(), 4);
    }

    #[test]
    fn test_invalid_pattern_leaves_table_unchanged() {
        let mut router = Router::new();
        router.get("/ok", text("ok")).unwrap();

        let err = router.get("/bad[", text("bad")).unwrap_err();
        assert!(matches!(err, RouterError::InvalidPattern { .. }));
        assert_eq!(router.len(), 1);

        // declared parameterized but carrying no tokens
        let err = router
            .get(Pattern::Parameterized("/no-tokens".into()), text("none"))
            .unwrap_err();
        assert!(matches!(err, RouterError::InvalidPattern { ref pattern, .. } if pattern == "/no-tokens"));
        assert_eq!(router.len(), 1);
        assert!(router.get("/no-tokens", text("literal")).is_ok());
    }

    #[tokio::test]
    async fn test_empty_router_returns_404() {
        let router = Router::new();
        let res = router.handle_route(&get("http://example.com/found")).await.unwrap();

        assert_eq!(res.status, 404);
        assert_eq!(
            res.body.as_deref(),
            Some("No route found for http://example.com/found")
        );
    }

    #[tokio::test]
    async fn test_unmatched_route_returns_404_without_calling_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut router = Router::new();
        router
            .get("/should-404", handler::sync(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Response::text(200, "didn't 404"))
            }))
            .unwrap();

        let res = router
            .handle_route(&get("http://example.com/found?x=1"))
            .await
            .unwrap();
        assert_eq!(res.status, 404);
        assert_eq!(
            res.body.as_deref(),
            Some("No route found for http://example.com/found?x=1")
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_match_strings() {
        let router = Router::new();
        assert!(!router.matches("/o", Method::Get, &get("http://example.com/a")));
        assert!(router.matches("/a/b/c", Method::Get, &get("http://example.com/a/b/c")));
        assert!(router.matches("/test", Method::Get, &get("http://example.com/test")));
    }

    #[test]
    fn test_match_expression() {
        let router = Router::new();
        let re = Regex::new("/test").unwrap();
        assert!(router.matches(&re, Method::Get, &get("http://example.com/test")));
    }

    #[test]
    fn test_match_ignores_query_and_host() {
        let router = Router::new();
        let req = get("https://other.host:8443/test?path=/nope");
        assert!(router.matches("/test", Method::Get, &req));
        assert!(!router.matches("/test", Method::Options, &req));
    }

    #[test]
    fn test_match_method_case_insensitive() {
        let router = Router::new();
        let req = Request::new("get", "http://example.com/test").unwrap();
        assert!(router.matches("/test", Method::Get, &req));

        let req = Request::new("options", "http://example.com/test").unwrap();
        assert!(router.matches("/test", Method::Options, &req));
        assert!(!router.matches("/test", Method::Get, &req));
    }

    #[test]
    fn test_match_invalid_pattern_is_false() {
        let router = Router::new();
        assert!(!router.matches("/bad(", Method::Get, &get("http://example.com/bad(")));
    }

    #[tokio::test]
    async fn test_respond_to_get_request() {
        let mut router = Router::new();
        router.get("/hello-world", text("It works")).unwrap();

        let res = router
            .handle_route(&get("http://example.com/hello-world"))
            .await
            .unwrap();
        assert_eq!(res.status, 200);
        assert_eq!(res.body.as_deref(), Some("It works"));

        let res = router
            .handle_route(&get("http://example.com/hello-world/extra"))
            .await
            .unwrap();
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn test_match_root_route() {
        let mut router = Router::new();
        router.get("/", text("hi")).unwrap();

        for url in ["http://example.com", "http://example.com/"] {
            let req = Request::new("get", url).unwrap();
            let res = router.handle_route(&req).await.unwrap();
            assert_eq!(res.body.as_deref(), Some("hi"), "url: {}", url);
        }
    }

    #[tokio::test]
    async fn test_variable_params() {
        let mut router = Router::new();
        router
            .get(
                "/post/:postName",
                handler::from_fn(|_req, params: Option<Params>| async move {
                    let name = params
                        .and_then(|p| p.get("postName").cloned())
                        .unwrap_or_default();
                    Ok(Response::text(200, name))
                }),
            )
            .unwrap();

        let req = Request::new("get", "http://example.com/post/hello-there").unwrap();
        let res = router.handle_route(&req).await.unwrap();
        assert_eq!(res.body.as_deref(), Some("hello-there"));
    }

    #[tokio::test]
    async fn test_literal_route_gets_no_params() {
        let mut router = Router::new();
        router
            .get("/plain", handler::sync(|_, params| {
                Ok(Response::text(200, format!("{}", params.is_none())))
            }))
            .unwrap();

        let res = router.handle_route(&get("http://example.com/plain")).await.unwrap();
        assert_eq!(res.body.as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn test_first_registered_route_wins() {
        let shadowed = Arc::new(AtomicUsize::new(0));
        let counter = shadowed.clone();

        let mut router = Router::new();
        router.get(Regex::new(r"^/a/.*$").unwrap(), text("expression")).unwrap();
        router
            .get("/a/b/c", handler::sync(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Response::text(200, "literal"))
            }))
            .unwrap();

        let res = router.handle_route(&get("http://example.com/a/b/c")).await.unwrap();
        assert_eq!(res.body.as_deref(), Some("expression"));
        assert_eq!(shadowed.load(Ordering::SeqCst), 0);

        let mut router = Router::new();
        router.get("/a/b/c", text("literal")).unwrap();
        router.get(Regex::new(r"^/a/.*$").unwrap(), text("expression")).unwrap();

        let res = router.handle_route(&get("http://example.com/a/b/c")).await.unwrap();
        assert_eq!(res.body.as_deref(), Some("literal"));
    }

    #[tokio::test]
    async fn test_method_mismatch_falls_through() {
        let mut router = Router::new();
        router.route(Method::Options, "/posts", text("preflight")).unwrap();
        // names are unique across methods, so the GET side needs another name
        router.get("/posts", text("list")).unwrap_err();
        router.get(Regex::new("^/posts$").unwrap(), text("list")).unwrap();

        let res = router.handle_route(&get("http://example.com/posts")).await.unwrap();
        assert_eq!(res.body.as_deref(), Some("list"));

        let req = Request::new("OPTIONS", "http://example.com/posts").unwrap();
        let res = router.handle_route(&req).await.unwrap();
        assert_eq!(res.body.as_deref(), Some("preflight"));
    }

    #[tokio::test]
    async fn test_handler_error_propagates() {
        let mut router = Router::new();
        router
            .get("/fail", handler::sync(|_, _| Err(HandlerError::Unavailable("store down".into()))))
            .unwrap();
        router.get("/ok", text("ok")).unwrap();

        let err = router.handle_route(&get("http://example.com/fail")).await.unwrap_err();
        assert!(matches!(err, HandlerError::Unavailable(ref m) if m == "store down"));

        // one failing route does not affect the others
        let res = router.handle_route(&get("http://example.com/ok")).await.unwrap();
        assert_eq!(res.body.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn test_concurrent_dispatch() {
        let mut router = Router::new();
        router
            .get("/post/:slug", handler::from_fn(|_req, params: Option<Params>| async move {
                tokio::task::yield_now().await;
                Ok(Response::text(200, params.unwrap_or_default()["slug"].clone()))
            }))
            .unwrap();
        let router = Arc::new(router);

        let tasks: Vec<_> = ["a", "b", "c"]
            .into_iter()
            .map(|slug| {
                let router = router.clone();
                tokio::spawn(async move {
                    let req = get(&format!("http://example.com/post/{}", slug));
                    router.handle_route(&req).await.unwrap().body
                })
            })
            .collect();

        for (task, slug) in tasks.into_iter().zip(["a", "b", "c"]) {
            assert_eq!(task.await.unwrap().as_deref(), Some(slug));
        }
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("get".parse::<Method>(), Ok(Method::Get));
        assert_eq!("OPTIONS".parse::<Method>(), Ok(Method::Options));
        assert!("POST".parse::<Method>().is_err());
    }
}
