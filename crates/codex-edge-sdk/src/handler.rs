//! Route handler abstraction
//!
//! A handler receives the request plus the path parameters captured by its
//! route (`None` when the route declares no parameters) and produces a
//! response, either immediately or after awaiting other work.
//!
//! # Example
//!
//! ```
//! use codex_edge_sdk::prelude::*;
//!
//! let echo = handler::from_fn(|_req: Request, params: Option<Params>| async move {
//!     let name = params.and_then(|p| p.get("name").cloned()).unwrap_or_default();
//!     Ok(Response::text(200, name))
//! });
//!
//! let hello = handler::sync(|_req, _params| Ok(Response::text(200, "hello")));
//! # let _ = (echo, hello);
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use crate::error::HandlerResult;
use crate::Request;

/// Type alias for boxed future returned by handlers
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Path parameters captured by a route, keyed by parameter name
pub type Params = HashMap<String, String>;

/// Something the router can invoke for a matched request.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request, params: Option<Params>) -> BoxFuture<'static, HandlerResult>;
}

/// Handler backed by an async function or closure. See [`from_fn`].
#[derive(Clone)]
pub struct FnHandler<F> {
    f: F,
}

impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Request, Option<Params>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, req: Request, params: Option<Params>) -> BoxFuture<'static, HandlerResult> {
        Box::pin((self.f)(req, params))
    }
}

/// Wrap an async function or closure as a [`Handler`].
pub fn from_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(Request, Option<Params>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    FnHandler { f }
}

/// Handler backed by a synchronous function or closure. See [`sync`].
#[derive(Clone)]
pub struct SyncHandler<F> {
    f: F,
}

impl<F> Handler for SyncHandler<F>
where
    F: Fn(Request, Option<Params>) -> HandlerResult + Send + Sync + 'static,
{
    fn call(&self, req: Request, params: Option<Params>) -> BoxFuture<'static, HandlerResult> {
        Box::pin(std::future::ready((self.f)(req, params)))
    }
}

/// Wrap a synchronous function or closure as a [`Handler`].
pub fn sync<F>(f: F) -> SyncHandler<F>
where
    F: Fn(Request, Option<Params>) -> HandlerResult + Send + Sync + 'static,
{
    SyncHandler { f }
}
