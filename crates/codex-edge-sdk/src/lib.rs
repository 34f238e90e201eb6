//! Codex Edge SDK - request routing for the Codex edge API
//!
//! This crate provides the request and response types, the handler
//! abstraction and the ordered, first-match [`Router`] that dispatches
//! requests to handlers by method and path.

pub mod error;
pub mod handler;
pub mod pattern;
pub mod request;
pub mod response;
pub mod router;

pub mod prelude {
    //! Common imports for route handlers
    pub use crate::error::{HandlerError, HandlerResult, RouterError};
    pub use crate::handler::{self, Handler, Params};
    pub use crate::pattern::Pattern;
    pub use crate::request::Request;
    pub use crate::response::Response;
    pub use crate::router::{Method, Router};
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{json, Value as JsonValue};
}

// Re-export key types at crate root
pub use error::{HandlerError, HandlerResult, RouterError};
pub use handler::{Handler, Params};
pub use pattern::Pattern;
pub use request::Request;
pub use response::Response;
pub use router::{Method, Router};
