//! Codex Edge - serves blog posts from a key-value store
//!
//! Each request is handled by building a fresh [`codex_edge_sdk::Router`]
//! over the current posts, dispatching to it, then adding content-type and
//! CORS headers to whatever it returns.

pub mod app;
pub mod cache;
pub mod config;
pub mod cors;
pub mod encoding;
pub mod routes;
pub mod server;
pub mod store;

pub use app::{handle_request, AppContext};
pub use config::AppConfig;
