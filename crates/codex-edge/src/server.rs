//! HTTP front end - converts between axum and SDK requests and responses
//!
//! Every method and path is forwarded to [`handle_request`]; routing
//! decisions are made by the per-request router, not by axum.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::app::{handle_request, AppContext};
use crate::config::AppConfig;

/// Build the axum application serving the API
///
/// Request bodies are never read; oversized ones are still rejected with
/// 413 before reaching the handler.
pub fn create_app(app: AppContext, config: &AppConfig) -> Router {
    Router::new()
        .route("/{*path}", any(handle_api_request))
        .route("/", any(handle_api_request))
        .with_state(Arc::new(app))
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(TraceLayer::new_for_http())
}

/// Handle an incoming request through the per-request router
async fn handle_api_request(
    State(app): State<Arc<AppContext>>,
    request: Request<Body>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().to_string();
    let url = absolute_url(&request);
    let headers = collect_headers(request.headers(), &request_id);

    let mut sdk_request = match codex_edge_sdk::Request::new(method, &url) {
        Ok(req) => req.with_request_id(request_id.clone()),
        Err(e) => {
            tracing::warn!(request_id = %request_id, url = %url, "Invalid request URL: {}", e);
            return (StatusCode::BAD_REQUEST, "Invalid request URL").into_response();
        }
    };
    sdk_request.headers = headers;

    tracing::debug!(
        request_id = %request_id,
        method = %sdk_request.method,
        path = %sdk_request.path(),
        "Incoming request"
    );

    let response = match handle_request(&app, sdk_request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(request_id = %request_id, "Handler error: {}", e);
            e.to_response()
        }
    };

    into_http_response(response)
}

/// Reconstruct the absolute URL the client asked for.
fn absolute_url(request: &Request<Body>) -> String {
    let uri = request.uri();
    if uri.scheme().is_some() {
        return uri.to_string();
    }

    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");

    format!("http://{}{}", host, path)
}

/// Flatten headers into the SDK map. Repeated headers are joined with
/// `", "`; values that are not visible ASCII are dropped.
fn collect_headers(headers: &HeaderMap, request_id: &str) -> HashMap<String, String> {
    let mut collected: HashMap<String, String> = HashMap::new();

    for (name, value) in headers {
        let Ok(value) = value.to_str() else {
            tracing::debug!(request_id = %request_id, header = %name, "Dropping non-ASCII header value");
            continue;
        };
        collected
            .entry(name.to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    collected
}

fn into_http_response(response: codex_edge_sdk::Response) -> Response {
    let mut builder = Response::builder()
        .status(StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR));

    for (key, value) in &response.headers {
        builder = builder.header(key, value);
    }

    match builder.body(Body::from(response.body.unwrap_or_default())) {
        Ok(response) => response,
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build response").into_response(),
    }
}
