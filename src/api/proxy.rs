//! Upstream pass-through
//!
//! Requests under `/api/*` that the gateway does not handle itself are
//! forwarded to the configured backend service as-is, cookies included, so
//! the frontend can talk to one origin. An unreachable backend maps to 502.

use std::sync::Arc;

use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::ApiState;
use crate::{Error, Result};

/// Largest request body the proxy will buffer
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Hop-by-hop headers that must not be copied through
const EXCLUDED_HEADERS: [&str; 4] = [
    "content-encoding",
    "content-length",
    "transfer-encoding",
    "connection",
];

/// Forwards requests to the upstream backend
pub struct UpstreamProxy {
    client: reqwest::Client,
    base: String,
}

impl UpstreamProxy {
    /// Create a proxy towards the given base URL
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(base: &str) -> Result<Self> {
        // The backend handles its own redirects; pass them through verbatim
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::Config(format!("failed to build proxy client: {e}")))?;

        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    /// Forward one request and translate the upstream response
    ///
    /// # Errors
    ///
    /// Returns error if the request body cannot be read or the upstream
    /// cannot be reached.
    pub async fn forward(&self, req: Request) -> Result<Response> {
        let (parts, body) = req.into_parts();

        let path_and_query = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path().to_string(), |pq| pq.as_str().to_string());
        let url = format!("{}{}", self.base, path_and_query);

        let body = to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| Error::InvalidRequest(format!("failed to read request body: {e}")))?;

        let mut headers = parts.headers;
        headers.remove(header::HOST);

        let upstream = self
            .client
            .request(parts.method, &url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = upstream.status();
        let mut response_headers = HeaderMap::new();
        for (name, value) in upstream.headers() {
            if !EXCLUDED_HEADERS.contains(&name.as_str()) {
                response_headers.append(name.clone(), value.clone());
            }
        }

        let bytes = upstream.bytes().await?;

        let mut response = (status, bytes).into_response();
        *response.headers_mut() = response_headers;
        Ok(response)
    }
}

/// Fallback handler: proxy `/api/*`, 404 everything else
pub async fn forward(State(state): State<Arc<ApiState>>, req: Request) -> Response {
    if !req.uri().path().starts_with("/api/") {
        return StatusCode::NOT_FOUND.into_response();
    }

    let Some(upstream) = &state.upstream else {
        tracing::debug!(path = %req.uri().path(), "no upstream configured");
        return StatusCode::NOT_FOUND.into_response();
    };

    match upstream.forward(req).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "upstream request failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({
                    "status": "error",
                    "message": "Erro de comunica\u{e7}\u{e3}o com o servidor principal da aplica\u{e7}\u{e3}o.",
                })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let proxy = UpstreamProxy::new("http://localhost:3000/").unwrap();
        assert_eq!(proxy.base, "http://localhost:3000");
    }

    #[test]
    fn hop_by_hop_headers_are_excluded() {
        assert!(EXCLUDED_HEADERS.contains(&"content-length"));
        assert!(!EXCLUDED_HEADERS.contains(&"set-cookie"));
        assert!(!EXCLUDED_HEADERS.contains(&"cookie"));
    }
}
