//! Network I/O for the resource client.
//!
//! # Design
//! `Transport` is the single I/O seam: it takes an `HttpRequest` whose path
//! is relative to the base address and returns whatever the server said as
//! an `HttpResponse`. It never interprets status codes. `HttpTransport` is
//! the reqwest-backed implementation; tests substitute scripted transports.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE};
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP exchange.
///
/// Implementations must be safe to share between concurrent callers and hold
/// no per-request mutable state.
///
/// # Cancellation
/// Dropping the returned future stops waiting for the response but does not
/// guarantee the request was never delivered. A POST, PUT or DELETE that
/// already reached the server may still take effect.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport bound to one base address.
///
/// Cloning is cheap and clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::InvalidArgument(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a relative path against the base address. Paths that would
    /// leave the base (absolute URLs, `..` segments) or that do not resolve
    /// to exactly the segments they name (`.`, empty or encoded dot
    /// segments) are rejected.
    pub fn url_for(&self, path: &str) -> Result<Url, TransportError> {
        let invalid = |reason: &str| TransportError::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };
        let relative = path.trim_start_matches('/');
        let requested = relative.split('/').count();
        if relative
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(invalid("path has an empty or relative segment"));
        }

        let url = self
            .base_url
            .join(relative)
            .map_err(|e| invalid(&e.to_string()))?;
        let tail = match url.path().strip_prefix(self.base_url.path()) {
            Some(tail) if url.as_str().starts_with(self.base_url.as_str()) => tail,
            _ => return Err(invalid("path escapes the base address")),
        };
        if tail.split('/').count() != requested || tail.split('/').any(str::is_empty) {
            return Err(invalid("path does not resolve to the segments it names"));
        }
        Ok(url)
    }
}

/// Copy response headers. Values that are not valid UTF-8 are kept lossily.
fn collect_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

fn to_reqwest(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.url_for(&request.path)?;
        debug!(method = %request.method, %url, "sending request");

        let has_content_type = request
            .headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));

        let mut builder = self
            .http
            .request(to_reqwest(request.method), url)
            .header(ACCEPT, "application/json");
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            if !has_content_type {
                builder = builder.header(CONTENT_TYPE, "application/json");
            }
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?
            .to_vec();

        debug!(status, bytes = body.len(), "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
