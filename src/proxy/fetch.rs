//! Fetch Primitive
//!
//! The outbound network seam the proxy talks through. `HttpFetcher`
//! backs it with a real HTTP client; tests script their own.

use axum::http::Method;
use tracing::debug;

use crate::error::{GovernorError, Result};
use crate::proxy::{FetchRequest, FetchResponse, ResponseKind};

// == Fetch Trait ==
/// Issues one outbound request and settles with a fully-read response.
///
/// Cancellation rides on the future: dropping it abandons the request,
/// and the proxy never swallows that.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse>;
}

// == HTTP Fetcher ==
/// reqwest-backed fetcher.
///
/// Responses whose final URL sits under `origin` are classed as `Basic`;
/// anything else is `Cors`. Root-relative request URLs are resolved
/// against `origin` first.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    origin: String,
}

impl HttpFetcher {
    // == Constructor ==
    /// Creates a fetcher rooted at `origin` (scheme + authority, no
    /// trailing slash).
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            origin: origin.into(),
        }
    }

    fn absolute_url(&self, url: &str) -> String {
        if url.starts_with('/') {
            format!("{}{}", self.origin, url)
        } else {
            url.to_string()
        }
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        let url = self.absolute_url(&request.url);
        debug!("fetching {} {}", request.method, url);

        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .unwrap_or(reqwest::Method::GET);

        let response = self
            .client
            .request(method, &url)
            .send()
            .await
            .map_err(|err| GovernorError::FetchFailed {
                url: request.url.clone(),
                reason: err.to_string(),
            })?;

        let status = response.status().as_u16();
        let kind = if response.url().as_str().starts_with(&self.origin) {
            ResponseKind::Basic
        } else {
            ResponseKind::Cors
        };
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|err| GovernorError::FetchFailed {
                url: request.url.clone(),
                reason: err.to_string(),
            })?
            .to_vec();

        Ok(FetchResponse {
            status,
            kind,
            content_type,
            body,
        })
    }
}

/// True when `method` is an interceptable read.
pub(crate) fn is_read(method: &Method) -> bool {
    *method == Method::GET
}
