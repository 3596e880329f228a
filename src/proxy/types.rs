//! Proxy Request/Response Types
//!
//! Transport-neutral descriptors for the requests the proxy intercepts
//! and the responses it serves or caches.

use axum::http::Method;
use serde::Serialize;

// == Response Kind ==
/// Provenance class of a fetched response.
///
/// Only `Basic` (same-origin, fully readable) responses are eligible for
/// caching; `Cors` and `Opaque` responses are served but never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    /// Same-origin response with readable status and body
    Basic,
    /// Cross-origin response obtained with CORS
    Cors,
    /// Cross-origin response with no readable detail
    Opaque,
}

// == Fetch Request ==
/// An outbound request as seen at the interception boundary.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute or root-relative target URL
    pub url: String,
    /// True for top-level page navigations, which get an offline fallback
    pub is_navigation: bool,
}

impl FetchRequest {
    // == Constructors ==
    /// A plain GET for a sub-resource.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            is_navigation: false,
        }
    }

    /// A top-level page navigation.
    pub fn navigation(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            is_navigation: true,
        }
    }

    /// A request with an explicit method.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            is_navigation: false,
        }
    }
}

// == Fetch Response ==
/// A fetched response with a duplicable body.
///
/// The transport's body stream is read exactly once by the fetcher; from
/// then on duplication for cache writes is a `Clone`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,
    /// Provenance class
    pub kind: ResponseKind,
    /// Declared content type, if any
    pub content_type: Option<String>,
    /// Full response body
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// A successful same-origin response, the only cacheable shape.
    pub fn basic(body: impl Into<Vec<u8>>, content_type: Option<&str>) -> Self {
        Self {
            status: 200,
            kind: ResponseKind::Basic,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    /// True when the response may be written into the durable cache:
    /// status 200 and same-origin basic provenance.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.kind == ResponseKind::Basic
    }
}
