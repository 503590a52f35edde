//! The host-owned request context shared by the adapter and its jobs.
//!
//! The host engine creates one [`RequestContext`] per request and keeps it in
//! an `Arc`; the adapter and whichever concrete job it binds both hold clones
//! of that `Arc` and never own the request themselves.

use crate::ids::RequestId;
use http::Method;
use smallvec::SmallVec;
use std::sync::Arc;
use url::Url;

/// Maximum inline headers before heap allocation.
/// Most requests carry well under 16 headers.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage.
///
/// Header names use `Arc<str>` because the same names repeat across requests
/// (Content-Type, Accept, ...) and cloning them is an atomic increment rather
/// than a string copy. Values are per-request data and stay `String`.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Immutable description of the request the adapter was matched to.
#[derive(Debug)]
pub struct RequestContext {
    /// Unique request ID for tracing and correlation.
    pub request_id: RequestId,
    /// HTTP method (GET, POST, ...).
    pub method: Method,
    /// Full request URL; the scheme drives protocol-handler lookup.
    pub url: Url,
    /// Request headers (stack-allocated for ≤16 headers).
    pub headers: HeaderVec,
}

impl RequestContext {
    /// Create a context with no headers.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            url,
            headers: HeaderVec::new(),
        }
    }

    /// Create a context carrying the given headers.
    pub fn with_headers(method: Method, url: Url, headers: HeaderVec) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            url,
            headers,
        }
    }

    /// Get a header by name (case-insensitive per RFC 7230).
    #[inline]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// URL scheme, used as the protocol-registry key.
    #[inline]
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }
}
