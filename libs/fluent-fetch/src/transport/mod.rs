//! Transport capability consumed by the request pipeline.
//!
//! A [`Transport`] performs the actual network call, the way a platform
//! `fetch` function does. The crate ships [`HyperTransport`] for real traffic
//! and [`transport_fn`] to turn any async closure into a transport.

mod config;
mod hyper_transport;
mod integrity;
mod redirect;
mod tls;
mod user_agent;

pub use config::{
    DEFAULT_MAX_REDIRECTS, DEFAULT_USER_AGENT, HyperTransportConfig, TlsRootConfig,
    TransportSecurity,
};
pub use hyper_transport::{HyperTransport, HyperTransportBuilder};

use crate::error::{TransportError, TransportErrorKind};
use crate::options::RequestOptions;
use crate::response::HttpResponse;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// The injected fetch-like capability: `(url, options) -> response | failure`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the call for an already resolved, absolute `url`.
    ///
    /// # Errors
    /// Returns `TransportError` when no response could be produced.
    async fn fetch(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<HttpResponse, TransportError>;
}

/// Decides whether a transport failure is a connectivity fault.
///
/// Swap it per platform through
/// [`Configurable::with_network_classifier`](crate::Configurable::with_network_classifier).
pub type NetworkClassifier = Arc<dyn Fn(&TransportError) -> bool + Send + Sync>;

/// Default classifier: a [`TransportErrorKind::Fetch`] failure whose message
/// contains "failed" (case-insensitive).
#[must_use]
pub fn is_network_failure(err: &TransportError) -> bool {
    err.kind() == TransportErrorKind::Fetch && err.message().to_lowercase().contains("failed")
}

pub(crate) fn default_network_classifier() -> NetworkClassifier {
    Arc::new(is_network_failure)
}

/// [`Transport`] backed by an async closure.
///
/// The closure receives the resolved URL and a snapshot of the options.
pub struct FnTransport<F> {
    f: F,
}

/// Wrap an async closure as a [`Transport`].
///
/// ```ignore
/// let transport = transport_fn(|_url, _options| async {
///     Ok(HttpResponse::from_bytes(StatusCode::OK, HeaderMap::new(), ""))
/// });
/// ```
pub fn transport_fn<F, Fut>(f: F) -> FnTransport<F>
where
    F: Fn(String, RequestOptions) -> Fut + Send + Sync,
    Fut: Future<Output = Result<HttpResponse, TransportError>> + Send + 'static,
{
    FnTransport { f }
}

#[async_trait]
impl<F, Fut> Transport for FnTransport<F>
where
    F: Fn(String, RequestOptions) -> Fut + Send + Sync,
    Fut: Future<Output = Result<HttpResponse, TransportError>> + Send + 'static,
{
    async fn fetch(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<HttpResponse, TransportError> {
        (self.f)(url.to_owned(), options.clone()).await
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_network_failure_needs_fetch_kind_and_failed_message() {
        assert!(is_network_failure(&TransportError::fetch("Fetch failed")));
        assert!(is_network_failure(&TransportError::fetch(
            "fetch FAILED: connection refused"
        )));
        assert!(!is_network_failure(&TransportError::fetch("bad header")));
        assert!(!is_network_failure(&TransportError::other("Fetch failed")));
        assert!(!is_network_failure(&TransportError::invalid_options(
            "failed to build request"
        )));
    }
}
