use crate::decoding::DecodingPolicy;
use crate::response::DEFAULT_MAX_BODY_SIZE;
use crate::transport::{NetworkClassifier, Transport, default_network_classifier};
use bytes::Bytes;
use http::{HeaderMap, Method};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Per-request transport options, decoding policy and transport capability.
///
/// A [`Client`](crate::Client) keeps the defaults; every
/// [`Request`](crate::Request) owns a clone. Cloning copies every field,
/// including the decoding pattern sets, so requests never share mutable state.
///
/// The `Option<String>` settings are opaque pass-through values in fetch
/// vocabulary (`"no-store"`, `"omit"`, `"manual"`, ...). The pipeline never
/// reads them; the transport decides what they mean.
#[derive(Clone)]
pub struct RequestOptions {
    pub method: Method,
    /// Headers; a later write to the same name replaces the earlier one.
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub cache: Option<String>,
    pub credentials: Option<String>,
    pub integrity: Option<String>,
    pub keepalive: Option<bool>,
    pub mode: Option<String>,
    pub redirect: Option<String>,
    pub referrer: Option<String>,
    pub referrer_policy: Option<String>,
    /// Abort signal, forwarded untouched to the transport.
    pub signal: Option<CancellationToken>,
    /// Cleared by `without_window()`.
    pub window: bool,
    /// Deadline for the transport call (default: none).
    pub timeout: Option<Duration>,
    /// Maximum number of body bytes read when decoding (default: 10 MB).
    pub max_body_size: usize,
    pub decoding: DecodingPolicy,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) network_classifier: NetworkClassifier,
    /// First invalid builder input, reported by `send()`.
    pub(crate) build_error: Option<String>,
}

impl RequestOptions {
    /// Default options bound to `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
            cache: None,
            credentials: None,
            integrity: None,
            keepalive: None,
            mode: None,
            redirect: None,
            referrer: None,
            referrer_policy: None,
            signal: None,
            window: true,
            timeout: None,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            decoding: DecodingPolicy::default(),
            transport,
            network_classifier: default_network_classifier(),
            build_error: None,
        }
    }

    #[must_use]
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    #[must_use]
    pub fn network_classifier(&self) -> &NetworkClassifier {
        &self.network_classifier
    }

    /// The deferred builder error, if any input was rejected.
    #[must_use]
    pub fn build_error(&self) -> Option<&str> {
        self.build_error.as_deref()
    }

    /// Header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Keep the first rejected input; later ones are usually consequences of it.
    pub(crate) fn defer_error(&mut self, message: String) {
        if self.build_error.is_none() {
            tracing::debug!(error = %message, "deferring invalid request option until send");
            self.build_error = Some(message);
        }
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("method", &self.method)
            .field("headers", &self.headers)
            .field("body_len", &self.body.as_ref().map(Bytes::len))
            .field("cache", &self.cache)
            .field("credentials", &self.credentials)
            .field("integrity", &self.integrity)
            .field("keepalive", &self.keepalive)
            .field("mode", &self.mode)
            .field("redirect", &self.redirect)
            .field("referrer", &self.referrer)
            .field("referrer_policy", &self.referrer_policy)
            .field("signal", &self.signal.is_some())
            .field("window", &self.window)
            .field("timeout", &self.timeout)
            .field("max_body_size", &self.max_body_size)
            .field("decoding", &self.decoding)
            .field("build_error", &self.build_error)
            .finish_non_exhaustive()
    }
}
