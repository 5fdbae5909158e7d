use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Closed set of failure categories a [`FetchResult`](crate::FetchResult) can carry.
///
/// Callers match on the kind, never on the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// The transport failed with a connectivity fault
    Network,
    /// The configured deadline elapsed before the transport answered
    Timeout,
    /// The transport returned an opaque, not-ok (cross-origin blocked) response
    Cors,
    /// The URL could not be resolved, the options were invalid, or the transport
    /// rejected the call for a non-network reason
    Request,
    /// A response was obtained but its body could not be decoded
    Response,
}

impl ErrorKind {
    /// Lowercase tag used in `Display` and serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Cors => "cors",
            Self::Request => "request",
            Self::Response => "response",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged failure value stored in a [`FetchResult`](crate::FetchResult).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{kind} error: {message}")]
pub struct FetchError {
    /// Failure category
    pub kind: ErrorKind,
    /// Human-readable detail, preserved verbatim from the underlying failure
    pub message: String,
}

impl FetchError {
    /// Create an error of the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    #[must_use]
    pub fn cors(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cors, message)
    }

    #[must_use]
    pub fn request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Request, message)
    }

    #[must_use]
    pub fn response(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Response, message)
    }
}

/// Category marker a [`Transport`](crate::Transport) attaches to a failure.
///
/// This is the vocabulary the [`NetworkClassifier`](crate::NetworkClassifier)
/// inspects to tell connectivity faults apart from everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportErrorKind {
    /// Low-level fetch failure (DNS, connect, reset, TLS handshake, ...)
    Fetch,
    /// The options could not be turned into a request (bad method, scheme, header)
    InvalidOptions,
    /// The abort signal fired while the call was in flight
    Aborted,
    /// Anything else
    Other,
}

/// Failure raised by a [`Transport`](crate::Transport) instead of returning a response.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    #[must_use]
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Low-level fetch failure; the default classifier treats it as a network
    /// fault when the message mentions "failed".
    #[must_use]
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Fetch, message)
    }

    #[must_use]
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::InvalidOptions, message)
    }

    #[must_use]
    pub fn aborted() -> Self {
        Self::new(TransportErrorKind::Aborted, "the operation was aborted")
    }

    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Other, message)
    }

    /// Attach the underlying cause.
    #[must_use]
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors raised while constructing a transport.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BuildError {
    /// TLS configuration could not be initialized
    #[error("TLS error: {0}")]
    Tls(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The configured User-Agent is not a valid header value
    #[error("Invalid User-Agent: {0}")]
    InvalidUserAgent(#[from] http::header::InvalidHeaderValue),
}

/// Errors raised while reading a response body.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BodyError {
    /// The body was already read by an earlier call
    #[error("body has already been consumed")]
    AlreadyConsumed,

    /// Body exceeded the configured size limit
    #[error("response body too large: limit {limit} bytes, got {actual} bytes")]
    TooLarge { limit: usize, actual: usize },

    /// The underlying body stream failed
    #[error("failed to read response body: {0}")]
    Read(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_constructors_set_kind_and_message() {
        let cases = [
            (FetchError::network("a"), ErrorKind::Network),
            (FetchError::timeout("b"), ErrorKind::Timeout),
            (FetchError::cors("c"), ErrorKind::Cors),
            (FetchError::request("d"), ErrorKind::Request),
            (FetchError::response("e"), ErrorKind::Response),
        ];
        for (err, kind) in cases {
            assert_eq!(err.kind, kind);
            assert_eq!(err.message.len(), 1);
        }
    }

    #[test]
    fn test_display_includes_kind_tag() {
        let err = FetchError::cors("blocked");
        assert_eq!(err.to_string(), "cors error: blocked");
    }

    #[test]
    fn test_serializes_kind_lowercase() {
        let err = FetchError::network("Fetch failed");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"kind": "network", "message": "Fetch failed"})
        );
    }

    #[test]
    fn test_transport_error_preserves_source() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = TransportError::fetch("fetch failed: refused").with_source(inner);

        assert_eq!(err.kind(), TransportErrorKind::Fetch);
        let source = err.source().unwrap();
        let io = source.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::ConnectionRefused);
    }

    #[test]
    fn test_transport_error_display_is_message() {
        let err = TransportError::aborted();
        assert_eq!(err.to_string(), "the operation was aborted");
        assert_eq!(err.kind(), TransportErrorKind::Aborted);
    }
}
