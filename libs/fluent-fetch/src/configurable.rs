//! Fluent configuration surface shared by [`Client`](crate::Client) and
//! [`Request`](crate::Request).
//!
//! Every setter only writes into the [`RequestOptions`] held by the
//! implementor. Invalid input (a bad header, a body that fails to serialize)
//! does not break the chain: the first such error is kept and reported as a
//! `Request` error when the request is sent.

use crate::content_type::ContentTypePattern;
use crate::error::TransportError;
use crate::options::RequestOptions;
use crate::response::HttpResponse;
use crate::transport::{Transport, transport_fn};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderName, HeaderValue};
use http::Method;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Set a header, replacing any earlier value for the same name.
fn insert_header<K, V>(options: &mut RequestOptions, name: K, value: V)
where
    K: TryInto<HeaderName>,
    K::Error: fmt::Display,
    V: TryInto<HeaderValue>,
    V::Error: fmt::Display,
{
    let name = match name.try_into() {
        Ok(name) => name,
        Err(e) => {
            options.defer_error(format!("Invalid header name: {e}"));
            return;
        }
    };
    match value.try_into() {
        Ok(value) => {
            options.headers.insert(name, value);
        }
        Err(e) => options.defer_error(format!("Invalid header value for '{name}': {e}")),
    }
}

/// Builder methods over a [`RequestOptions`].
///
/// Implementors provide access to their options; all setters are provided.
/// Calling a setter twice with the same value leaves the options as a
/// single call would.
pub trait Configurable: Sized {
    fn options(&self) -> &RequestOptions;

    fn options_mut(&mut self) -> &mut RequestOptions;

    /// Set the HTTP method (`"POST"`, `Method::PUT`, ...).
    #[must_use]
    fn with_method<M>(mut self, method: M) -> Self
    where
        M: TryInto<Method>,
        M::Error: fmt::Display,
    {
        match method.try_into() {
            Ok(method) => self.options_mut().method = method,
            Err(e) => self.options_mut().defer_error(format!("Invalid method: {e}")),
        }
        self
    }

    #[must_use]
    fn with_header<K, V>(mut self, name: K, value: V) -> Self
    where
        K: TryInto<HeaderName>,
        K::Error: fmt::Display,
        V: TryInto<HeaderValue>,
        V::Error: fmt::Display,
    {
        insert_header(self.options_mut(), name, value);
        self
    }

    /// Merge headers into the current set (last write wins).
    #[must_use]
    fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: TryInto<HeaderName>,
        K::Error: fmt::Display,
        V: TryInto<HeaderValue>,
        V::Error: fmt::Display,
    {
        for (name, value) in headers {
            insert_header(self.options_mut(), name, value);
        }
        self
    }

    /// `Authorization: Basic base64(user:pass)`.
    #[must_use]
    fn with_basic_auth(self, user: &str, pass: &str) -> Self {
        let encoded = STANDARD.encode(format!("{user}:{pass}"));
        self.with_header(AUTHORIZATION, format!("Basic {encoded}"))
    }

    /// `Authorization: Bearer <token>`.
    #[must_use]
    fn with_bearer_auth(self, token: &str) -> Self {
        self.with_header(AUTHORIZATION, format!("Bearer {token}"))
    }

    /// Raw body with an explicit content type.
    #[must_use]
    fn with_body(mut self, body: impl Into<Bytes>, content_type: &str) -> Self {
        self.options_mut().body = Some(body.into());
        self.with_header(CONTENT_TYPE, content_type)
    }

    /// JSON-serialized body. Sets `Content-Type: application/json` unless a
    /// content type is already present.
    #[must_use]
    fn with_json_body<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        match serde_json::to_vec(body) {
            Ok(bytes) => {
                let options = self.options_mut();
                options.body = Some(Bytes::from(bytes));
                if !options.headers.contains_key(CONTENT_TYPE) {
                    options.headers.insert(
                        CONTENT_TYPE,
                        HeaderValue::from_static("application/json"),
                    );
                }
            }
            Err(e) => self
                .options_mut()
                .defer_error(format!("JSON serialization failed: {e}")),
        }
        self
    }

    /// Form URL-encoded body. Sets
    /// `Content-Type: application/x-www-form-urlencoded` unless a content type
    /// is already present.
    #[must_use]
    fn with_form_body<T: Serialize + ?Sized>(mut self, fields: &T) -> Self {
        match serde_urlencoded::to_string(fields) {
            Ok(encoded) => {
                let options = self.options_mut();
                options.body = Some(Bytes::from(encoded));
                if !options.headers.contains_key(CONTENT_TYPE) {
                    options.headers.insert(
                        CONTENT_TYPE,
                        HeaderValue::from_static("application/x-www-form-urlencoded"),
                    );
                }
            }
            Err(e) => self
                .options_mut()
                .defer_error(format!("Form encoding failed: {e}")),
        }
        self
    }

    #[must_use]
    fn with_caching(mut self, setting: impl Into<String>) -> Self {
        self.options_mut().cache = Some(setting.into());
        self
    }

    #[must_use]
    fn with_credentials(mut self, setting: impl Into<String>) -> Self {
        self.options_mut().credentials = Some(setting.into());
        self
    }

    /// Subresource integrity metadata, e.g. `sha256-<base64>`.
    #[must_use]
    fn with_integrity(mut self, hash: impl Into<String>) -> Self {
        self.options_mut().integrity = Some(hash.into());
        self
    }

    #[must_use]
    fn with_keep_alive(mut self, setting: bool) -> Self {
        self.options_mut().keepalive = Some(setting);
        self
    }

    #[must_use]
    fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.options_mut().mode = Some(mode.into());
        self
    }

    /// `"follow"`, `"error"` or `"manual"`.
    #[must_use]
    fn with_redirect(mut self, setting: impl Into<String>) -> Self {
        self.options_mut().redirect = Some(setting.into());
        self
    }

    #[must_use]
    fn with_referrer(mut self, url: impl Into<String>) -> Self {
        self.options_mut().referrer = Some(url.into());
        self
    }

    #[must_use]
    fn with_referrer_policy(mut self, setting: impl Into<String>) -> Self {
        self.options_mut().referrer_policy = Some(setting.into());
        self
    }

    /// Forward a cancellation signal to the transport.
    #[must_use]
    fn with_abort_signal(mut self, signal: CancellationToken) -> Self {
        self.options_mut().signal = Some(signal);
        self
    }

    #[must_use]
    fn without_window(mut self) -> Self {
        self.options_mut().window = false;
        self
    }

    /// Fail with a `Timeout` error when the transport call takes longer than
    /// `timeout`.
    #[must_use]
    fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options_mut().timeout = Some(timeout);
        self
    }

    /// Maximum number of bytes read while decoding a body.
    #[must_use]
    fn with_max_body_size(mut self, size: usize) -> Self {
        self.options_mut().max_body_size = size;
        self
    }

    #[must_use]
    fn with_text_decoding(mut self, patterns: impl IntoIterator<Item = ContentTypePattern>) -> Self {
        self.options_mut().decoding.text_mut().extend(patterns);
        self
    }

    #[must_use]
    fn without_text_decoding(mut self) -> Self {
        self.options_mut().decoding.text_mut().clear();
        self
    }

    #[must_use]
    fn with_json_decoding(mut self, patterns: impl IntoIterator<Item = ContentTypePattern>) -> Self {
        self.options_mut().decoding.json_mut().extend(patterns);
        self
    }

    #[must_use]
    fn without_json_decoding(mut self) -> Self {
        self.options_mut().decoding.json_mut().clear();
        self
    }

    #[must_use]
    fn with_binary_decoding(
        mut self,
        patterns: impl IntoIterator<Item = ContentTypePattern>,
    ) -> Self {
        self.options_mut().decoding.binary_mut().extend(patterns);
        self
    }

    #[must_use]
    fn without_binary_decoding(mut self) -> Self {
        self.options_mut().decoding.binary_mut().clear();
        self
    }

    /// Clear all three decoding classes; bodies are never decoded.
    #[must_use]
    fn without_decoding(mut self) -> Self {
        self.options_mut().decoding.clear();
        self
    }

    /// Replace the transport capability.
    #[must_use]
    fn with_transport<T: Transport + 'static>(self, transport: T) -> Self {
        self.with_shared_transport(Arc::new(transport))
    }

    #[must_use]
    fn with_shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.options_mut().transport = transport;
        self
    }

    /// Replace the transport with an async closure.
    #[must_use]
    fn with_transport_fn<F, Fut>(self, f: F) -> Self
    where
        F: Fn(String, RequestOptions) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse, TransportError>> + Send + 'static,
    {
        self.with_transport(transport_fn(f))
    }

    /// Replace the heuristic that recognizes connectivity faults.
    #[must_use]
    fn with_network_classifier<F>(mut self, classifier: F) -> Self
    where
        F: Fn(&TransportError) -> bool + Send + Sync + 'static,
    {
        self.options_mut().network_classifier = Arc::new(classifier);
        self
    }
}
