use super::config::{HyperTransportConfig, TlsRootConfig, TransportSecurity};
use super::integrity;
use super::redirect::{FetchRedirectPolicy, RedirectMode};
use super::tls;
use super::user_agent::{UserAgentLayer, UserAgentService};
use super::Transport;
use crate::error::{BodyError, BuildError, TransportError};
use crate::options::RequestOptions;
use crate::response::{HttpResponse, ResponseBody, ResponseType, read_body_limited};
use async_trait::async_trait;
use bytes::Bytes;
use http::header::{CACHE_CONTROL, COOKIE, LOCATION, PRAGMA, REFERER};
use http::{HeaderMap, HeaderValue, StatusCode, Uri};
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use std::fmt;
use tower::{ServiceBuilder, ServiceExt};
use tower_http::follow_redirect::{FollowRedirect, FollowRedirectLayer, RequestUri};

type HyperClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;
type FetchService = UserAgentService<FollowRedirect<HyperClient, FetchRedirectPolicy>>;

/// Production [`Transport`] on hyper with rustls.
///
/// Service stack (outer to inner): `UserAgent → FollowRedirect → hyper client`.
/// HTTP error statuses are returned as responses; only failures to obtain a
/// response become [`TransportError`]s.
///
/// Fetch options it applies: `method`, `headers`, `body`, `referrer` and
/// `referrer_policy` (`Referer` header), `cache` (request cache headers),
/// `credentials = "omit"` (drops `Cookie`), `redirect`,
/// `integrity` and `signal`. The remaining options (`mode`, `keepalive`,
/// `window`) only mean something inside a browser and are ignored.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct HyperTransport {
    service: FetchService,
    transport_security: TransportSecurity,
}

impl HyperTransport {
    /// Transport with default configuration.
    ///
    /// # Errors
    /// Returns an error if TLS initialization fails
    pub fn new() -> Result<Self, BuildError> {
        HyperTransportBuilder::new().build()
    }

    #[must_use]
    pub fn builder() -> HyperTransportBuilder {
        HyperTransportBuilder::new()
    }

    fn build_request(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<(http::Request<Full<Bytes>>, RedirectMode), TransportError> {
        let uri: Uri = url
            .parse()
            .map_err(|e| TransportError::invalid_options(format!("invalid URL '{url}': {e}")))?;
        self.check_scheme(&uri)?;

        let mut headers = options.headers.clone();
        apply_referrer(&mut headers, options);
        apply_cache_mode(&mut headers, options.cache.as_deref());
        if options.credentials.as_deref() == Some("omit") {
            headers.remove(COOKIE);
        }

        let body = options.body.clone().unwrap_or_default();
        let mut request = http::Request::new(Full::new(body));
        *request.method_mut() = options.method.clone();
        *request.uri_mut() = uri;
        *request.headers_mut() = headers;

        let mode = RedirectMode::from_option(options.redirect.as_deref());
        request.extensions_mut().insert(mode);
        Ok((request, mode))
    }

    fn check_scheme(&self, uri: &Uri) -> Result<(), TransportError> {
        match uri.scheme_str() {
            Some("https") => Ok(()),
            Some("http") if self.transport_security == TransportSecurity::AllowInsecureHttp => {
                Ok(())
            }
            Some("http") => Err(TransportError::invalid_options(
                "insecure HTTP is not allowed (TransportSecurity::TlsOnly)",
            )),
            Some(other) => Err(TransportError::invalid_options(format!(
                "unsupported URL scheme '{other}'"
            ))),
            None => Err(TransportError::invalid_options("URL has no scheme")),
        }
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn fetch(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<HttpResponse, TransportError> {
        let (request, mode) = self.build_request(url, options)?;
        let call = self.service.clone().oneshot(request);

        let outcome = match &options.signal {
            Some(signal) => tokio::select! {
                biased;
                () = signal.cancelled() => {
                    tracing::debug!(url = %url, "request aborted");
                    return Err(TransportError::aborted());
                }
                outcome = call => outcome,
            },
            None => call.await,
        };

        let response = outcome.map_err(|e| {
            let message = format!("fetch failed: {e}");
            TransportError::fetch(message).with_source(e)
        })?;

        let final_url = response
            .extensions()
            .get::<RequestUri>()
            .map_or_else(|| url.to_owned(), |uri| uri.0.to_string());
        let (parts, body) = response.into_parts();

        let mut response_type = ResponseType::Basic;
        if is_redirect(parts.status, &parts.headers) {
            match mode {
                RedirectMode::Manual => response_type = ResponseType::OpaqueRedirect,
                RedirectMode::Error => {
                    return Err(TransportError::fetch(
                        "fetch failed: unexpected redirect (redirect mode is \"error\")",
                    ));
                }
                RedirectMode::Follow => {}
            }
        }

        let body: ResponseBody = body
            .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> { Box::new(e) })
            .boxed();

        let response = match options.integrity.as_deref() {
            Some(metadata) => {
                let bytes = read_body_limited(body, options.max_body_size)
                    .await
                    .map_err(|e| match e {
                        BodyError::TooLarge { .. } => TransportError::other(e.to_string()),
                        _ => TransportError::fetch(format!("fetch failed: {e}")).with_source(e),
                    })?;
                if !integrity::verify(metadata, &bytes) {
                    tracing::warn!(url = %final_url, "response failed integrity check");
                    return Err(TransportError::fetch(
                        "fetch failed: response does not match integrity metadata",
                    ));
                }
                HttpResponse::from_bytes(parts.status, parts.headers, bytes)
            }
            None => HttpResponse::new(parts.status, parts.headers, body),
        };

        Ok(response
            .with_response_type(response_type)
            .with_url(final_url))
    }
}

impl fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperTransport")
            .field("transport_security", &self.transport_security)
            .finish_non_exhaustive()
    }
}

/// Redirect statuses fetch acts on; anything else (304, a bare 300) is a
/// plain response.
fn is_redirect(status: StatusCode, headers: &HeaderMap) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308) && headers.contains_key(LOCATION)
}

/// `Referer` from an absolute http(s) referrer, unless the policy is `no-referrer`
/// or the caller set the header explicitly.
fn apply_referrer(headers: &mut HeaderMap, options: &RequestOptions) {
    if headers.contains_key(REFERER) || options.referrer_policy.as_deref() == Some("no-referrer") {
        return;
    }
    let Some(mut referrer) = options
        .referrer
        .as_deref()
        .and_then(|r| url::Url::parse(r).ok())
        .filter(|u| matches!(u.scheme(), "http" | "https"))
    else {
        return;
    };
    referrer.set_fragment(None);
    if let Ok(value) = HeaderValue::from_str(referrer.as_str()) {
        headers.insert(REFERER, value);
    }
}

/// Request headers fetch adds for cache modes that bypass the HTTP cache.
fn apply_cache_mode(headers: &mut HeaderMap, cache: Option<&str>) {
    if headers.contains_key(CACHE_CONTROL) {
        return;
    }
    match cache {
        Some("no-store" | "reload") => {
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
            headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        }
        Some("no-cache") => {
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
        }
        _ => {}
    }
}

/// Builder for [`HyperTransport`]
#[derive(Debug, Clone, Default)]
pub struct HyperTransportBuilder {
    config: HyperTransportConfig,
}

impl HyperTransportBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: HyperTransportConfig) -> Self {
        Self { config }
    }

    /// Default User-Agent, used when a request sets none
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn tls_roots(mut self, tls_roots: TlsRootConfig) -> Self {
        self.config.tls_roots = tls_roots;
        self
    }

    #[must_use]
    pub fn transport(mut self, transport_security: TransportSecurity) -> Self {
        self.config.transport_security = transport_security;
        self
    }

    /// Allow plain HTTP (for testing with local mock servers only)
    ///
    /// Available in debug builds, or in release builds with the
    /// `allow-insecure-http` feature.
    #[must_use]
    #[cfg(any(debug_assertions, feature = "allow-insecure-http"))]
    pub fn allow_insecure_http(mut self) -> Self {
        tracing::warn!(
            target: "fluent_fetch::security",
            "allow_insecure_http() called - HTTP traffic will NOT be encrypted"
        );
        self.config.transport_security = TransportSecurity::AllowInsecureHttp;
        self
    }

    /// Maximum redirects followed in `follow` mode
    #[must_use]
    pub fn max_redirects(mut self, max_redirects: usize) -> Self {
        self.config.max_redirects = max_redirects;
        self
    }

    #[must_use]
    pub fn allow_https_downgrade(mut self, allow: bool) -> Self {
        self.config.allow_https_downgrade = allow;
        self
    }

    /// # Errors
    /// Returns an error if TLS initialization fails or the user agent is not a
    /// valid header value
    pub fn build(self) -> Result<HyperTransport, BuildError> {
        if self.config.transport_security == TransportSecurity::AllowInsecureHttp {
            tracing::warn!(
                "insecure HTTP enabled (TransportSecurity::AllowInsecureHttp); \
                 use only for testing with mock servers"
            );
        }

        let https = tls::https_connector(self.config.tls_roots, self.config.transport_security)?;

        let mut client_builder = Client::builder(TokioExecutor::new());
        client_builder.pool_timer(TokioTimer::new());
        let hyper_client: HyperClient = client_builder.build(https);

        let policy = FetchRedirectPolicy::new(
            self.config.max_redirects,
            self.config.allow_https_downgrade,
        );
        let service = ServiceBuilder::new()
            .layer(UserAgentLayer::try_new(&self.config.user_agent)?)
            .layer(FollowRedirectLayer::with_policy(policy))
            .service(hyper_client);

        Ok(HyperTransport {
            service,
            transport_security: self.config.transport_security,
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::client::Client as FetchClient;
    use crate::configurable::Configurable;
    use crate::decoding::Decoded;
    use crate::error::ErrorKind;
    use crate::transport::DEFAULT_USER_AGENT;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn test_client() -> FetchClient {
        let transport = HyperTransportBuilder::with_config(HyperTransportConfig::for_testing())
            .build()
            .unwrap();
        FetchClient::from_transport(transport)
    }

    #[tokio::test]
    async fn test_text_response() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/hello");
            then.status(200)
                .header("content-type", "text/plain; charset=utf-8")
                .body("hello");
        });

        let result = test_client().request().send(&server.url("/hello")).await;

        mock.assert();
        assert!(result.is_ok(), "unexpected error: {:?}", result.error());
        assert_eq!(result.http_status(), Some(200));
        assert_eq!(result.decoded().and_then(Decoded::as_text), Some("hello"));
    }

    #[tokio::test]
    async fn test_json_request_and_response() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/users")
                .header("content-type", "application/json")
                .json_body(json!({"name": "Alice"}));
            then.status(201).json_body(json!({"id": 7, "name": "Alice"}));
        });

        let result = test_client()
            .with_base_url(server.base_url())
            .request()
            .with_method("POST")
            .with_json_body(&json!({"name": "Alice"}))
            .send("/users")
            .await;

        mock.assert();
        assert_eq!(result.http_status(), Some(201));
        assert_eq!(
            result.decoded().and_then(Decoded::as_json),
            Some(&json!({"id": 7, "name": "Alice"}))
        );
    }

    #[tokio::test]
    async fn test_binary_response() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/file.pdf");
            then.status(200)
                .header("content-type", "application/pdf")
                .body([0x25_u8, 0x50, 0x44, 0x46]);
        });

        let result = test_client().request().send(&server.url("/file.pdf")).await;

        let blob = result.decoded().and_then(Decoded::as_binary).unwrap();
        assert_eq!(blob.size(), 4);
        assert_eq!(blob.content_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_not_found_is_success_with_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404)
                .header("content-type", "text/plain")
                .body("not found");
        });

        let result = test_client().request().send(&server.url("/missing")).await;

        assert!(result.is_ok());
        assert!(!result.is_success_status());
        assert_eq!(result.http_status(), Some(404));
        assert_eq!(result.decoded().and_then(Decoded::as_text), Some("not found"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let result = test_client().request().send("http://127.0.0.1:1/").await;

        let err = result.error().unwrap();
        assert_eq!(err.kind, ErrorKind::Network);
        assert!(err.message.starts_with("fetch failed"), "{}", err.message);
        assert!(result.response().is_none());
    }

    #[tokio::test]
    async fn test_plain_http_rejected_under_tls_only() {
        let transport = HyperTransport::new().unwrap();
        let client = FetchClient::from_transport(transport);

        let result = client.request().send("http://127.0.0.1:1/").await;

        let err = result.error().unwrap();
        assert_eq!(err.kind, ErrorKind::Request);
        assert!(err.message.contains("insecure HTTP"));
    }

    #[tokio::test]
    async fn test_default_user_agent_sent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/ua")
                .header("user-agent", DEFAULT_USER_AGENT);
            then.status(204);
        });

        let result = test_client().request().send(&server.url("/ua")).await;

        mock.assert();
        assert_eq!(result.http_status(), Some(204));
    }

    #[tokio::test]
    async fn test_abort_signal_is_request_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow");
            then.status(200).delay(Duration::from_secs(5));
        });

        let signal = CancellationToken::new();
        let canceller = signal.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let result = test_client()
            .request()
            .with_abort_signal(signal)
            .send(&server.url("/slow"))
            .await;

        let err = result.error().unwrap();
        assert_eq!(err.kind, ErrorKind::Request);
        assert_eq!(err.message, "the operation was aborted");
    }

    #[tokio::test]
    async fn test_redirect_followed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/from");
            then.status(302).header("location", "/to");
        });
        server.mock(|when, then| {
            when.method(GET).path("/to");
            then.status(200).header("content-type", "text/plain").body("landed");
        });

        let result = test_client().request().send(&server.url("/from")).await;

        assert_eq!(result.http_status(), Some(200));
        assert_eq!(result.decoded().and_then(Decoded::as_text), Some("landed"));
        assert!(result.response().and_then(HttpResponse::url).unwrap().ends_with("/to"));
    }

    #[tokio::test]
    async fn test_manual_redirect_returned_as_is() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/from");
            then.status(302).header("location", "/to");
        });
        let target = server.mock(|when, then| {
            when.method(GET).path("/to");
            then.status(200);
        });

        let result = test_client()
            .request()
            .with_redirect("manual")
            .send(&server.url("/from"))
            .await;

        target.assert_calls(0);
        assert!(result.is_ok());
        assert_eq!(result.http_status(), Some(302));
        let response = result.response().unwrap();
        assert_eq!(response.response_type(), ResponseType::OpaqueRedirect);
        assert_eq!(response.header("location"), Some("/to"));
    }

    #[tokio::test]
    async fn test_error_redirect_mode_is_network_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/from");
            then.status(301).header("location", "/to");
        });

        let result = test_client()
            .request()
            .with_redirect("error")
            .send(&server.url("/from"))
            .await;

        assert_eq!(result.error().map(|e| e.kind), Some(ErrorKind::Network));
    }

    #[tokio::test]
    async fn test_not_modified_is_not_a_redirect() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/cached");
            then.status(304);
        });

        for mode in ["error", "manual"] {
            let result = test_client()
                .request()
                .with_redirect(mode)
                .send(&server.url("/cached"))
                .await;

            assert!(result.is_ok(), "{mode}: {:?}", result.error());
            assert_eq!(result.http_status(), Some(304));
            assert_eq!(result.response().unwrap().response_type(), ResponseType::Basic);
        }
    }

    #[tokio::test]
    async fn test_multiple_choices_without_location_is_not_a_redirect() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/choices");
            then.status(300);
        });

        let result = test_client()
            .request()
            .with_redirect("error")
            .send(&server.url("/choices"))
            .await;

        assert!(result.is_ok(), "{:?}", result.error());
        assert_eq!(result.http_status(), Some(300));
    }

    #[tokio::test]
    async fn test_redirect_limit_stops_following() {
        let server = MockServer::start();
        let looping = server.mock(|when, then| {
            when.method(GET).path("/loop");
            then.status(302).header("location", "/loop");
        });
        let transport = HyperTransportBuilder::with_config(HyperTransportConfig::for_testing())
            .max_redirects(2)
            .build()
            .unwrap();

        let result = FetchClient::from_transport(transport)
            .request()
            .send(&server.url("/loop"))
            .await;

        looping.assert_calls(3);
        assert_eq!(result.http_status(), Some(302));
    }

    #[tokio::test]
    async fn test_cross_origin_redirect_drops_authorization() {
        let origin = MockServer::start();
        let other = MockServer::start();
        let target = other.url("/land");
        let first = origin.mock(|when, then| {
            when.method(GET).path("/from").header("authorization", "Bearer secret");
            then.status(302).header("location", target.as_str());
        });
        let landed = other.mock(|when, then| {
            when.method(GET).path("/land").header_missing("authorization");
            then.status(204);
        });

        let result = test_client()
            .with_bearer_auth("secret")
            .request()
            .send(&origin.url("/from"))
            .await;

        first.assert();
        landed.assert();
        assert_eq!(result.http_status(), Some(204));
    }

    #[tokio::test]
    async fn test_same_origin_redirect_keeps_authorization() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/from");
            then.status(307).header("location", "/to");
        });
        let landed = server.mock(|when, then| {
            when.method(GET).path("/to").header("authorization", "Bearer secret");
            then.status(204);
        });

        let result = test_client()
            .with_bearer_auth("secret")
            .request()
            .send(&server.url("/from"))
            .await;

        landed.assert();
        assert_eq!(result.http_status(), Some(204));
    }

    #[tokio::test]
    async fn test_credentials_omit_keeps_explicit_authorization() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/private")
                .header("authorization", "Bearer t")
                .header_missing("cookie");
            then.status(200);
        });

        let result = test_client()
            .with_bearer_auth("t")
            .with_header("cookie", "session=1")
            .request()
            .with_credentials("omit")
            .send(&server.url("/private"))
            .await;

        mock.assert();
        assert_eq!(result.http_status(), Some(200));
    }

    #[tokio::test]
    async fn test_referrer_and_cache_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/page")
                .header("referer", "https://app.example.com/start")
                .header("cache-control", "no-cache")
                .header("pragma", "no-cache");
            then.status(204);
        });

        let result = test_client()
            .request()
            .with_referrer("https://app.example.com/start#section")
            .with_caching("no-store")
            .send(&server.url("/page"))
            .await;

        mock.assert();
        assert_eq!(result.http_status(), Some(204));
    }

    #[tokio::test]
    async fn test_integrity_mismatch_is_network_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/script.js");
            then.status(200)
                .header("content-type", "text/javascript")
                .body("hello");
        });

        let good = test_client()
            .request()
            .with_integrity("sha256-LPJNul+wow4m6DsqxbninhsWHlwfp0JecwQzYpOLmCQ=")
            .send(&server.url("/script.js"))
            .await;
        let bad = test_client()
            .request()
            .with_integrity("sha256-AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=")
            .send(&server.url("/script.js"))
            .await;

        assert_eq!(good.decoded().and_then(Decoded::as_text), Some("hello"));
        assert_eq!(bad.error().map(|e| e.kind), Some(ErrorKind::Network));
    }

    #[tokio::test]
    async fn test_integrity_body_over_limit_is_request_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/script.js");
            then.status(200)
                .header("content-type", "text/javascript")
                .body("hello");
        });

        let result = test_client()
            .request()
            .with_integrity("sha256-LPJNul+wow4m6DsqxbninhsWHlwfp0JecwQzYpOLmCQ=")
            .with_max_body_size(2)
            .send(&server.url("/script.js"))
            .await;

        let err = result.error().unwrap();
        assert_eq!(err.kind, ErrorKind::Request);
        assert!(err.message.contains("too large"), "{}", err.message);
    }

    /// `allow_insecure_http()` and `build()` both warn about plain HTTP
    #[cfg(any(debug_assertions, feature = "allow-insecure-http"))]
    #[tokio::test]
    async fn test_insecure_http_warning_emitted() {
        use std::sync::{Arc, Mutex};
        use tracing_subscriber::layer::SubscriberExt;

        #[derive(Clone, Default)]
        struct WarningCapture {
            warnings: Arc<Mutex<Vec<String>>>,
        }

        impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarningCapture {
            fn on_event(
                &self,
                event: &tracing::Event<'_>,
                _ctx: tracing_subscriber::layer::Context<'_, S>,
            ) {
                if *event.metadata().level() == tracing::Level::WARN {
                    let mut visitor = MessageVisitor(String::new());
                    event.record(&mut visitor);
                    self.warnings.lock().unwrap().push(visitor.0);
                }
            }
        }

        struct MessageVisitor(String);
        impl tracing::field::Visit for MessageVisitor {
            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.0 = format!("{value:?}");
                }
            }
        }

        let capture = WarningCapture::default();
        let warnings = Arc::clone(&capture.warnings);
        let subscriber = tracing_subscriber::registry().with(capture);

        tracing::subscriber::with_default(subscriber, || {
            _ = HyperTransportBuilder::new().allow_insecure_http().build();
        });

        let captured = warnings.lock().unwrap();
        assert!(
            captured
                .iter()
                .any(|w| w.contains("HTTP traffic will NOT be encrypted")),
            "allow_insecure_http() should warn: {:?}",
            *captured
        );
        assert!(
            captured.iter().any(|w| w.contains("insecure HTTP enabled")),
            "build() should warn: {:?}",
            *captured
        );
    }

    #[test]
    fn test_transport_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<HyperTransport>();
    }

    #[test]
    fn test_invalid_user_agent_fails_build() {
        let result = HyperTransportBuilder::new().user_agent("bad\nagent").build();
        assert!(matches!(result, Err(BuildError::InvalidUserAgent(_))));
    }
}
