use crate::configurable::Configurable;
use crate::decoding::{DecodeClass, Decoded};
use crate::error::{BodyError, FetchError, TransportError};
use crate::options::RequestOptions;
use crate::response::{HttpResponse, ResponseType};
use crate::result::FetchResult;
use crate::transport::NetworkClassifier;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};

/// Message reported for opaque, not-ok responses.
pub const CORS_ERROR_MESSAGE: &str = "See browser console for more information";

/// How `send` produces its result.
#[derive(Debug)]
enum SendMode {
    /// Run the full pipeline.
    Live,
    /// Return a fixed result without resolving the URL or calling the transport.
    Stubbed(Box<FetchResult>),
}

/// A single request, created by [`Client::request`](crate::Client::request).
///
/// Starts from a snapshot of the client's options; further
/// [`Configurable`] calls only change this request. [`send`](Self::send)
/// consumes it.
#[derive(Debug)]
pub struct Request {
    options: RequestOptions,
    base_url: String,
    mode: SendMode,
}

impl Request {
    pub(crate) fn new(options: RequestOptions, base_url: String) -> Self {
        Self {
            options,
            base_url,
            mode: SendMode::Live,
        }
    }

    /// Make `send` return `result` as-is. Intended for tests of code that
    /// takes a prepared request.
    #[must_use]
    pub fn with_stub_result(mut self, result: FetchResult) -> Self {
        self.mode = SendMode::Stubbed(Box::new(result));
        self
    }

    #[must_use]
    pub fn is_stubbed(&self) -> bool {
        matches!(self.mode, SendMode::Stubbed(_))
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve `url` against the base URL, call the transport and decode the
    /// response body by content type.
    ///
    /// Never fails: every failure is classified into the returned
    /// [`FetchResult`]'s error. HTTP error statuses are not failures.
    pub async fn send(self, url: &str) -> FetchResult {
        let Self {
            options,
            base_url,
            mode,
        } = self;

        if let SendMode::Stubbed(result) = mode {
            tracing::debug!(url = %url, "returning stubbed result");
            return *result;
        }

        let candidate = format!("{base_url}{url}");

        if let Some(message) = options.build_error() {
            tracing::debug!(url = %candidate, error = %message, "request rejected before send");
            return FetchResult::failure(candidate, FetchError::request(message), None);
        }

        let resolved = match url::Url::parse(&candidate) {
            Ok(parsed) => parsed.to_string(),
            Err(e) => {
                tracing::debug!(url = %candidate, error = %e, "invalid request URL");
                return FetchResult::failure(candidate, FetchError::request(e.to_string()), None);
            }
        };

        tracing::debug!(url = %resolved, method = %options.method, "sending request");

        let mut response = match invoke(&resolved, &options).await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(url = %resolved, kind = %err.kind, error = %err.message, "request failed");
                return FetchResult::failure(resolved, err, None);
            }
        };

        tracing::debug!(url = %resolved, status = response.status(), "response received");

        if is_opaque_failure(&response) {
            tracing::debug!(url = %resolved, "opaque response, reporting as CORS failure");
            return FetchResult::failure(resolved, FetchError::cors(CORS_ERROR_MESSAGE), None);
        }

        if content_length(&response) <= 0 {
            return FetchResult::success(resolved, response, None);
        }

        let content_type = response.header(CONTENT_TYPE.as_str()).map(str::to_owned);
        let Some(class) = options.decoding.classify(content_type.as_deref()) else {
            tracing::debug!(url = %resolved, content_type = ?content_type, "no decoder for content type");
            return FetchResult::success(resolved, response, None);
        };

        response.max_body_size = options.max_body_size;
        match decode(&mut response, class).await {
            Ok(decoded) => FetchResult::success(resolved, response, Some(decoded)),
            Err(e) => {
                tracing::debug!(url = %resolved, error = %e, "failed to decode response body");
                FetchResult::failure(resolved, FetchError::response(e.to_string()), Some(response))
            }
        }
    }
}

impl Configurable for Request {
    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut RequestOptions {
        &mut self.options
    }
}

/// A not-ok opaque response: the platform hid a cross-origin failure.
fn is_opaque_failure(response: &HttpResponse) -> bool {
    !response.ok() && response.response_type() == ResponseType::Opaque
}

/// Call the transport, bounded by the configured timeout.
async fn invoke(url: &str, options: &RequestOptions) -> Result<HttpResponse, FetchError> {
    let call = options.transport().fetch(url, options);
    let outcome = match options.timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| FetchError::timeout(format!("request timed out after {limit:?}")))?,
        None => call.await,
    };
    outcome.map_err(|err| classify_transport_error(&err, options.network_classifier()))
}

fn classify_transport_error(err: &TransportError, classifier: &NetworkClassifier) -> FetchError {
    if classifier(err) {
        FetchError::network(err.message())
    } else {
        FetchError::request(err.message())
    }
}

/// Declared `Content-Length`; missing or unparseable counts as zero.
fn content_length(response: &HttpResponse) -> i64 {
    response
        .header(CONTENT_LENGTH.as_str())
        .map_or(0, leading_integer)
}

/// Integer prefix of `value`: leading whitespace, an optional sign, then
/// digits up to the first non-digit. No digits gives zero; overflow saturates.
fn leading_integer(value: &str) -> i64 {
    let value = value.trim_start();
    let (negative, rest) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .map_or(rest, |end| &rest[..end]);
    if digits.is_empty() {
        return 0;
    }
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    if negative { -magnitude } else { magnitude }
}

async fn decode(response: &mut HttpResponse, class: DecodeClass) -> Result<Decoded, BodyError> {
    match class {
        DecodeClass::Text => response.text().await.map(Decoded::Text),
        DecodeClass::Json => response.json().await.map(Decoded::Json),
        DecodeClass::Binary => response.blob().await.map(Decoded::Binary),
    }
}
