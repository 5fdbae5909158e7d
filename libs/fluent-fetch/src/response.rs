use crate::decoding::Blob;
use crate::error::BodyError;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use http_body_util::{BodyExt, Full};
use std::convert::Infallible;

/// Default limit applied when reading a body (10 MB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Type alias for the boxed response body.
///
/// Transports hand over whatever body they have (a streamed hyper body, an
/// in-memory buffer) behind this type-erased alias.
pub type ResponseBody =
    http_body_util::combinators::BoxBody<Bytes, Box<dyn std::error::Error + Send + Sync>>;

/// Box an in-memory buffer as a [`ResponseBody`].
#[must_use]
pub fn full_body(bytes: impl Into<Bytes>) -> ResponseBody {
    Full::new(bytes.into())
        .map_err(|never: Infallible| -> Box<dyn std::error::Error + Send + Sync> {
            match never {}
        })
        .boxed()
}

/// Fetch response type marker.
///
/// Only [`ResponseType::Opaque`] changes pipeline behavior: an opaque, not-ok
/// response is reported as a CORS failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseType {
    #[default]
    Basic,
    Cors,
    Default,
    Error,
    Opaque,
    OpaqueRedirect,
}

impl ResponseType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Cors => "cors",
            Self::Default => "default",
            Self::Error => "error",
            Self::Opaque => "opaque",
            Self::OpaqueRedirect => "opaqueredirect",
        }
    }
}

/// Response returned by a [`Transport`](crate::Transport).
///
/// Status is the raw numeric code so that opaque responses can carry `0`, the
/// way fetch reports them. The body can be read once, through [`text`](Self::text),
/// [`json`](Self::json), [`blob`](Self::blob) or [`bytes`](Self::bytes); the
/// response itself stays usable afterwards for status and headers.
#[derive(Debug)]
pub struct HttpResponse {
    status: u16,
    response_type: ResponseType,
    headers: HeaderMap,
    url: Option<String>,
    body: Option<ResponseBody>,
    pub(crate) max_body_size: usize,
}

impl HttpResponse {
    /// Create a basic response with a streamed body.
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: ResponseBody) -> Self {
        Self {
            status: status.as_u16(),
            response_type: ResponseType::Basic,
            headers,
            url: None,
            body: Some(body),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// Create a basic response with an in-memory body.
    #[must_use]
    pub fn from_bytes(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self::new(status, headers, full_body(body))
    }

    /// An opaque response: status `0`, no headers, empty body.
    #[must_use]
    pub fn opaque() -> Self {
        Self {
            status: 0,
            response_type: ResponseType::Opaque,
            headers: HeaderMap::new(),
            url: None,
            body: Some(full_body(Bytes::new())),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    #[must_use]
    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    /// Record the final URL (after redirects) the response came from.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// `true` for statuses in `200..=299`.
    #[must_use]
    pub fn ok(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The status as a typed code; `None` for opaque responses.
    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        StatusCode::from_u16(self.status).ok()
    }

    #[must_use]
    pub fn response_type(&self) -> ResponseType {
        self.response_type
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as a string; `None` when missing or not visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Whether the body has already been read.
    #[must_use]
    pub fn body_used(&self) -> bool {
        self.body.is_none()
    }

    #[must_use]
    pub fn max_body_size(&self) -> usize {
        self.max_body_size
    }

    /// Read the body as raw bytes.
    ///
    /// # Errors
    /// Returns `BodyError::AlreadyConsumed` on a second read,
    /// `BodyError::TooLarge` past `max_body_size`, `BodyError::Read` if the
    /// stream fails.
    pub async fn bytes(&mut self) -> Result<Bytes, BodyError> {
        let body = self.body.take().ok_or(BodyError::AlreadyConsumed)?;
        read_body_limited(body, self.max_body_size).await
    }

    /// Read the body as text. Invalid UTF-8 is replaced with U+FFFD.
    ///
    /// # Errors
    /// Same as [`bytes`](Self::bytes).
    pub async fn text(&mut self) -> Result<String, BodyError> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Parse the body as JSON.
    ///
    /// # Errors
    /// Same as [`bytes`](Self::bytes), plus `BodyError::Json` for malformed input.
    pub async fn json(&mut self) -> Result<serde_json::Value, BodyError> {
        let bytes = self.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Read the body as a [`Blob`] tagged with the response content type.
    ///
    /// # Errors
    /// Same as [`bytes`](Self::bytes).
    pub async fn blob(&mut self) -> Result<Blob, BodyError> {
        let content_type = self
            .header(http::header::CONTENT_TYPE.as_str())
            .unwrap_or_default()
            .to_owned();
        let bytes = self.bytes().await?;
        Ok(Blob {
            bytes,
            content_type,
        })
    }
}

/// Collect a body, failing as soon as it grows past `limit` bytes.
pub async fn read_body_limited(
    body: ResponseBody,
    limit: usize,
) -> Result<Bytes, BodyError> {
    let mut collected = Vec::new();
    let mut body = std::pin::pin!(body);

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(BodyError::Read)?;
        if let Some(chunk) = frame.data_ref() {
            if collected.len() + chunk.len() > limit {
                return Err(BodyError::TooLarge {
                    limit,
                    actual: collected.len() + chunk.len(),
                });
            }
            collected.extend_from_slice(chunk);
        }
    }

    Ok(Bytes::from(collected))
}
