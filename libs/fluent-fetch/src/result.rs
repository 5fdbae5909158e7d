use crate::decoding::Decoded;
use crate::error::FetchError;
use crate::response::HttpResponse;

/// Outcome of [`Request::send`](crate::Request::send).
///
/// The absence of [`error`](Self::error) is the only success signal. A 4xx/5xx
/// status is still a success here; inspect [`http_status`](Self::http_status)
/// or [`is_success_status`](Self::is_success_status) for that.
///
/// Built only through [`FetchResult::success`] and [`FetchResult::failure`].
#[derive(Debug)]
pub struct FetchResult {
    url: String,
    response: Option<HttpResponse>,
    http_status: Option<u16>,
    decoded: Option<Decoded>,
    error: Option<FetchError>,
}

impl FetchResult {
    /// Successful outcome; `http_status` is copied from the response.
    #[must_use]
    pub fn success(
        url: impl Into<String>,
        response: HttpResponse,
        decoded: Option<Decoded>,
    ) -> Self {
        Self {
            url: url.into(),
            http_status: Some(response.status()),
            response: Some(response),
            decoded,
            error: None,
        }
    }

    /// Failed outcome; `http_status` is set only when a response was obtained.
    #[must_use]
    pub fn failure(
        url: impl Into<String>,
        error: FetchError,
        response: Option<HttpResponse>,
    ) -> Self {
        Self {
            url: url.into(),
            http_status: response.as_ref().map(HttpResponse::status),
            response,
            decoded: None,
            error: Some(error),
        }
    }

    /// The resolved URL, or the best-known candidate when resolution failed.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn response(&self) -> Option<&HttpResponse> {
        self.response.as_ref()
    }

    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    #[must_use]
    pub fn decoded(&self) -> Option<&Decoded> {
        self.decoded.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// `true` when no error was recorded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// `true` when a 2xx status was received. Informational only; the pipeline
    /// never turns a status code into an error.
    #[must_use]
    pub fn is_success_status(&self) -> bool {
        self.http_status.is_some_and(|s| (200..=299).contains(&s))
    }

    #[must_use]
    pub fn into_decoded(self) -> Option<Decoded> {
        self.decoded
    }

    #[must_use]
    pub fn into_response(self) -> Option<HttpResponse> {
        self.response
    }

    /// Convert into a plain `Result`, keeping the decoded body on success.
    ///
    /// # Errors
    /// Returns the recorded [`FetchError`] if the outcome is a failure.
    pub fn into_result(self) -> Result<Option<Decoded>, FetchError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.decoded),
        }
    }
}
