use crate::configurable::Configurable;
use crate::error::BuildError;
use crate::options::RequestOptions;
use crate::request::Request;
use crate::transport::{HyperTransport, Transport};
use std::sync::Arc;

/// Holds default request options and a base URL, and hands out requests.
///
/// Every [`Configurable`] call on a client changes the defaults for requests
/// created afterwards. A [`Request`] gets its own deep copy of the options, so
/// nothing configured on a request ever reaches back into the client.
///
/// # Example
///
/// ```ignore
/// use fluent_fetch::{Client, Configurable};
///
/// let client = Client::new()?
///     .with_base_url("https://api.example.com")
///     .with_bearer_auth("token");
///
/// let result = client.request().with_method("POST").send("/users").await;
/// match result.error() {
///     None => println!("{:?}", result.decoded()),
///     Some(err) => eprintln!("{err}"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    options: RequestOptions,
    base_url: String,
}

impl Client {
    /// Create a client backed by the default [`HyperTransport`].
    ///
    /// # Errors
    /// Returns an error if TLS initialization fails
    pub fn new() -> Result<Self, BuildError> {
        Ok(Self::from_transport(HyperTransport::new()?))
    }

    /// Create a client backed by a custom transport.
    #[must_use]
    pub fn from_transport(transport: impl Transport + 'static) -> Self {
        Self {
            options: RequestOptions::new(Arc::new(transport)),
            base_url: String::new(),
        }
    }

    /// Prefix concatenated in front of every relative URL passed to `send`.
    ///
    /// Concatenation is literal: no slash is inserted or removed.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A new request carrying a snapshot of this client's options.
    #[must_use]
    pub fn request(&self) -> Request {
        Request::new(self.options.clone(), self.base_url.clone())
    }
}

impl Configurable for Client {
    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut RequestOptions {
        &mut self.options
    }
}
