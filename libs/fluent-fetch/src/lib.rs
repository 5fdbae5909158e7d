#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Fluent, fetch-style HTTP client.
//!
//! A [`Client`] holds default request options and a base URL. Each
//! [`Request`] starts from a snapshot of those defaults, is refined through the
//! chainable [`Configurable`] methods and is consumed by
//! [`send`](Request::send), which always yields a [`FetchResult`]:
//!
//! - the response body is decoded by content type into [`Decoded::Text`],
//!   [`Decoded::Json`] or [`Decoded::Binary`], following the request's
//!   [`DecodingPolicy`];
//! - every failure is classified as one [`ErrorKind`]: `network`, `timeout`,
//!   `cors`, `request` or `response`;
//! - HTTP 4xx/5xx statuses are responses, not errors.
//!
//! The network call goes through a [`Transport`]. [`HyperTransport`] (hyper +
//! rustls, HTTPS only by default) is the default; any async closure can stand
//! in through [`transport_fn`].
//!
//! # Example
//!
//! ```ignore
//! use fluent_fetch::{Client, Configurable, Decoded};
//!
//! let client = Client::new()?.with_base_url("https://api.example.com");
//!
//! let result = client
//!     .request()
//!     .with_method("POST")
//!     .with_json_body(&serde_json::json!({"name": "Alice"}))
//!     .send("/users")
//!     .await;
//!
//! if let Some(err) = result.error() {
//!     eprintln!("{} failure: {}", err.kind, err.message);
//! } else if let Some(Decoded::Json(user)) = result.decoded() {
//!     println!("created {user}");
//! }
//! ```

mod client;
mod configurable;
mod content_type;
mod decoding;
mod error;
mod options;
mod request;
mod response;
mod result;
pub mod transport;

pub use client::Client;
pub use configurable::Configurable;
pub use content_type::{ContentTypePattern, PatternSet, matches_content_type};
pub use decoding::{
    Blob, DEFAULT_BINARY_PATTERNS, DEFAULT_JSON_PATTERNS, DEFAULT_TEXT_PATTERNS, DecodeClass,
    Decoded, DecodingPolicy,
};
pub use error::{BodyError, BuildError, ErrorKind, FetchError, TransportError, TransportErrorKind};
pub use options::RequestOptions;
pub use request::{CORS_ERROR_MESSAGE, Request};
pub use response::{DEFAULT_MAX_BODY_SIZE, HttpResponse, ResponseBody, ResponseType, full_body};
pub use result::FetchResult;
pub use transport::{
    FnTransport, HyperTransport, HyperTransportBuilder, HyperTransportConfig, NetworkClassifier,
    TlsRootConfig, Transport, TransportSecurity, is_network_failure, transport_fn,
};
