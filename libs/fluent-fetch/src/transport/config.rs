/// Default User-Agent string for outgoing requests
pub const DEFAULT_USER_AGENT: &str = concat!("fluent-fetch/", env!("CARGO_PKG_VERSION"));

/// Redirect limit applied by fetch implementations
pub const DEFAULT_MAX_REDIRECTS: usize = 20;

/// TLS root certificate configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TlsRootConfig {
    /// Use Mozilla's root certificates (webpki-roots, no OS dependency)
    #[default]
    WebPki,
    /// Use OS native root certificate store
    Native,
}

/// Transport security configuration
///
/// Controls whether the transport enforces TLS or allows insecure HTTP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportSecurity {
    /// Require TLS for all connections (HTTPS only) - default and recommended
    #[default]
    TlsOnly,
    /// Allow insecure HTTP connections (for testing with mock servers only)
    ///
    /// **WARNING**: Never use in production as it exposes traffic to interception.
    AllowInsecureHttp,
}

/// Configuration of [`HyperTransport`](super::HyperTransport)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperTransportConfig {
    /// User-Agent header value, applied when the request sets none
    /// (default: `fluent-fetch/<version>`)
    pub user_agent: String,

    /// TLS root certificate strategy (default: `WebPki`)
    pub tls_roots: TlsRootConfig,

    /// Transport security mode (default: `TlsOnly`)
    pub transport_security: TransportSecurity,

    /// Maximum redirects followed in `follow` mode (default: 20)
    pub max_redirects: usize,

    /// Follow HTTPS → HTTP redirects (default: false)
    pub allow_https_downgrade: bool,
}

impl Default for HyperTransportConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            tls_roots: TlsRootConfig::default(),
            transport_security: TransportSecurity::TlsOnly,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            allow_https_downgrade: false,
        }
    }
}

impl HyperTransportConfig {
    /// Configuration for testing with mock servers (allows insecure HTTP)
    ///
    /// **WARNING**: Use only for local testing, never in production.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            transport_security: TransportSecurity::AllowInsecureHttp,
            allow_https_downgrade: true,
            ..Self::default()
        }
    }
}
