use http::{Request, Uri, header};
use tower_http::follow_redirect::policy::{Action, Attempt, Policy};

/// Headers removed before following a redirect to another origin
const SENSITIVE_HEADERS: &[header::HeaderName] = &[
    header::AUTHORIZATION,
    header::COOKIE,
    header::PROXY_AUTHORIZATION,
];

/// Fetch redirect mode, attached to the outgoing request as an extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RedirectMode {
    #[default]
    Follow,
    /// Surface a redirect as a network failure.
    Error,
    /// Return the redirect response without following it.
    Manual,
}

impl RedirectMode {
    /// Map the fetch `redirect` option; anything unrecognized follows.
    pub fn from_option(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("error") => Self::Error,
            Some("manual") => Self::Manual,
            _ => Self::Follow,
        }
    }
}

/// Redirect policy for `FollowRedirectLayer`.
///
/// Follows up to `max_redirects` hops in [`RedirectMode::Follow`] and never
/// follows in the other modes. Cross-origin hops drop [`SENSITIVE_HEADERS`];
/// HTTPS → HTTP hops are refused unless downgrades are allowed.
#[derive(Debug, Clone)]
pub struct FetchRedirectPolicy {
    max_redirects: usize,
    allow_https_downgrade: bool,
    mode: RedirectMode,
    redirect_count: usize,
    cross_origin_detected: bool,
}

impl FetchRedirectPolicy {
    pub fn new(max_redirects: usize, allow_https_downgrade: bool) -> Self {
        Self {
            max_redirects,
            allow_https_downgrade,
            mode: RedirectMode::Follow,
            redirect_count: 0,
            cross_origin_detected: false,
        }
    }

    fn is_same_origin(original: &Uri, target: &Uri) -> bool {
        let orig_scheme = original.scheme_str().unwrap_or("https");
        let target_scheme = target.scheme_str().unwrap_or("https");
        let orig_port = original
            .port_u16()
            .unwrap_or_else(|| default_port(orig_scheme));
        let target_port = target
            .port_u16()
            .unwrap_or_else(|| default_port(target_scheme));

        orig_scheme == target_scheme && original.host() == target.host() && orig_port == target_port
    }

    fn is_https_downgrade(original: &Uri, target: &Uri) -> bool {
        original.scheme_str() == Some("https") && target.scheme_str() == Some("http")
    }
}

fn default_port(scheme: &str) -> u16 {
    match scheme {
        "http" => 80,
        "https" => 443,
        _ => 0,
    }
}

impl<B: Clone, E> Policy<B, E> for FetchRedirectPolicy {
    fn redirect(&mut self, attempt: &Attempt<'_>) -> Result<Action, E> {
        if self.mode != RedirectMode::Follow {
            return Ok(Action::Stop);
        }

        self.redirect_count += 1;
        if self.redirect_count > self.max_redirects {
            tracing::debug!(
                count = self.redirect_count,
                max = self.max_redirects,
                "redirect limit reached"
            );
            return Ok(Action::Stop);
        }

        let original = attempt.previous();
        let target = attempt.location();

        if !self.allow_https_downgrade && Self::is_https_downgrade(original, target) {
            tracing::warn!(
                original = %original,
                target = %target,
                "blocking HTTPS to HTTP downgrade redirect"
            );
            return Ok(Action::Stop);
        }

        if !Self::is_same_origin(original, target) {
            self.cross_origin_detected = true;
            tracing::debug!(original = %original, target = %target, "cross-origin redirect");
        }

        Ok(Action::Follow)
    }

    fn on_request(&mut self, request: &mut Request<B>) {
        if let Some(mode) = request.extensions().get::<RedirectMode>() {
            self.mode = *mode;
        }

        if self.cross_origin_detected {
            let headers = request.headers_mut();
            for name in SENSITIVE_HEADERS {
                if headers.remove(name).is_some() {
                    tracing::debug!(header = %name, "stripped sensitive header on cross-origin redirect");
                }
            }
        }
    }

    fn clone_body(&self, body: &B) -> Option<B> {
        Some(body.clone())
    }
}
