//! HTTP transport for the storefront API.

use std::future::Future;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{error, instrument, warn};
use url::Url;

use super::{ApiRequest, Envelope};

const USER_AGENT: &str = concat!("threadline/", env!("CARGO_PKG_VERSION"));

/// Number of body characters kept when logging an unparseable response.
const BODY_EXCERPT_CHARS: usize = 500;

/// Sends one request and yields the envelope it produced.
///
/// Implementations never fail: transport faults become
/// [`Envelope::network_error`].
pub trait Transport: Send + Sync + 'static {
    /// Perform exactly one request.
    fn send(&self, request: ApiRequest) -> impl Future<Output = Envelope> + Send;
}

/// Transport backed by a `reqwest` client with a cookie store.
///
/// The cookie store carries the ambient server session; the client never
/// reads or writes the session cookie itself.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base: Url,
}

impl HttpTransport {
    /// Create a transport rooted at `base` (e.g. `http://shop.example/api/`).
    ///
    /// A missing trailing slash is added so the last path segment survives
    /// URL joining.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(mut base: Url) -> Result<Self, reqwest::Error> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, base })
    }

    /// The API base URL.
    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// Absolute URL for a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request path cannot be joined onto the base.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url, url::ParseError> {
        self.base.join(&request.path_and_query())
    }
}

/// Caller headers with the JSON content type forced on top.
pub(crate) fn request_headers(caller: &HeaderMap) -> HeaderMap {
    let mut headers = caller.clone();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

impl Transport for HttpTransport {
    #[instrument(skip_all, fields(method = %request.method, action = request.action))]
    async fn send(&self, request: ApiRequest) -> Envelope {
        let url = match self.url_for(&request) {
            Ok(url) => url,
            Err(e) => {
                error!(error = %e, "Failed to build request URL");
                return Envelope::network_error();
            }
        };

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .headers(request_headers(&request.headers));
        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Request to storefront API failed");
                return Envelope::network_error();
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, status = %status, "Failed to read response body");
                return Envelope::network_error();
            }
        };

        // Status codes are not consulted; the envelope decides.
        match serde_json::from_str::<Envelope>(&text) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(
                    error = %e,
                    status = %status,
                    body = %text.chars().take(BODY_EXCERPT_CHARS).collect::<String>(),
                    "Failed to parse storefront API response"
                );
                Envelope::network_error()
            }
        }
    }
}
