//! Request descriptions and buffered responses.
//!
//! Requests are described as plain values so the session can replay one after
//! signing in again. Responses are read in full before they are inspected,
//! which lets the login check, the dev trace and the caller all look at the
//! same body.

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode, Url};

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RequestBody {
    Empty,
    Form(Vec<(String, String)>),
    Raw {
        content_type: &'static str,
        text: String,
    },
    Json(serde_json::Value),
}

/// One request against the portal, replayable after re-authentication.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PortalRequest {
    pub method: Method,
    /// Path relative to the portal root, or an absolute URL.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub headers: Vec<(&'static str, String)>,
}

impl PortalRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = RequestBody::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    #[must_use]
    pub fn raw_body(mut self, content_type: &'static str, text: impl Into<String>) -> Self {
        self.body = RequestBody::Raw {
            content_type,
            text: text.into(),
        };
        self
    }

    #[must_use]
    pub fn json_body(mut self, value: serde_json::Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    #[must_use]
    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Mark the request as an XHR call, as the portal's own scripts do.
    #[must_use]
    pub fn xhr(self) -> Self {
        self.header("X-Requested-With", "XMLHttpRequest")
    }
}

/// A response read in full.
#[derive(Debug, Clone)]
pub(crate) struct PortalResponse {
    pub status: StatusCode,
    /// Final URL, after redirects.
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl PortalResponse {
    pub async fn read(resp: reqwest::Response) -> Result<Self, ClientError> {
        let status = resp.status();
        let url = resp.url().clone();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?.to_vec();
        Ok(Self {
            status,
            url,
            headers,
            body,
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The portal redirected us to its login page.
    pub fn lands_on_login(&self) -> bool {
        self.url.path().trim_end_matches('/').ends_with("/login")
    }

    pub fn needs_login(&self) -> bool {
        self.lands_on_login() || self.status == StatusCode::UNAUTHORIZED
    }
}

/// Check a response for common error conditions.
///
/// Returns the response unchanged on success. Handles:
/// - **429 Too Many Requests** → [`ClientError::RateLimited`] with
///   `Retry-After` header parsing (falls back to 60 s if absent or
///   unparseable).
/// - **Non-success status** → [`ClientError::Api`] with status code and
///   response body.
pub(crate) fn check_response(resp: PortalResponse) -> Result<PortalResponse, ClientError> {
    if resp.status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ClientError::RateLimited {
            retry_after_secs: parse_retry_after(&resp.headers),
        });
    }
    if !resp.status.is_success() {
        return Err(ClientError::Api {
            status: resp.status.as_u16(),
            message: resp.text(),
        });
    }
    Ok(resp)
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(headers: &HeaderMap) -> u64 {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}
