//! The authenticated portal session.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest_cookie_store::CookieStoreMutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use smartschool_config::{Credentials, SessionConfig, SmartschoolConfig};
use smartschool_core::entities::AuthenticatedUser;
use tokio::sync::OnceCell;

use crate::auth::MfaProvider;
use crate::cookies;
use crate::error::ClientError;
use crate::http::{PortalRequest, PortalResponse, RequestBody, check_response};
use crate::trace::DevTracer;
use crate::xml::XmlCache;

/// A logged-in (or lazily logging-in) portal session.
///
/// Every request goes through the same pipeline: send, sign in once when the
/// portal bounces us to its login page, replay, check the status, persist
/// cookies. Requests are issued one at a time by the caller.
pub struct Smartschool {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) credentials: Credentials,
    pub(crate) settings: SessionConfig,
    pub(crate) cookies: Arc<CookieStoreMutex>,
    pub(crate) mfa: Option<Box<dyn MfaProvider>>,
    pub(crate) tracer: Option<DevTracer>,
    pub(crate) logins: AtomicU32,
    pub(crate) xml_cache: XmlCache,
    pub(crate) user: OnceCell<AuthenticatedUser>,
}

impl std::fmt::Debug for Smartschool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Smartschool")
            .field("base_url", &self.base_url)
            .field("username", &self.credentials.username)
            .field("logins", &self.login_count())
            .finish_non_exhaustive()
    }
}

impl Smartschool {
    /// Build a session without touching the network. The first request signs
    /// in when needed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] for missing credentials,
    /// [`ClientError::CookieStore`] for an unreadable cookie file and
    /// [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SmartschoolConfig) -> Result<Self, ClientError> {
        let credentials = config.credentials()?;
        let settings = config.session.clone();

        let store = cookies::load(settings.cookie_file.as_deref())?;
        let jar = Arc::new(CookieStoreMutex::new(store));

        let http = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .cookie_provider(Arc::clone(&jar))
            .build()?;

        Ok(Self {
            http,
            base_url: credentials.base_url(),
            tracer: settings.trace_dir.clone().map(DevTracer::new),
            credentials,
            settings,
            cookies: jar,
            mfa: None,
            logins: AtomicU32::new(0),
            xml_cache: XmlCache::default(),
            user: OnceCell::new(),
        })
    }

    /// Build a session and open `/login`, which signs in or lands on the
    /// main page when the stored cookies are still valid.
    ///
    /// # Errors
    ///
    /// See [`Self::new`] and [`Self::start`].
    pub async fn connect(config: &SmartschoolConfig) -> Result<Self, ClientError> {
        Self::new(config)?.start().await
    }

    /// Open `/login` on an already built session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Authentication`] when signing in fails and any
    /// transport or status error of the request itself.
    pub async fn start(self) -> Result<Self, ClientError> {
        self.send(PortalRequest::get("/login")).await?;
        Ok(self)
    }

    /// Answer two-factor challenges with codes from `provider`.
    #[must_use]
    pub fn with_mfa_provider(mut self, provider: impl MfaProvider + 'static) -> Self {
        self.mfa = Some(Box::new(provider));
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Number of completed sign-ins during this session.
    #[must_use]
    pub fn login_count(&self) -> u32 {
        self.logins.load(Ordering::SeqCst)
    }

    /// Join a portal path onto the base URL. Absolute URLs pass through.
    #[must_use]
    pub fn create_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Send one request without any login handling.
    pub(crate) async fn execute(
        &self,
        request: &PortalRequest,
    ) -> Result<PortalResponse, ClientError> {
        let url = self.create_url(&request.path);
        let mut builder = self.http.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Form(fields) => builder.form(fields),
            RequestBody::Raw { content_type, text } => {
                builder.header(CONTENT_TYPE, *content_type).body(text.clone())
            }
            RequestBody::Json(value) => builder.json(value),
        };

        let outcome = match builder.send().await {
            Ok(response) => PortalResponse::read(response).await,
            Err(e) => Err(e.into()),
        };

        match &outcome {
            Ok(response) => tracing::debug!(
                method = %request.method,
                url,
                status = response.status.as_u16(),
                final_url = %response.url,
                "portal request"
            ),
            Err(e) => tracing::debug!(method = %request.method, url, %e, "portal request failed"),
        }
        if let Some(tracer) = &self.tracer {
            tracer.record(&url, request, &outcome, self.login_count());
        }
        outcome
    }

    /// Send a request, signing in at most once when the portal asks for it.
    pub(crate) async fn send(&self, request: PortalRequest) -> Result<PortalResponse, ClientError> {
        let mut response = self.execute(&request).await?;

        if response.needs_login() {
            if self.login_count() > 0 {
                tracing::warn!(path = %request.path, "session expired, signing in again");
            }
            self.authenticate(response).await?;
            response = self.execute(&request).await?;
            if response.needs_login() {
                return Err(ClientError::Authentication(format!(
                    "still not signed in after logging in (landed on {})",
                    response.url
                )));
            }
        }

        let response = check_response(response)?;
        self.persist_cookies();
        Ok(response)
    }

    pub(crate) async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ClientError> {
        Ok(self.send(PortalRequest::get(path)).await?.body)
    }

    /// Send a request and decode its JSON answer.
    pub(crate) async fn json<T: DeserializeOwned>(
        &self,
        request: PortalRequest,
    ) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        decode_json(&response.body)
    }

    fn persist_cookies(&self) {
        let Some(path) = &self.settings.cookie_file else {
            return;
        };
        if let Err(e) = cookies::save(&self.cookies, path) {
            tracing::warn!(path = %path.display(), %e, "could not save cookies");
        }
    }
}

/// Decode a JSON body that may have been encoded more than once.
pub(crate) fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ClientError> {
    let mut value: Value = serde_json::from_slice(body)?;
    loop {
        match value {
            Value::String(inner) => value = serde_json::from_str(&inner)?,
            other => return Ok(serde_json::from_value(other)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config(main_url: &str) -> SmartschoolConfig {
        SmartschoolConfig {
            username: "bumba".into(),
            password: "delu".into(),
            main_url: main_url.into(),
            ..Default::default()
        }
    }

    #[test]
    fn double_encoded_json_is_unwrapped() {
        let body = serde_json::to_vec(&serde_json::to_string(&serde_json::json!({"a": 1})).unwrap())
            .unwrap();
        let value: Value = decode_json(&body).unwrap();
        assert_eq!(value, serde_json::json!({"a": 1}));
    }

    #[test]
    fn plain_json_is_decoded() {
        let values: Vec<i64> = decode_json(b"[1, 2, 3]").unwrap();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn builds_urls_from_host() {
        let session = Smartschool::new(&config("school.smartschool.be")).unwrap();
        assert_eq!(session.base_url(), "https://school.smartschool.be");
        assert_eq!(
            session.create_url("/results/api/v1/courses/"),
            "https://school.smartschool.be/results/api/v1/courses/"
        );
        assert_eq!(
            session.create_url("login"),
            "https://school.smartschool.be/login"
        );
        assert_eq!(session.create_url("https://cdn/x"), "https://cdn/x");
        assert_eq!(session.login_count(), 0);
    }

    #[test]
    fn missing_credentials_fail_early() {
        let err = Smartschool::new(&SmartschoolConfig::default()).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
