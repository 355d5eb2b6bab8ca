//! Sign-in state machine.
//!
//! `LoginForm → (AccountVerification | TwoFactor)* → Authenticated`. The
//! step is derived from the URL the portal leaves us on after each POST.

use reqwest::Url;
use serde::Deserialize;
use smartschool_config::Credentials;
use std::sync::atomic::Ordering;

use crate::Smartschool;
use crate::error::ClientError;
use crate::html::{FormField, form_fields};
use crate::http::{PortalRequest, PortalResponse, check_response};
use crate::session::decode_json;

const LOGIN_FORM: &str = "login_form";
const ACCOUNT_VERIFICATION_FORM: &str = "account_verification_form";
const GOOGLE_AUTHENTICATOR: &str = "googleAuthenticator";
const MAX_AUTH_STEPS: usize = 4;

/// Supplies one-time codes when the account has two-factor authentication.
pub trait MfaProvider: Send + Sync {
    /// Current code of the authenticator app.
    fn google_authenticator_code(&self) -> String;
}

impl<F> MfaProvider for F
where
    F: Fn() -> String + Send + Sync,
{
    fn google_authenticator_code(&self) -> String {
        self()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuthStep {
    LoginForm,
    AccountVerification,
    TwoFactor,
    Authenticated,
}

impl AuthStep {
    pub fn classify(url: &Url) -> Self {
        let path = url.path().trim_end_matches('/');
        if path.ends_with("/login") {
            Self::LoginForm
        } else if path.contains("/account-verification") {
            Self::AccountVerification
        } else if path == "/2fa" || path.starts_with("/2fa/") {
            Self::TwoFactor
        } else {
            Self::Authenticated
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TwoFactorConfig {
    #[serde(default)]
    possible_authentication_mechanisms: Vec<String>,
}

/// Put the credentials into the login form, keeping every other value
/// (CSRF token, submit button) as served.
pub(crate) fn fill_login_form(
    fields: Vec<FormField>,
    credentials: &Credentials,
) -> Result<Vec<(String, String)>, ClientError> {
    let (mut has_username, mut has_password) = (false, false);
    let mut data = Vec::with_capacity(fields.len());
    for field in fields {
        let value = if field.name.contains("username") {
            has_username = true;
            credentials.username.clone()
        } else if field.name.contains("password") {
            has_password = true;
            credentials.password.clone()
        } else {
            field.value
        };
        data.push((field.name, value));
    }

    if !(has_username && has_password) {
        return Err(ClientError::Parse(
            "login form has no username or password field".into(),
        ));
    }
    Ok(data)
}

/// Answer the birthday question of the account verification form.
pub(crate) fn fill_verification_form(
    fields: Vec<FormField>,
    birthday: &str,
) -> Result<Vec<(String, String)>, ClientError> {
    let mut answered = false;
    let data = fields
        .into_iter()
        .map(|field| {
            if field.name.contains("birthdate") || field.name.contains("security_question_answer") {
                answered = true;
                (field.name, birthday.to_string())
            } else {
                (field.name, field.value)
            }
        })
        .collect();

    if !answered {
        return Err(ClientError::Parse(
            "account verification form has no birthday field".into(),
        ));
    }
    Ok(data)
}

impl Smartschool {
    /// Walk the sign-in steps, starting from the page that sent us here.
    pub(crate) async fn authenticate(&self, landing: PortalResponse) -> Result<(), ClientError> {
        let mut page = if landing.lands_on_login() {
            landing
        } else {
            self.execute(&PortalRequest::get("/login")).await?
        };
        let (mut submitted_login, mut submitted_verification) = (false, false);

        for _ in 0..MAX_AUTH_STEPS {
            page = match AuthStep::classify(&page.url) {
                AuthStep::LoginForm if submitted_login => {
                    return Err(ClientError::Authentication(
                        "the portal rejected the username or password".into(),
                    ));
                }
                AuthStep::LoginForm => {
                    submitted_login = true;
                    self.submit_login(&page).await?
                }
                AuthStep::AccountVerification if submitted_verification => {
                    return Err(ClientError::Authentication(
                        "the portal rejected the birthday answer".into(),
                    ));
                }
                AuthStep::AccountVerification => {
                    submitted_verification = true;
                    self.submit_account_verification(&page).await?
                }
                AuthStep::TwoFactor => self.submit_two_factor().await?,
                AuthStep::Authenticated => {
                    let logins = self.logins.fetch_add(1, Ordering::SeqCst) + 1;
                    tracing::info!(
                        user = %self.credentials.username,
                        portal = %self.base_url,
                        logins,
                        "signed in"
                    );
                    return Ok(());
                }
            };
        }

        Err(ClientError::Authentication(format!(
            "sign-in did not finish within {MAX_AUTH_STEPS} steps"
        )))
    }

    async fn submit_login(&self, page: &PortalResponse) -> Result<PortalResponse, ClientError> {
        let fields = form_fields(&page.text(), LOGIN_FORM)?;
        let data = fill_login_form(fields, &self.credentials)?;
        self.execute(&PortalRequest::post(page.url.as_str()).form(data))
            .await
    }

    async fn submit_account_verification(
        &self,
        page: &PortalResponse,
    ) -> Result<PortalResponse, ClientError> {
        let Some(birthday) = self.credentials.birthday.as_deref() else {
            return Err(ClientError::Authentication(
                "the portal asks for account verification but no birthday is configured".into(),
            ));
        };
        tracing::debug!("answering account verification");
        let fields = form_fields(&page.text(), ACCOUNT_VERIFICATION_FORM)?;
        let data = fill_verification_form(fields, birthday)?;
        self.execute(&PortalRequest::post(page.url.as_str()).form(data))
            .await
    }

    async fn submit_two_factor(&self) -> Result<PortalResponse, ClientError> {
        let config = check_response(
            self.execute(&PortalRequest::get("/2fa/api/v1/config").xhr())
                .await?,
        )?;
        let config: TwoFactorConfig = decode_json(&config.body)?;
        let offered = config.possible_authentication_mechanisms;

        let Some(provider) = self.mfa.as_deref() else {
            return Err(ClientError::Authentication(format!(
                "two-factor authentication required ({}) but no MFA provider is configured",
                offered.join(", ")
            )));
        };
        if !offered.iter().any(|m| m == GOOGLE_AUTHENTICATOR) {
            return Err(ClientError::Authentication(format!(
                "unsupported two-factor mechanisms: {}",
                offered.join(", ")
            )));
        }

        tracing::debug!("answering two-factor challenge");
        let code = provider.google_authenticator_code();
        let answer = self
            .execute(
                &PortalRequest::post("/2fa/api/v1/google-authenticator")
                    .json_body(serde_json::json!({ "google2fa": code }))
                    .xhr(),
            )
            .await?;
        if !answer.status.is_success() {
            return Err(ClientError::Authentication(format!(
                "two-factor code rejected ({})",
                answer.status
            )));
        }

        self.execute(&PortalRequest::get("/")).await
    }
}
