//! Portal account credentials.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Validated credentials for one portal account.
///
/// Built through [`crate::SmartschoolConfig::credentials`], which trims every
/// field and rejects empty required ones.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// Host of the school's portal (e.g. `myschool.smartschool.be`). A value
    /// that already carries a scheme is used as is.
    pub main_url: String,
    /// Birthday in `YYYY-MM-DD` form, asked by the account verification step.
    pub birthday: Option<String>,
}

impl Credentials {
    /// Trim the raw values and check that every required field is present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCredentials`] listing every empty field.
    pub fn new(
        username: &str,
        password: &str,
        main_url: &str,
        birthday: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let username = username.trim();
        let password = password.trim();
        let main_url = main_url.trim();

        let missing: Vec<String> = [
            ("username", username),
            ("password", password),
            ("main_url", main_url),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name.to_string())
        .collect();

        if !missing.is_empty() {
            return Err(ConfigError::InvalidCredentials { fields: missing });
        }

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
            main_url: main_url.to_string(),
            birthday: birthday
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(ToString::to_string),
        })
    }

    /// Base URL of the portal, always without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        let url = if self.main_url.starts_with("http://") || self.main_url.starts_with("https://")
        {
            self.main_url.clone()
        } else {
            format!("https://{}", self.main_url)
        };
        url.trim_end_matches('/').to_string()
    }
}

// Keeps the password out of logs and panics.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("main_url", &self.main_url)
            .field("birthday", &self.birthday.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
