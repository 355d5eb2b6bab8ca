//! # smartschool-config
//!
//! Layered configuration loading for the Smartschool client using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SMARTSCHOOL_*` prefix, `__` as separator)
//! 2. Project-level `.smartschool/config.toml`
//! 3. `credentials.yml` in the working directory
//! 4. User-level `~/.config/smartschool/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SMARTSCHOOL_USERNAME` -> `username` and
//! `SMARTSCHOOL_SESSION__COOKIE_FILE` -> `session.cookie_file`.
//!
//! # Usage
//!
//! ```no_run
//! use smartschool_config::SmartschoolConfig;
//!
//! let config = SmartschoolConfig::load_with_dotenv().expect("config");
//! let credentials = config.credentials().expect("credentials");
//! println!("Portal: {}", credentials.base_url());
//! ```

mod credentials;
mod error;
mod session;

pub use credentials::Credentials;
pub use error::ConfigError;
pub use session::{DEFAULT_USER_AGENT, SessionConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "SMARTSCHOOL_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SmartschoolConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub main_url: String,
    #[serde(default)]
    pub birthday: String,
    #[serde(default)]
    pub session: SessionConfig,
}

impl SmartschoolConfig {
    /// Load configuration from all sources (config files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Load one explicit credentials file (YAML, or TOML when the extension
    /// is `.toml`), still letting environment variables override it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the file does not exist and
    /// [`ConfigError::Figment`] if it cannot be parsed.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::InvalidValue {
                field: "credentials file".into(),
                reason: format!("{} does not exist", path.display()),
            });
        }

        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        figment = if path.extension().is_some_and(|ext| ext == "toml") {
            figment.merge(Toml::file(path))
        } else {
            figment.merge(Yaml::file(path))
        };
        figment = figment.merge(Self::env_provider());

        figment.extract().map_err(ConfigError::from)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let credentials_path = PathBuf::from("credentials.yml");
        if credentials_path.exists() {
            figment = figment.merge(Yaml::file(credentials_path));
        }

        let local_path = PathBuf::from(".smartschool/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Self::env_provider())
    }

    /// Validated credentials taken from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCredentials`] when a required field is
    /// empty.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let birthday = (!self.birthday.trim().is_empty()).then_some(self.birthday.as_str());
        Credentials::new(&self.username, &self.password, &self.main_url, birthday)
    }

    fn env_provider() -> Env {
        Env::prefixed(ENV_PREFIX).split("__")
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("smartschool").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_credentials() {
        let config = SmartschoolConfig::default();
        assert!(config.username.is_empty());
        assert!(config.credentials().is_err());
        assert_eq!(config.session.results_per_page, 50);
    }

    #[test]
    fn credentials_from_config() {
        let config = SmartschoolConfig {
            username: "bumba".into(),
            password: "delu".into(),
            main_url: "site".into(),
            ..Default::default()
        };
        let creds = config.credentials().unwrap();
        assert_eq!(creds.username, "bumba");
        assert!(creds.birthday.is_none());
    }
}
