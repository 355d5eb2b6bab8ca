//! HTTP session settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Browser user agent sent with every request. The portal serves a reduced
/// page to unknown agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/109.0";

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_results_per_page() -> u32 {
    50
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// `User-Agent` header value.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Where session cookies are persisted between runs. Disabled when unset.
    #[serde(default)]
    pub cookie_file: Option<PathBuf>,

    /// Directory receiving one trace file per request. Disabled when unset.
    #[serde(default)]
    pub trace_dir: Option<PathBuf>,

    /// Page size used when walking the paginated results endpoint.
    #[serde(default = "default_results_per_page")]
    pub results_per_page: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            cookie_file: None,
            trace_dir: None,
            results_per_page: default_results_per_page(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = SessionConfig::default();
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.results_per_page, 50);
        assert!(config.cookie_file.is_none());
        assert!(config.trace_dir.is_none());
    }
}
