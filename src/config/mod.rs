//! Configuration system (layered: code > env > defaults).

use std::path::PathBuf;
use std::time::Duration;

use crate::error::CrmError;

/// Backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3001";

/// Front-end route the user is sent to when the session ends.
pub const DEFAULT_LOGIN_PATH: &str = "/auth";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration.
///
/// Resolution order:
/// 1. Explicit `with_*` setters
/// 2. Environment (`CRM_BASE_URL`, `CRM_LOGIN_PATH`, `CRM_TIMEOUT_SECS`,
///    `CRM_CREDENTIALS_DIR`), including a `.env` file when present
/// 3. Built-in defaults
#[derive(Debug, Clone)]
pub struct CrmConfig {
    base_url: String,
    login_path: String,
    timeout: Duration,
    credentials_dir: PathBuf,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CrmConfig {
    /// Create config with built-in defaults only.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            credentials_dir: default_credentials_dir(),
        }
    }

    /// Load from environment variables on top of the defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::new();

        if let Ok(url) = std::env::var("CRM_BASE_URL") {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }
        if let Ok(path) = std::env::var("CRM_LOGIN_PATH") {
            if !path.trim().is_empty() {
                config.login_path = path;
            }
        }
        if let Ok(raw) = std::env::var("CRM_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %raw, "Ignoring invalid CRM_TIMEOUT_SECS"),
            }
        }
        if let Ok(dir) = std::env::var("CRM_CREDENTIALS_DIR") {
            if !dir.trim().is_empty() {
                config.credentials_dir = PathBuf::from(dir);
            }
        }

        config
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_credentials_dir(mut self, dir: PathBuf) -> Self {
        self.credentials_dir = dir;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn credentials_dir(&self) -> &PathBuf {
        &self.credentials_dir
    }

    /// Parse the base URL, normalizing it to end with `/` so relative
    /// endpoint paths join under it instead of replacing its last segment.
    pub fn parsed_base_url(&self) -> Result<reqwest::Url, CrmError> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        reqwest::Url::parse(&raw)
            .map_err(|e| CrmError::Configuration(format!("invalid base URL {raw:?}: {e}")))
    }
}

fn default_credentials_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".crm"))
        .unwrap_or_else(|| PathBuf::from(".crm"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = CrmConfig::new();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.login_path(), "/auth");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn parsed_base_url_appends_trailing_slash() {
        let config = CrmConfig::new().with_base_url("https://crm.example.com/api");
        let url = config.parsed_base_url().unwrap();
        assert_eq!(url.as_str(), "https://crm.example.com/api/");
        assert_eq!(
            url.join("users").unwrap().as_str(),
            "https://crm.example.com/api/users"
        );
    }

    #[test]
    fn parsed_base_url_rejects_garbage() {
        let config = CrmConfig::new().with_base_url("not a url");
        assert!(matches!(
            config.parsed_base_url(),
            Err(CrmError::Configuration(_))
        ));
    }

    #[test]
    fn setters_override_defaults() {
        let config = CrmConfig::new()
            .with_login_path("/login")
            .with_timeout(Duration::from_secs(5))
            .with_credentials_dir(PathBuf::from("/tmp/crm"));
        assert_eq!(config.login_path(), "/login");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.credentials_dir(), &PathBuf::from("/tmp/crm"));
    }
}
