use std::time::Duration;

use crate::error::{invalid_argument, AgentResult};

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8200/intake";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Agent configuration. `app_name` is required; everything else has a default.
///
/// `active = false` disables transmission only — transactions and errors are
/// still captured, and `send()` still resets the stores.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub app_name: String,
    pub active: bool,
    pub server_url: String,
    pub secret_token: Option<String>,
    pub app_version: Option<String>,
    pub environment: Option<String>,
    pub framework_name: Option<String>,
    pub framework_version: Option<String>,
    pub timeout: Duration,
}

impl Config {
    pub fn new(app_name: impl Into<String>) -> AgentResult<Self> {
        let app_name = app_name.into();
        if app_name.trim().is_empty() {
            return Err(invalid_argument("appName must not be empty"));
        }
        Ok(Self {
            app_name,
            active: true,
            server_url: DEFAULT_SERVER_URL.to_string(),
            secret_token: None,
            app_version: None,
            environment: None,
            framework_name: None,
            framework_version: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = server_url.into();
        self
    }

    pub fn with_secret_token(mut self, secret_token: impl Into<String>) -> Self {
        self.secret_token = Some(secret_token.into());
        self
    }

    pub fn with_app_version(mut self, app_version: impl Into<String>) -> Self {
        self.app_version = Some(app_version.into());
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn with_framework(
        mut self,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        self.framework_name = Some(name.into());
        self.framework_version = Some(version.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgentErrorCode;

    #[test]
    fn defaults_to_active() {
        let config = Config::new("svc").unwrap();
        assert!(config.active);
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.secret_token.is_none());
    }

    #[test]
    fn empty_app_name_is_rejected() {
        let err = Config::new("  ").unwrap_err();
        assert_eq!(err.code, AgentErrorCode::InvalidArgument);
    }

    #[test]
    fn setters_chain() {
        let config = Config::new("svc")
            .unwrap()
            .with_active(false)
            .with_server_url("https://collector.example/intake")
            .with_secret_token("s3cr3t")
            .with_framework("axum", "0.8");
        assert!(!config.active);
        assert_eq!(config.server_url, "https://collector.example/intake");
        assert_eq!(config.secret_token.as_deref(), Some("s3cr3t"));
        assert_eq!(config.framework_name.as_deref(), Some("axum"));
    }
}
