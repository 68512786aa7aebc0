use crate::error::{Result, StabilityError};
use reqwest::Url;
use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_SCHEME: &str = "https";
pub const DEFAULT_HOST: &str = "api.stability.ai";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Immutable client configuration; set once, shared by every call.
#[derive(Clone)]
pub struct StabilityConfig {
    pub api_key: String,
    /// Scopes requests to an organization other than the user's default.
    pub organization: Option<String>,
    /// Identifies the calling application (`Stability-Client-ID`).
    pub client_id: Option<String>,
    /// Version of the calling application (`Stability-Client-Version`).
    pub client_version: Option<String>,
    pub scheme: String,
    /// Host, optionally with `:port`.
    pub host: String,
    /// Inserted between the host and every endpoint path.
    pub path_prefix: Option<String>,
    /// Deadline for the JSON lookups. Generation calls never time out.
    pub request_timeout: Duration,
}

impl StabilityConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        StabilityConfig {
            api_key: api_key.into(),
            organization: None,
            client_id: None,
            client_version: None,
            scheme: DEFAULT_SCHEME.to_string(),
            host: DEFAULT_HOST.to_string(),
            path_prefix: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_key = non_empty_var("STABILITY_API_KEY").ok_or_else(|| {
            StabilityError::ConfigError("STABILITY_API_KEY is required".into())
        })?;

        let mut config = StabilityConfig::new(api_key);
        config.organization = non_empty_var("STABILITY_ORGANIZATION");
        config.client_id = non_empty_var("STABILITY_CLIENT_ID");
        config.client_version = non_empty_var("STABILITY_CLIENT_VERSION");
        config.path_prefix = non_empty_var("STABILITY_API_PATH_PREFIX");

        if let Some(scheme) = non_empty_var("STABILITY_API_SCHEME") {
            config.scheme = scheme;
        }
        if let Some(host) = non_empty_var("STABILITY_API_HOST") {
            config.host = host;
        }
        if let Some(secs) =
            non_empty_var("STABILITY_REQUEST_TIMEOUT_SECS").and_then(|s| s.parse().ok())
        {
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_client_version(mut self, client_version: impl Into<String>) -> Self {
        self.client_version = Some(client_version.into());
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_path_prefix(mut self, path_prefix: impl Into<String>) -> Self {
        self.path_prefix = Some(path_prefix.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Splits a full URL such as `http://127.0.0.1:8080/proxy` into
    /// scheme, host and path prefix.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url).map_err(|e| {
            StabilityError::ConfigError(format!("invalid base URL {}: {}", base_url, e))
        })?;
        let host = url.host_str().ok_or_else(|| {
            StabilityError::ConfigError(format!("base URL has no host: {}", base_url))
        })?;

        self.scheme = url.scheme().to_string();
        self.host = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let path = url.path().trim_matches('/');
        self.path_prefix = if path.is_empty() {
            None
        } else {
            Some(path.to_string())
        };
        Ok(self)
    }

    /// Absolute URL for an endpoint path such as `/v1/engines/list`.
    pub fn endpoint_url(&self, path: &str) -> Result<Url> {
        if self.host.trim().is_empty() {
            return Err(StabilityError::ConfigError("API host is empty".into()));
        }
        if self
            .host
            .contains(|c: char| matches!(c, '/' | '?' | '#' | '@') || c.is_whitespace())
        {
            return Err(StabilityError::ConfigError(format!(
                "invalid API host: {:?}",
                self.host
            )));
        }
        let prefix = match self.path_prefix.as_deref() {
            Some(prefix)
                if prefix.contains(|c: char| matches!(c, '?' | '#') || c.is_whitespace()) =>
            {
                return Err(StabilityError::ConfigError(format!(
                    "invalid path prefix: {:?}",
                    prefix
                )));
            }
            Some(prefix) => normalize_prefix(prefix),
            None => String::new(),
        };
        let raw = format!("{}://{}{}{}", self.scheme, self.host, prefix, path);

        let url = Url::parse(&raw).map_err(|e| {
            StabilityError::ConfigError(format!("invalid request URL {}: {}", raw, e))
        })?;
        if url.host_str().map_or(true, str::is_empty) {
            return Err(StabilityError::ConfigError(format!(
                "request URL has no host: {}",
                raw
            )));
        }
        // Dot segments are resolved by the parser and would retarget the request.
        if !url.path().ends_with(path) {
            return Err(StabilityError::ConfigError(format!(
                "request URL does not address {}: {}",
                path, url
            )));
        }
        Ok(url)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

impl fmt::Debug for StabilityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StabilityConfig")
            .field("api_key", &"<redacted>")
            .field("organization", &self.organization)
            .field("client_id", &self.client_id)
            .field("client_version", &self.client_version)
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("path_prefix", &self.path_prefix)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url() {
        let config = StabilityConfig::new("key");
        let url = config.endpoint_url("/v1/engines/list").unwrap();
        assert_eq!(url.as_str(), "https://api.stability.ai/v1/engines/list");
    }

    #[test]
    fn test_path_prefix_normalization() {
        for prefix in ["proxy", "/proxy", "proxy/", "/proxy/"] {
            let config = StabilityConfig::new("key").with_path_prefix(prefix);
            let url = config.endpoint_url("/v1/user/balance").unwrap();
            assert_eq!(url.as_str(), "https://api.stability.ai/proxy/v1/user/balance");
        }
    }

    #[test]
    fn test_with_base_url() {
        let config = StabilityConfig::new("key")
            .with_base_url("http://127.0.0.1:8080/gateway/")
            .unwrap();
        assert_eq!(config.scheme, "http");
        assert_eq!(config.host, "127.0.0.1:8080");
        assert_eq!(config.path_prefix.as_deref(), Some("gateway"));

        let url = config.endpoint_url("/v1/user/account").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/gateway/v1/user/account");
    }

    #[test]
    fn test_malformed_base_url_is_config_error() {
        let result = StabilityConfig::new("key").with_base_url("not a url");
        assert!(matches!(result, Err(StabilityError::ConfigError(_))));
    }

    #[test]
    fn test_malformed_host_is_config_error() {
        let config = StabilityConfig::new("key").with_host("bad host");
        assert!(matches!(
            config.endpoint_url("/v1/engines/list"),
            Err(StabilityError::ConfigError(_))
        ));

        let config = StabilityConfig::new("key").with_host("");
        assert!(matches!(
            config.endpoint_url("/v1/engines/list"),
            Err(StabilityError::ConfigError(_))
        ));
    }

    #[test]
    fn test_prefix_cannot_move_path_into_query() {
        for prefix in ["proxy?x", "proxy#frag", "pro xy"] {
            let config = StabilityConfig::new("key").with_path_prefix(prefix);
            assert!(matches!(
                config.endpoint_url("/v1/engines/list"),
                Err(StabilityError::ConfigError(_))
            ));
        }
    }

    #[test]
    fn test_host_cannot_carry_path() {
        for host in [
            "api.stability.ai/proxy",
            "api.stability.ai?x",
            "api.stability.ai#x",
            "user@api.stability.ai",
        ] {
            let config = StabilityConfig::new("key").with_host(host);
            assert!(matches!(
                config.endpoint_url("/v1/engines/list"),
                Err(StabilityError::ConfigError(_))
            ));
        }

        let config = StabilityConfig::new("key").with_host("localhost:8080");
        let url = config.endpoint_url("/v1/engines/list").unwrap();
        assert_eq!(url.as_str(), "https://localhost:8080/v1/engines/list");
    }

    #[test]
    fn test_dot_segments_are_rejected() {
        let config = StabilityConfig::new("key");
        assert!(matches!(
            config.endpoint_url("/v1/generation/../text-to-image"),
            Err(StabilityError::ConfigError(_))
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = StabilityConfig::new("sk-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_from_env() {
        env::set_var("STABILITY_API_KEY", "env-key");
        env::set_var("STABILITY_ORGANIZATION", "org-123");
        env::set_var("STABILITY_REQUEST_TIMEOUT_SECS", "5");

        let config = StabilityConfig::from_env().unwrap();
        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.organization.as_deref(), Some("org-123"));
        assert_eq!(config.client_id, None);
        assert_eq!(config.request_timeout, Duration::from_secs(5));

        env::set_var("STABILITY_ORGANIZATION", "");
        env::set_var("STABILITY_CLIENT_ID", "  ");
        let config = StabilityConfig::from_env().unwrap();
        assert_eq!(config.organization, None);
        assert_eq!(config.client_id, None);

        env::remove_var("STABILITY_CLIENT_ID");
        env::remove_var("STABILITY_API_KEY");
        env::remove_var("STABILITY_ORGANIZATION");
        env::remove_var("STABILITY_REQUEST_TIMEOUT_SECS");
        assert!(matches!(
            StabilityConfig::from_env(),
            Err(StabilityError::ConfigError(_))
        ));
    }
}
