use crate::{
    config::StabilityConfig,
    error::{Result, StabilityError},
    response::validate_response,
    transport::{HttpRequest, HttpTransport},
};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    Method,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

const ORGANIZATION: &str = "organization";
const CLIENT_ID: &str = "stability-client-id";
const CLIENT_VERSION: &str = "stability-client-version";

/// Shared core of the endpoint clients: URL and header construction,
/// dispatch and response classification.
#[derive(Clone)]
pub struct ApiClient {
    config: Arc<StabilityConfig>,
    transport: Arc<dyn HttpTransport>,
}

impl ApiClient {
    pub fn new(config: StabilityConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    /// Auth header plus whichever optional identification headers are configured.
    pub fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            header_value("Authorization", &format!("Bearer {}", self.config.api_key))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(organization) = present(&self.config.organization) {
            headers.insert(ORGANIZATION, header_value("Organization", organization)?);
        }
        if let Some(client_id) = present(&self.config.client_id) {
            headers.insert(CLIENT_ID, header_value("Stability-Client-ID", client_id)?);
        }
        if let Some(client_version) = present(&self.config.client_version) {
            headers.insert(
                CLIENT_VERSION,
                header_value("Stability-Client-Version", client_version)?,
            );
        }
        Ok(headers)
    }

    pub fn prepare(
        &self,
        method: Method,
        path: &str,
        timeout: Option<Duration>,
    ) -> Result<HttpRequest> {
        Ok(HttpRequest {
            method,
            url: self.config.endpoint_url(path)?,
            headers: self.build_headers()?,
            body: None,
            timeout,
        })
    }

    pub async fn execute<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T> {
        log::info!("{} {}", request.method, request.url.path());
        let response = self.transport.send(request).await?;
        log::debug!(
            "Received status {} ({} bytes)",
            response.status,
            response.body.len()
        );
        validate_response(&response)
    }

    /// Bodiless GET bounded by the configured request timeout.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.prepare(Method::GET, path, Some(self.config.request_timeout))?;
        self.execute(request).await
    }
}

/// Blank values count as unset so they never go out as empty headers.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| {
        StabilityError::ConfigError(format!("{} header value is not a valid header", name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ReqwestTransport;

    fn api(config: StabilityConfig) -> ApiClient {
        ApiClient::new(config, Arc::new(ReqwestTransport::new()))
    }

    #[test]
    fn test_minimal_headers() {
        let headers = api(StabilityConfig::new("key")).build_headers().unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer key");
        assert!(headers.get("organization").is_none());
        assert!(headers.get("stability-client-id").is_none());
        assert!(headers.get("stability-client-version").is_none());
    }

    #[test]
    fn test_optional_headers() {
        let config = StabilityConfig::new("key")
            .with_organization("org-1")
            .with_client_id("my-app")
            .with_client_version("1.2.3");
        let headers = api(config).build_headers().unwrap();
        assert_eq!(headers.get("organization").unwrap(), "org-1");
        assert_eq!(headers.get("stability-client-id").unwrap(), "my-app");
        assert_eq!(headers.get("stability-client-version").unwrap(), "1.2.3");
    }

    #[test]
    fn test_blank_optional_values_emit_no_header() {
        let config = StabilityConfig::new("key")
            .with_organization("")
            .with_client_id(" ")
            .with_client_version("");
        let headers = api(config).build_headers().unwrap();
        assert!(headers.get("organization").is_none());
        assert!(headers.get("stability-client-id").is_none());
        assert!(headers.get("stability-client-version").is_none());
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_unrepresentable_header_is_config_error() {
        let config = StabilityConfig::new("key").with_organization("line\nbreak");
        assert!(matches!(
            api(config).build_headers(),
            Err(StabilityError::ConfigError(_))
        ));
    }
}
