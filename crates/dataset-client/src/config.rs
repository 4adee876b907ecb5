//! Client configuration and builder pattern.

use crate::error::{ClientError, Result};
use crate::retry::{RetryStrategy, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_INTERVAL};
use reqwest::header::{HeaderName, HeaderValue};
use std::fmt;
use std::time::Duration;

/// Default header carrying the internal service-to-service token.
pub const DEFAULT_AUTH_TOKEN_HEADER: &str = "Internal-token";

/// Default header carrying the service authorization token.
pub const DEFAULT_SERVICE_TOKEN_HEADER: &str = "Authorization";

/// Which part of a dataset response body holds the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatasetEnvelope {
    /// `DatasetResponse.next`, the in-progress variant
    #[default]
    Next,
    /// `DatasetResponse.current`, the published variant
    Current,
    /// The body is the dataset itself, with no envelope
    Bare,
}

/// Configuration for the dataset API client.
///
/// # Security
///
/// The `Debug` implementation masks both tokens.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the dataset API (e.g., "http://localhost:22000")
    pub base_url: String,
    /// Internal service-to-service token
    pub auth_token: Option<String>,
    /// Header name for `auth_token` (default: "Internal-token")
    pub auth_token_header: String,
    /// Service authorization token, sent verbatim
    pub service_auth_token: Option<String>,
    /// Header name for `service_auth_token` (default: "Authorization")
    pub service_token_header: String,
    /// Where dataset responses carry the dataset (default: `next`)
    pub dataset_envelope: DatasetEnvelope,
    /// Request timeout (default: 30 seconds)
    pub timeout: Duration,
    /// Maximum number of retries for 5xx responses (default: 3)
    pub max_retries: u32,
    /// Fixed delay between retries (default: 20ms)
    pub retry_interval: Duration,
    /// Whether to verify TLS certificates (default: true)
    pub tls_verify: bool,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:22000".to_string(),
            auth_token: None,
            auth_token_header: DEFAULT_AUTH_TOKEN_HEADER.to_string(),
            service_auth_token: None,
            service_token_header: DEFAULT_SERVICE_TOKEN_HEADER.to_string(),
            dataset_envelope: DatasetEnvelope::Next,
            timeout: Duration::from_secs(30),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            tls_verify: true,
            user_agent: format!("dp-dataset-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "***REDACTED***"))
            .field("auth_token_header", &self.auth_token_header)
            .field(
                "service_auth_token",
                &self.service_auth_token.as_ref().map(|_| "***REDACTED***"),
            )
            .field("service_token_header", &self.service_token_header)
            .field("dataset_envelope", &self.dataset_envelope)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_interval", &self.retry_interval)
            .field("tls_verify", &self.tls_verify)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(base_url)
    }

    /// Minimum allowed timeout value.
    pub const MIN_TIMEOUT: Duration = Duration::from_millis(100);

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ClientError::Config("base_url cannot be empty".to_string()));
        }

        url::Url::parse(&self.base_url)
            .map_err(|e| ClientError::Config(format!("Invalid base_url: {}", e)))?;

        if self.timeout < Self::MIN_TIMEOUT {
            return Err(ClientError::Config(format!(
                "timeout ({:?}) must be >= {:?}",
                self.timeout,
                Self::MIN_TIMEOUT
            )));
        }

        self.user_agent_header()?;
        self.credential_headers()?;

        Ok(())
    }

    /// The configured User-Agent as a header value.
    pub fn user_agent_header(&self) -> Result<HeaderValue> {
        HeaderValue::from_str(&self.user_agent)
            .map_err(|_| ClientError::Config(format!("Invalid user_agent: {:?}", self.user_agent)))
    }

    /// Base URL with any trailing slash removed.
    pub fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// The retry strategy described by this configuration.
    pub fn retry_strategy(&self) -> RetryStrategy {
        RetryStrategy::new(self.max_retries, self.retry_interval)
    }

    /// Resolve the configured credentials into request headers.
    ///
    /// Tokens that are not configured produce no header.
    pub fn credential_headers(&self) -> Result<Vec<(HeaderName, HeaderValue)>> {
        let credentials = [
            (&self.auth_token_header, &self.auth_token),
            (&self.service_token_header, &self.service_auth_token),
        ];

        let mut headers = Vec::with_capacity(credentials.len());
        for (name, token) in credentials {
            let Some(token) = token else { continue };

            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ClientError::Config(format!("Invalid header name: {:?}", name)))?;
            let mut value = HeaderValue::from_str(token).map_err(|_| {
                ClientError::Config(format!("Invalid token format for header {}", name))
            })?;
            value.set_sensitive(true);
            headers.push((name, value));
        }

        Ok(headers)
    }
}

/// Builder for client configuration.
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            config: ClientConfig {
                base_url: base_url.into(),
                ..Default::default()
            },
        }
    }

    /// Set the internal service-to-service token.
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.config.auth_token = Some(token.into());
        self
    }

    /// Set the header name the internal token is sent in.
    pub fn auth_token_header(mut self, name: impl Into<String>) -> Self {
        self.config.auth_token_header = name.into();
        self
    }

    /// Set the service authorization token.
    pub fn service_auth_token(mut self, token: impl Into<String>) -> Self {
        self.config.service_auth_token = Some(token.into());
        self
    }

    /// Set the header name the service token is sent in.
    pub fn service_token_header(mut self, name: impl Into<String>) -> Self {
        self.config.service_token_header = name.into();
        self
    }

    /// Choose how dataset responses are unwrapped.
    pub fn dataset_envelope(mut self, envelope: DatasetEnvelope) -> Self {
        self.config.dataset_envelope = envelope;
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the maximum number of retries.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    /// Set the fixed delay between retries.
    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.config.retry_interval = interval;
        self
    }

    /// Set whether to verify TLS certificates.
    pub fn tls_verify(mut self, verify: bool) -> Self {
        self.config.tls_verify = verify;
        self
    }

    /// Set a custom User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the configuration, validating all settings.
    pub fn build(self) -> Result<ClientConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.auth_token.is_none());
        assert_eq!(config.auth_token_header, "Internal-token");
        assert_eq!(config.service_token_header, "Authorization");
        assert_eq!(config.dataset_envelope, DatasetEnvelope::Next);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_interval, Duration::from_millis(20));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder("https://api.example.com/")
            .auth_token("12345")
            .auth_token_header("internal-token")
            .service_auth_token("67856")
            .dataset_envelope(DatasetEnvelope::Current)
            .max_retries(5)
            .retry_interval(Duration::from_millis(50))
            .build()
            .unwrap();

        assert_eq!(config.trimmed_base_url(), "https://api.example.com");
        assert_eq!(config.auth_token.as_deref(), Some("12345"));
        assert_eq!(config.auth_token_header, "internal-token");
        assert_eq!(config.service_auth_token.as_deref(), Some("67856"));
        assert_eq!(config.dataset_envelope, DatasetEnvelope::Current);
        assert_eq!(
            config.retry_strategy(),
            RetryStrategy::new(5, Duration::from_millis(50))
        );
    }

    #[test]
    fn test_invalid_url() {
        let result = ClientConfig::builder("{{}}").build();
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_empty_url() {
        let result = ClientConfig::builder("").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_timeout_too_small() {
        let result = ClientConfig::builder("http://localhost:22000")
            .timeout(Duration::from_millis(50))
            .build();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_invalid_header_name() {
        let result = ClientConfig::builder("http://localhost:22000")
            .auth_token("12345")
            .auth_token_header("Internal token")
            .build();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("Invalid header name"));
    }

    #[test]
    fn test_invalid_token_value() {
        let result = ClientConfig::builder("http://localhost:22000")
            .service_auth_token("line\nbreak")
            .build();

        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_invalid_user_agent() {
        let result = ClientConfig::builder("http://localhost:22000")
            .user_agent("bad\nagent")
            .build();

        let err = result.unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
        assert!(err.to_string().contains("user_agent"));
    }

    #[test]
    fn test_credential_headers_skip_unset_tokens() {
        let config = ClientConfig::builder("http://localhost:22000")
            .auth_token("12345")
            .build()
            .unwrap();

        let headers = config.credential_headers().unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].0.as_str(), "internal-token");
        assert_eq!(headers[0].1.to_str().unwrap(), "12345");
        assert!(headers[0].1.is_sensitive());
    }

    #[test]
    fn test_tokens_masked_in_debug() {
        let config = ClientConfig::builder("http://localhost:22000")
            .auth_token("super_secret_internal")
            .service_auth_token("Bearer super_secret_service")
            .build()
            .unwrap();

        let debug_output = format!("{:?}", config);

        assert!(!debug_output.contains("super_secret"));
        assert!(debug_output.contains("REDACTED"));
    }
}
