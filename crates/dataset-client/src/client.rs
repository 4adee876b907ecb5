//! HTTP client for the dataset API.

use crate::config::{ClientConfig, ClientConfigBuilder, DatasetEnvelope};
use crate::error::{ClientError, Result};
use crate::types::{Dataset, DatasetResponse, DatasetVersion, Instance};
use reqwest::header::{HeaderMap, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, StatusCode};
use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;

/// Dataset API client.
///
/// Every operation validates its identifiers, sends one request (retried by
/// the transport on 5xx responses) and maps the final status to a value or a
/// [`ClientError`]. The client holds no mutable state and can be shared
/// across tasks.
pub struct DatasetApiClient {
    http: ClientWithMiddleware,
    config: ClientConfig,
    credentials: HeaderMap,
}

impl DatasetApiClient {
    /// Create a new client builder with the given base URL.
    pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(base_url)
    }

    /// Create a new client using the default retrying transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = Self::default_transport(&config)?;
        Self::with_http_client(config, http)
    }

    /// Create a client that sends requests through `http`.
    ///
    /// No retry middleware is added; `http` is used exactly as given.
    pub fn with_http_client(config: ClientConfig, http: ClientWithMiddleware) -> Result<Self> {
        config.validate()?;
        let credentials = config.credential_headers()?.into_iter().collect();

        Ok(Self {
            http,
            config,
            credentials,
        })
    }

    /// Build the transport [`DatasetApiClient::new`] uses: a `reqwest` client
    /// wrapped in the configured 5xx retry strategy.
    pub fn default_transport(config: &ClientConfig) -> Result<ClientWithMiddleware> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, config.user_agent_header()?);

        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.tls_verify)
            .build()?;

        Ok(config.retry_strategy().wrap(reqwest_client))
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        self.config.trimmed_base_url()
    }

    /// Get the configuration the client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // =========================================================================
    // Instance Operations
    // =========================================================================

    /// Get the instance for the given instance ID.
    pub async fn get_instance(&self, instance_id: &str) -> Result<Instance> {
        require(instance_id, "an instance id must be provided")?;

        let path = format!("/instances/{}", urlencoding::encode(instance_id));
        let exchange = self.send(Method::GET, &path, None).await?;

        match exchange.status() {
            StatusCode::OK => exchange.json().await,
            StatusCode::NOT_FOUND => Err(ClientError::InstanceNotFound(exchange.summary())),
            _ => Err(exchange.unexpected()),
        }
    }

    // =========================================================================
    // Dataset Operations
    // =========================================================================

    /// Create a new dataset, returning the dataset as stored by the API.
    pub async fn create_dataset(&self, dataset_id: &str, dataset: &Dataset) -> Result<Dataset> {
        require(dataset_id, "a dataset id must be provided")?;

        let body = serde_json::to_vec(dataset)?;
        let exchange = self
            .send(Method::POST, &dataset_path(dataset_id), Some(body))
            .await?;

        match exchange.status() {
            StatusCode::CREATED => self.read_dataset(exchange).await,
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorised(exchange.summary())),
            StatusCode::FORBIDDEN => Err(ClientError::DatasetAlreadyExists(exchange.summary())),
            _ => Err(exchange.unexpected()),
        }
    }

    /// Get the dataset for the given dataset ID.
    pub async fn get_dataset(&self, dataset_id: &str) -> Result<Dataset> {
        require(dataset_id, "a dataset id must be provided")?;

        let exchange = self
            .send(Method::GET, &dataset_path(dataset_id), None)
            .await?;

        match exchange.status() {
            StatusCode::OK => self.read_dataset(exchange).await,
            _ => Err(exchange.path_error()),
        }
    }

    /// Delete the dataset for the given dataset ID.
    pub async fn delete_dataset(&self, dataset_id: &str) -> Result<()> {
        require(dataset_id, "a dataset id must be provided")?;

        let exchange = self
            .send(Method::DELETE, &dataset_path(dataset_id), None)
            .await?;

        match exchange.status() {
            StatusCode::NO_CONTENT => Ok(()),
            _ => Err(exchange.unexpected()),
        }
    }

    /// Replace the dataset for the given dataset ID.
    pub async fn update_dataset(&self, dataset_id: &str, dataset: &Dataset) -> Result<()> {
        require(dataset_id, "a dataset id must be provided")?;

        let body = serde_json::to_vec(dataset)?;
        let exchange = self
            .send(Method::PUT, &dataset_path(dataset_id), Some(body))
            .await?;

        match exchange.status() {
            StatusCode::OK => Ok(()),
            StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(exchange.summary())),
            _ => Err(exchange.path_error()),
        }
    }

    // =========================================================================
    // Version Operations
    // =========================================================================

    /// Get a particular version of a dataset.
    pub async fn get_dataset_version(
        &self,
        dataset_id: &str,
        edition: &str,
        version: &str,
    ) -> Result<DatasetVersion> {
        let path = version_path(dataset_id, edition, version)?;
        let exchange = self.send(Method::GET, &path, None).await?;

        match exchange.status() {
            StatusCode::OK => exchange.json().await,
            _ => Err(exchange.path_error()),
        }
    }

    /// Update a particular version of a dataset.
    pub async fn update_dataset_version(
        &self,
        dataset_id: &str,
        edition: &str,
        version: &str,
        dataset_version: &DatasetVersion,
    ) -> Result<()> {
        let path = version_path(dataset_id, edition, version)?;
        let body = serde_json::to_vec(dataset_version)?;
        let exchange = self.send(Method::PUT, &path, Some(body)).await?;

        match exchange.status() {
            StatusCode::OK => Ok(()),
            _ => Err(exchange.path_error()),
        }
    }

    /// Detach a version from its edition.
    pub async fn detach_version(
        &self,
        dataset_id: &str,
        edition: &str,
        version: &str,
    ) -> Result<()> {
        let path = version_path(dataset_id, edition, version)?;
        let exchange = self.send(Method::DELETE, &path, None).await?;

        match exchange.status() {
            StatusCode::OK => Ok(()),
            _ => Err(exchange.path_error()),
        }
    }

    /// Release the underlying transport.
    ///
    /// Consumes the client; in-flight requests on clones of the transport are
    /// unaffected.
    pub fn close(self) -> Result<()> {
        tracing::debug!(base_url = %self.base_url(), "Closing dataset API client");
        drop(self.http);
        Ok(())
    }

    // =========================================================================
    // Internal HTTP Methods
    // =========================================================================

    /// Send a request with the credential headers and an optional JSON body.
    async fn send(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<Exchange> {
        let url = format!("{}{}", self.base_url(), path);
        let start = Instant::now();

        tracing::debug!(
            method = %method,
            path = %path,
            "Sending request"
        );

        let mut request = self
            .http
            .request(method.clone(), &url)
            .headers(self.credentials.clone());
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request.send().await?;
        let status = response.status();

        tracing::debug!(
            method = %method,
            path = %path,
            status = %status.as_u16(),
            duration_ms = %start.elapsed().as_millis(),
            "Received response"
        );

        if !status.is_success() {
            tracing::warn!(
                method = %method,
                path = %path,
                status = %status.as_u16(),
                "Request failed"
            );
        }

        Ok(Exchange {
            method,
            url,
            response,
        })
    }

    /// Decode a dataset body according to the configured envelope.
    async fn read_dataset(&self, exchange: Exchange) -> Result<Dataset> {
        let envelope = self.config.dataset_envelope;
        if envelope == DatasetEnvelope::Bare {
            return exchange.json().await;
        }

        let target = format!("{} {}", exchange.method, exchange.url);
        let response: DatasetResponse = exchange.json().await?;
        let dataset = match envelope {
            DatasetEnvelope::Current => response.current,
            _ => response.next,
        };

        dataset.ok_or_else(|| {
            ClientError::InvalidResponse(format!(
                "response for {} has no {:?} dataset",
                target, envelope
            ))
        })
    }
}

/// A completed request and the response it produced.
struct Exchange {
    method: Method,
    url: String,
    response: reqwest::Response,
}

impl Exchange {
    fn status(&self) -> StatusCode {
        self.response.status()
    }

    fn summary(&self) -> String {
        format!(
            "the dataset api returned a {} response for {} {}",
            self.status().as_u16(),
            self.method,
            self.url
        )
    }

    fn unexpected(&self) -> ClientError {
        ClientError::UnexpectedResponse {
            status: self.status().as_u16(),
            message: self.summary(),
        }
    }

    /// Status mapping shared by the dataset and version endpoints.
    fn path_error(&self) -> ClientError {
        match self.status() {
            StatusCode::FORBIDDEN => ClientError::Forbidden(self.summary()),
            StatusCode::NOT_FOUND => ClientError::DatasetNotFound(self.summary()),
            StatusCode::UNAUTHORIZED => ClientError::Unauthorised(self.summary()),
            _ => self.unexpected(),
        }
    }

    async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            ClientError::InvalidResponse(format!(
                "Failed to parse response for {} {}: {} (body: {})",
                self.method,
                self.url,
                e,
                String::from_utf8_lossy(&body)
            ))
        })
    }
}

/// Reject identifiers that cannot name a path segment.
///
/// `.` and `..` survive percent-encoding and are collapsed by URL
/// normalization, so the request would reach a different resource.
fn require(value: &str, message: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ClientError::InvalidArgument(message.to_string()));
    }
    if value == "." || value == ".." {
        return Err(ClientError::InvalidArgument(format!(
            "{} (got dot segment {:?})",
            message, value
        )));
    }
    Ok(())
}

fn dataset_path(dataset_id: &str) -> String {
    format!("/datasets/{}", urlencoding::encode(dataset_id))
}

fn version_path(dataset_id: &str, edition: &str, version: &str) -> Result<String> {
    require(dataset_id, "a dataset id must be provided")?;
    require(edition, "an edition must be provided")?;
    require(version, "a version must be provided")?;

    Ok(format!(
        "/datasets/{}/editions/{}/versions/{}",
        urlencoding::encode(dataset_id),
        urlencoding::encode(edition),
        urlencoding::encode(version)
    ))
}

/// Arc-wrapped client for shared ownership.
pub type SharedClient = Arc<DatasetApiClient>;
