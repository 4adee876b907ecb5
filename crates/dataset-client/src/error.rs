//! Error types for the dataset API client.

/// Errors that can occur when using the dataset API client.
///
/// Status-derived variants carry a message naming the status code, the
/// request method and the full URL that produced it.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A required identifier was empty; no request was sent
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Authentication failed (401)
    #[error("Unauthorised: {0}")]
    Unauthorised(String),

    /// Permission denied (403) on a read or update endpoint
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Dataset creation rejected because the dataset exists (403 on create)
    #[error("Dataset already exists: {0}")]
    DatasetAlreadyExists(String),

    /// Dataset, edition or version not found (404)
    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    /// Instance not found (404)
    #[error("Instance not found: {0}")]
    InstanceNotFound(String),

    /// Dataset update rejected as malformed (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Any status code the operation does not map explicitly
    #[error("Unexpected response ({status}): {message}")]
    UnexpectedResponse {
        /// HTTP status code
        status: u16,
        /// Method and URL of the failing request
        message: String,
    },

    /// HTTP transport error (connection, DNS, TLS, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Transport error raised through the middleware stack
    #[error("HTTP request error: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// Response body could not be read or decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request body could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Returns the HTTP status code behind this error, if it came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorised(_) => Some(401),
            ClientError::Forbidden(_) | ClientError::DatasetAlreadyExists(_) => Some(403),
            ClientError::DatasetNotFound(_) | ClientError::InstanceNotFound(_) => Some(404),
            ClientError::BadRequest(_) => Some(400),
            ClientError::UnexpectedResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Http(_) | ClientError::HttpMiddleware(_))
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
