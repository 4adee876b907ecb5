//! Dataset API Client
//!
//! A Rust HTTP client for the dataset catalog API: datasets, dataset
//! versions and import instances.
//!
//! # Features
//!
//! - **Typed operations**: create, fetch, update and delete datasets and
//!   versions, and fetch instances
//! - **Automatic Retries**: 5xx responses are retried a bounded number of
//!   times with a fixed interval
//! - **Typed errors**: every HTTP status maps to a specific [`ClientError`]
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use dp_dataset_client::{ClientConfig, Dataset, DatasetApiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DatasetApiClient::new(
//!         ClientConfig::builder("http://localhost:22000")
//!             .auth_token("internal-token")
//!             .service_auth_token("Bearer service-token")
//!             .build()?
//!     )?;
//!
//!     let created = client
//!         .create_dataset("cpih01", &Dataset::new("cpih01").with_title("CPIH"))
//!         .await?;
//!     println!("created {}", created.id);
//!
//!     let version = client.get_dataset_version("cpih01", "time-series", "1").await?;
//!     println!("{:?}", version.state);
//!
//!     client.close()?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! All operations return `Result<T, ClientError>`. Errors include:
//!
//! - `InvalidArgument`: an identifier was empty or a dot segment; nothing was sent
//! - `Unauthorised`: 401
//! - `Forbidden` / `DatasetAlreadyExists`: 403, depending on the operation
//! - `DatasetNotFound` / `InstanceNotFound`: 404
//! - `BadRequest`: 400 on dataset update
//! - `UnexpectedResponse`: any other status, including 5xx once retries run out
//! - `Http` / `HttpMiddleware`: the request never got a response

pub mod client;
pub mod config;
pub mod error;
pub mod retry;
pub mod types;

// Re-exports for convenience
pub use client::{DatasetApiClient, SharedClient};
pub use config::{ClientConfig, ClientConfigBuilder, DatasetEnvelope};
pub use error::{ClientError, Result};
pub use retry::RetryStrategy;
pub use types::{
    Contact, Dataset, DatasetContacts, DatasetLinks, DatasetMetadata, DatasetResponse,
    DatasetVersion, Instance, InstanceLinks, Link, State,
};
