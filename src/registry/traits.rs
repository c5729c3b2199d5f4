//! registry::traits
//!
//! Registry trait definition and the wire types it returns.
//!
//! # Design
//!
//! The `Registry` trait is async because every operation is a network round
//! trip. All methods return `Result` so that callers can decide, per call,
//! whether a failure is fatal (enumerating the registry) or recoverable
//! (fetching one version of one subject).
//!
//! # Example
//!
//! ```ignore
//! use srstats::registry::{Registry, RegistryError};
//!
//! async fn newest(registry: &dyn Registry, subject: &str) -> Result<usize, RegistryError> {
//!     let versions = registry.list_versions(subject, false).await?;
//!     let Some(latest) = versions.last() else {
//!         return Ok(0);
//!     };
//!     let record = registry.get_schema(subject, *latest).await?;
//!     Ok(record.schema.len())
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from registry operations.
///
/// These map the failure modes of a Confluent-compatible REST API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The subject, version or endpoint does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Credentials were rejected or lack permissions.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// The registry answered with a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the registry
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),

    /// A success response whose body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The configured registry URL cannot address REST endpoints.
    #[error("invalid registry URL: {0}")]
    InvalidUrl(String),
}

impl RegistryError {
    /// Whether this error means the resource is absent rather than unreachable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound(_))
    }
}

/// A dependency of one schema on another registered schema.
///
/// Only the number of references matters for statistics; the fields are kept
/// so JSON round-trips through the mock match what a registry serves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaReference {
    /// Import name used inside the referencing schema
    pub name: String,
    /// Subject of the referenced schema
    pub subject: String,
    /// Version of the referenced schema
    pub version: u32,
}

/// One concrete schema version as returned by the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaRecord {
    /// Owning subject
    #[serde(default)]
    pub subject: String,
    /// Version number within the subject
    #[serde(default)]
    pub version: u32,
    /// Registry-wide schema ID
    #[serde(default)]
    pub id: i64,
    /// Raw type tag; empty means AVRO
    #[serde(default)]
    pub schema_type: String,
    /// Schema text
    pub schema: String,
    /// Schema references
    #[serde(default)]
    pub references: Vec<SchemaReference>,
    /// Soft-delete marker (only present on deleted-inclusive fetches)
    #[serde(default)]
    pub deleted: bool,
}

impl SchemaRecord {
    /// Size of the schema text in bytes.
    pub fn size(&self) -> u64 {
        self.schema.len() as u64
    }
}

/// The Registry trait for reading a schema registry.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: one instance is shared by every
/// worker of the stats scheduler.
///
/// # Error Handling
///
/// All methods return `Result<T, RegistryError>`. Callers should handle:
/// - `NotFound`: the subject or version is gone (often soft-deleted)
/// - `AuthFailed`: credentials are wrong for this registry
/// - `RateLimited` / `NetworkError`: transient, the version is reported as failed
#[async_trait]
pub trait Registry: Send + Sync {
    /// Get the backend name (e.g., "http", "mock").
    fn name(&self) -> &'static str;

    /// List subject names.
    ///
    /// With `include_deleted`, soft-deleted subjects are listed as well.
    async fn list_subjects(&self, include_deleted: bool) -> Result<Vec<String>, RegistryError>;

    /// List the version numbers registered under `subject`.
    async fn list_versions(
        &self,
        subject: &str,
        include_deleted: bool,
    ) -> Result<Vec<u32>, RegistryError>;

    /// Fetch one version of a subject.
    ///
    /// Soft-deleted versions are not visible through this call.
    async fn get_schema(&self, subject: &str, version: u32) -> Result<SchemaRecord, RegistryError>;

    /// Fetch one version of a subject, optionally including soft-deleted ones.
    async fn get_schema_including_deleted(
        &self,
        subject: &str,
        version: u32,
        include_deleted: bool,
    ) -> Result<SchemaRecord, RegistryError>;

    /// Get the registry-wide mode (e.g., "READWRITE").
    async fn get_mode(&self) -> Result<String, RegistryError>;

    /// Get the registry-wide compatibility level (e.g., "BACKWARD").
    async fn get_compatibility(&self) -> Result<String, RegistryError>;

    /// List schema contexts.
    async fn list_contexts(&self) -> Result<Vec<String>, RegistryError>;
}
