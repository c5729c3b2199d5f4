//! registry::http
//!
//! Registry implementation over the Confluent Schema Registry REST API.
//!
//! # Design
//!
//! Every trait method maps to one `GET` request. Subject names are pushed as
//! single, percent-encoded path segments so names containing `/` or spaces
//! address the right resource. When a schema context is configured, subject
//! endpoints are prefixed with `/contexts/{context}`; the context listing
//! itself is always global.
//!
//! # Authentication
//!
//! HTTP basic auth is sent on every request when a username is configured.
//! Confluent Cloud API keys use the same mechanism (key as username).
//!
//! # Example
//!
//! ```ignore
//! use srstats::registry::http::{HttpRegistry, BasicAuth};
//! use srstats::registry::Registry;
//!
//! let registry = HttpRegistry::new("http://localhost:8081", None)?
//!     .with_context(".production");
//! let subjects = registry.list_subjects(false).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::traits::{Registry, RegistryError, SchemaRecord};

/// Media type spoken by the registry.
const SCHEMA_REGISTRY_MEDIA_TYPE: &str = "application/vnd.schemaregistry.v1+json";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "srstats";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Basic auth credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    /// Username or API key
    pub username: String,
    /// Password or API secret
    pub password: String,
}

// Custom Debug to avoid exposing the password
impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// HTTP-backed registry.
pub struct HttpRegistry {
    /// HTTP client for making requests
    client: Client,
    /// Base URL with any trailing slash removed
    base: Url,
    /// Optional basic auth credentials
    auth: Option<BasicAuth>,
    /// Schema context; `None` is the default context
    context: Option<String>,
}

impl std::fmt::Debug for HttpRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRegistry")
            .field("base", &self.base.as_str())
            .field("has_auth", &self.auth.is_some())
            .field("context", &self.context)
            .finish()
    }
}

/// Error document returned by the registry on failures.
#[derive(Debug, Deserialize)]
struct RegistryErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ModeBody {
    mode: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigBody {
    #[serde(default)]
    compatibility_level: String,
    #[serde(default)]
    compatibility: String,
}

impl HttpRegistry {
    /// Create a registry client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidUrl` if the URL does not parse or cannot
    /// carry a path (e.g. `mailto:`), and `NetworkError` if the HTTP client
    /// cannot be constructed.
    pub fn new(base_url: &str, auth: Option<BasicAuth>) -> Result<Self, RegistryError> {
        let trimmed = base_url.trim_end_matches('/');
        let base = Url::parse(trimmed)
            .map_err(|e| RegistryError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(RegistryError::InvalidUrl(base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(SCHEMA_REGISTRY_MEDIA_TYPE));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static(SCHEMA_REGISTRY_MEDIA_TYPE),
        );
        headers.insert(
            HeaderName::from_static("confluent-accept-unknown-properties"),
            HeaderValue::from_static("true"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT_VALUE)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RegistryError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            base,
            auth,
            context: None,
        })
    }

    /// Scope subject operations to a schema context.
    ///
    /// An empty context or `"."` selects the default context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        self.context = if context.is_empty() || context == "." {
            None
        } else {
            Some(context)
        };
        self
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Build an endpoint URL from path segments.
    fn endpoint(&self, segments: &[&str], contextual: bool) -> Result<Url, RegistryError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| RegistryError::InvalidUrl(self.base.to_string()))?;
            path.pop_if_empty();
            if contextual {
                if let Some(ref context) = self.context {
                    path.push("contexts").push(context);
                }
            }
            path.extend(segments);
        }
        Ok(url)
    }

    /// Start a GET request with auth applied.
    fn get(&self, url: Url, include_deleted: bool) -> RequestBuilder {
        let mut request = self.client.get(url);
        if include_deleted {
            request = request.query(&[("deleted", "true")]);
        }
        if let Some(ref auth) = self.auth {
            request = request.basic_auth(&auth.username, Some(&auth.password));
        }
        request
    }

    /// Send a request and decode the JSON body.
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RegistryError> {
        let response = request
            .send()
            .await
            .map_err(|e| RegistryError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RegistryError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            return Err(map_error_status(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| RegistryError::InvalidResponse(e.to_string()))
    }
}

/// Map a non-success status and body to a `RegistryError`.
fn map_error_status(status: StatusCode, body: &str) -> RegistryError {
    let message = serde_json::from_str::<RegistryErrorBody>(body)
        .ok()
        .map(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED => RegistryError::AuthFailed("invalid credentials".into()),
        StatusCode::FORBIDDEN => RegistryError::AuthFailed(format!("permission denied: {}", message)),
        StatusCode::NOT_FOUND => RegistryError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => RegistryError::RateLimited,
        _ => RegistryError::ApiError {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl Registry for HttpRegistry {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn list_subjects(&self, include_deleted: bool) -> Result<Vec<String>, RegistryError> {
        let url = self.endpoint(&["subjects"], true)?;
        self.fetch(self.get(url, include_deleted)).await
    }

    async fn list_versions(
        &self,
        subject: &str,
        include_deleted: bool,
    ) -> Result<Vec<u32>, RegistryError> {
        let url = self.endpoint(&["subjects", subject, "versions"], true)?;
        self.fetch(self.get(url, include_deleted)).await
    }

    async fn get_schema(&self, subject: &str, version: u32) -> Result<SchemaRecord, RegistryError> {
        self.get_schema_including_deleted(subject, version, false)
            .await
    }

    async fn get_schema_including_deleted(
        &self,
        subject: &str,
        version: u32,
        include_deleted: bool,
    ) -> Result<SchemaRecord, RegistryError> {
        let version = version.to_string();
        let url = self.endpoint(&["subjects", subject, "versions", &version], true)?;
        self.fetch(self.get(url, include_deleted)).await
    }

    async fn get_mode(&self) -> Result<String, RegistryError> {
        let url = self.endpoint(&["mode"], true)?;
        let body: ModeBody = self.fetch(self.get(url, false)).await?;
        Ok(body.mode)
    }

    async fn get_compatibility(&self) -> Result<String, RegistryError> {
        let url = self.endpoint(&["config"], true)?;
        let body: ConfigBody = self.fetch(self.get(url, false)).await?;
        if body.compatibility_level.is_empty() {
            Ok(body.compatibility)
        } else {
            Ok(body.compatibility_level)
        }
    }

    async fn list_contexts(&self) -> Result<Vec<String>, RegistryError> {
        let url = self.endpoint(&["contexts"], false)?;
        self.fetch(self.get(url, false)).await
    }
}
