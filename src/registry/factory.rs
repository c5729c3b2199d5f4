//! registry::factory
//!
//! Registry creation from a resolved connection target.
//!
//! Commands call [`create_registry`] instead of constructing a backend
//! directly, so the choice of transport stays in one place.
//!
//! # Example
//!
//! ```ignore
//! use srstats::registry::{create_registry, RegistryTarget};
//!
//! let target = RegistryTarget::new("http://localhost:8081");
//! let registry = create_registry(&target)?;
//! let subjects = registry.list_subjects(false).await?;
//! ```

use std::sync::Arc;

use super::http::{BasicAuth, HttpRegistry};
use super::traits::{Registry, RegistryError};

/// Where and how to connect to a registry.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistryTarget {
    /// Base URL of the REST API
    pub url: String,
    /// Basic auth username (or API key)
    pub username: Option<String>,
    /// Basic auth password (or API secret)
    pub password: Option<String>,
    /// Schema context; `None`, `""` and `"."` mean the default context
    pub context: Option<String>,
}

impl RegistryTarget {
    /// A target with no credentials and the default context.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Basic auth credentials, if a username is set.
    ///
    /// A missing password is sent as empty.
    pub fn auth(&self) -> Option<BasicAuth> {
        self.username.as_ref().map(|username| BasicAuth {
            username: username.clone(),
            password: self.password.clone().unwrap_or_default(),
        })
    }
}

// Custom Debug to avoid exposing the password
impl std::fmt::Debug for RegistryTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryTarget")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("has_password", &self.password.is_some())
            .field("context", &self.context)
            .finish()
    }
}

/// Create a registry for `target`.
///
/// # Errors
///
/// `RegistryError::InvalidUrl` if the URL cannot address the REST API.
pub fn create_registry(target: &RegistryTarget) -> Result<Arc<dyn Registry>, RegistryError> {
    let mut registry = HttpRegistry::new(&target.url, target.auth())?;
    if let Some(context) = &target.context {
        registry = registry.with_context(context.as_str());
    }
    Ok(Arc::new(registry))
}
