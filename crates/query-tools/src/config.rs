//! Static configuration for the query tools.
//!
//! The configuration is read once at process start and handed to [`crate::QueryTools::new`].
//! Nothing in this crate mutates it afterwards.

use crate::error::{QueryToolsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default Denodo AI SDK address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8008";

/// Per-call ceiling for a backend request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AdapterConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Username used when a caller does not pass one.
    pub username: String,
    /// Password used when a caller does not pass one.
    #[serde(skip_serializing)]
    pub password: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            username: String::new(),
            password: String::new(),
        }
    }
}

impl AdapterConfig {
    /// Load a JSON config file. A missing file yields [`AdapterConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns [`QueryToolsError::Config`] if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(QueryToolsError::Config(format!(
                    "read config {}: {e}",
                    path.display()
                )));
            }
        };
        serde_json::from_slice(&bytes)
            .map_err(|e| QueryToolsError::Config(format!("parse {}: {e}", path.display())))
    }

    /// Validate and parse the base address.
    ///
    /// # Errors
    ///
    /// Returns [`QueryToolsError::Config`] for a non-`http(s)` or unparsable base URL.
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            QueryToolsError::Config(format!("Invalid baseUrl '{}': {e}", self.base_url))
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(QueryToolsError::Config(format!(
                "Invalid baseUrl '{}': unsupported scheme '{other}'",
                self.base_url
            ))),
        }
    }

    /// # Errors
    ///
    /// Returns [`QueryToolsError::Config`] when the timeout is zero.
    pub fn timeout(&self) -> Result<Duration> {
        if self.timeout_secs == 0 {
            return Err(QueryToolsError::Config(
                "timeoutSecs must be greater than zero".to_string(),
            ));
        }
        Ok(Duration::from_secs(self.timeout_secs))
    }

    #[must_use]
    pub fn default_credentials(&self) -> DefaultCredentials {
        DefaultCredentials {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

/// Process-wide fallback for the per-call `username` / `password` arguments.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DefaultCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for DefaultCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl DefaultCredentials {
    /// Resolve the effective credentials for one call.
    ///
    /// Each field falls back to its default independently; the pair only survives when both
    /// resolved values are non-empty.
    #[must_use]
    pub fn resolve(&self, username: Option<&str>, password: Option<&str>) -> Option<Credentials> {
        Credentials::new(
            username.unwrap_or(&self.username),
            password.unwrap_or(&self.password),
        )
    }
}

/// HTTP basic-auth pair attached to a single backend request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Returns `None` unless both parts are non-empty.
    #[must_use]
    pub fn new(username: &str, password: &str) -> Option<Self> {
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
