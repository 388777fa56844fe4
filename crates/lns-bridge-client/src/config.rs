//! Client configuration.

use super::model::Callback;
use std::path::PathBuf;
use std::time::Duration;

/// LNS client configuration.
///
/// Fixed at construction; the client never mutates it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the network server (e.g., <http://localhost:8080>)
    pub base_url: String,
    /// Basic auth username; auth is skipped when empty
    pub username: String,
    /// Basic auth password
    pub password: String,
    /// Request timeout
    pub timeout: Duration,
    /// Custom CA certificate path for self-signed server certs (PEM format)
    pub ca_cert_path: Option<PathBuf>,
    /// Callback used when `register_callback` is called without one
    pub default_callback: Option<Callback>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            username: String::new(),
            password: String::new(),
            timeout: Duration::from_secs(30),
            ca_cert_path: None,
            default_callback: None,
        }
    }
}

impl ClientConfig {
    /// Configuration for `base_url` with defaults for everything else.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set Basic auth credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Set the callback registered when none is passed explicitly.
    #[must_use]
    pub fn with_default_callback(mut self, callback: Callback) -> Self {
        self.default_callback = Some(callback);
        self
    }

    /// Base URL without a trailing slash.
    pub(crate) fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
