//! CLI configuration.

use anyhow::{Context, Result};
use lns_bridge_client::{Callback, ClientConfig};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable names.
pub mod vars {
    /// Network server base URL
    pub const BASE_URL: &str = "LNS_BASE_URL";
    /// Basic auth username
    pub const USERNAME: &str = "LNS_USERNAME";
    /// Basic auth password
    pub const PASSWORD: &str = "LNS_PASSWORD";
    /// Request timeout in seconds
    pub const TIMEOUT_SECS: &str = "LNS_TIMEOUT_SECS";
    /// PEM CA certificate path
    pub const CA_CERT: &str = "LNS_CA_CERT";
    /// Default callback as a JSON object
    pub const CALLBACK: &str = "LNS_CALLBACK";
}

/// Load the client configuration from environment variables.
///
/// # Environment Variables
///
/// - `LNS_BASE_URL`: Network server URL (default `http://localhost:8080`)
/// - `LNS_USERNAME` / `LNS_PASSWORD`: Basic auth credentials
/// - `LNS_TIMEOUT_SECS`: Request timeout in seconds
/// - `LNS_CA_CERT`: PEM CA certificate for self-signed servers
/// - `LNS_CALLBACK`: Default pushmode callback, e.g.
///   `{"host":"hooks.example.com","port":443,"path_prefix":"/lns"}`
///
/// # Errors
///
/// Returns error if a variable is present but malformed.
pub fn from_env() -> Result<ClientConfig> {
    from_lookup(|key| std::env::var(key).ok())
}

/// Build the configuration from any key lookup.
pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<ClientConfig> {
    let mut config = ClientConfig::default();

    if let Some(url) = lookup(vars::BASE_URL) {
        config.base_url = url;
    }

    if let Some(username) = lookup(vars::USERNAME) {
        config.username = username;
    }

    if let Some(password) = lookup(vars::PASSWORD) {
        config.password = password;
    }

    if let Some(secs) = lookup(vars::TIMEOUT_SECS) {
        let secs: u64 = secs
            .parse()
            .with_context(|| format!("Invalid {}: {secs}", vars::TIMEOUT_SECS))?;
        config.timeout = Duration::from_secs(secs);
    }

    if let Some(path) = lookup(vars::CA_CERT) {
        config.ca_cert_path = Some(PathBuf::from(path));
    }

    if let Some(json) = lookup(vars::CALLBACK) {
        let callback: Callback = serde_json::from_str(&json)
            .with_context(|| format!("Invalid {} JSON", vars::CALLBACK))?;
        config.default_callback = Some(callback);
    }

    Ok(config)
}
