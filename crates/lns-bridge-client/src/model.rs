//! Parameter types for callback registration and downlinks.

use serde::{Deserialize, Serialize};

/// Default downlink port.
pub const DEFAULT_PORT: u16 = 1;

/// Whether the server retries pushing an event when the callback fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum RetryPolicy {
    /// Drop the event on failure (`0`)
    NoRetry,
    /// Retry delivery (`1`)
    #[default]
    Retry,
}

impl From<RetryPolicy> for u8 {
    fn from(policy: RetryPolicy) -> Self {
        match policy {
            RetryPolicy::NoRetry => 0,
            RetryPolicy::Retry => 1,
        }
    }
}

impl TryFrom<u8> for RetryPolicy {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NoRetry),
            1 => Ok(Self::Retry),
            other => Err(format!("retry_policy must be 0 or 1, got {other}")),
        }
    }
}

/// Pushmode callback registration.
///
/// `host` and `path_prefix` are required by the server; an empty string is
/// treated as missing. The struct is sent verbatim as the JSON body of
/// `PUT /rest/pushmode/start`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callback {
    /// Host the server pushes events to
    #[serde(default)]
    pub host: String,
    /// Port on `host`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Path prefix prepended to pushed event paths
    #[serde(default)]
    pub path_prefix: String,
    /// Value of the Authorization header the server sends with each push
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
    /// Delivery retry flag; defaults to [`RetryPolicy::Retry`] on registration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_policy: Option<RetryPolicy>,
}

impl Callback {
    /// Create a callback for `host` and `path_prefix`.
    #[must_use]
    pub fn new(host: impl Into<String>, path_prefix: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path_prefix: path_prefix.into(),
            ..Default::default()
        }
    }

    /// Set the callback port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the auth string sent with each push.
    #[must_use]
    pub fn with_auth(mut self, auth: impl Into<String>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }
}

/// A downlink message for one device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Downlink {
    /// Target device EUI
    pub deveui: String,
    /// Raw payload bytes; base64-encoded on send
    pub payload: Vec<u8>,
    /// LoRaWAN port, [`DEFAULT_PORT`] when unset
    pub port: Option<u16>,
    /// Frame counter name
    pub fcnt: Option<String>,
    /// Confirmed flag; omitted from the request when `None`
    pub confirmed: Option<bool>,
}

impl Downlink {
    /// Create a downlink with default port and no optional flags.
    #[must_use]
    pub fn new(deveui: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            deveui: deveui.into(),
            payload: payload.into(),
            ..Default::default()
        }
    }

    /// Set the LoRaWAN port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the frame counter name.
    #[must_use]
    pub fn with_fcnt(mut self, fcnt: impl Into<String>) -> Self {
        self.fcnt = Some(fcnt.into());
        self
    }

    /// Set the confirmed flag.
    #[must_use]
    pub fn with_confirmed(mut self, confirmed: bool) -> Self {
        self.confirmed = Some(confirmed);
        self
    }
}
