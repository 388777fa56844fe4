//! Client error types.

use std::fmt;

/// Which required parameter was missing from a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamCode {
    /// No callback was passed and none is configured
    MissingCallback,
    /// Callback has no host
    MissingHost,
    /// Callback has no path prefix
    MissingPathPrefix,
    /// Device EUI is empty
    MissingDeveui,
    /// Downlink payload is empty
    MissingPayload,
}

impl ParamCode {
    /// Stable string form of the code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingCallback => "missing_callback",
            Self::MissingHost => "missing_host",
            Self::MissingPathPrefix => "missing_path_prefix",
            Self::MissingDeveui => "missing_deveui",
            Self::MissingPayload => "missing_payload",
        }
    }
}

impl fmt::Display for ParamCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur with the LNS client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    /// A required parameter was missing; raised before any request is sent
    #[error("invalid parameter ({code}): {detail}")]
    InvalidParameter {
        /// Which parameter was rejected
        code: ParamCode,
        /// Human-readable detail
        detail: String,
    },
    /// Client initialization failed
    #[error("client init error: {0}")]
    Init(String),
    /// HTTP request failed
    #[error("request error: {0}")]
    Request(String),
    /// API returned an error status
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body returned by the server
        message: String,
    },
    /// Response parsing failed
    #[error("parse error: {0}")]
    Parse(String),
}

impl ClientError {
    pub(crate) fn invalid(code: ParamCode, detail: impl Into<String>) -> Self {
        Self::InvalidParameter {
            code,
            detail: detail.into(),
        }
    }

    /// Whether this error was raised by local parameter validation.
    #[must_use]
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }
}
