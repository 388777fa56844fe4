//! HTTP transport.
//!
//! The facade only builds [`RequestDescriptor`]s; a [`Transport`] turns them
//! into calls. [`HttpTransport`] is the reqwest implementation.

use super::config::ClientConfig;
use super::error::ClientError;
use super::request::{ApiResponse, RequestDescriptor};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::fs;
use std::future::Future;
use url::Url;

/// Executes one request and returns the server's response.
///
/// Implementations must map non-success statuses to [`ClientError::Api`] and
/// send failures to [`ClientError::Request`].
pub trait Transport {
    /// Issue `request`.
    fn call(
        &self,
        request: RequestDescriptor,
    ) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send;
}

/// Authenticated reqwest transport.
pub struct HttpTransport {
    client: Client,
    username: String,
    password: String,
}

impl HttpTransport {
    /// Create a transport from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid, the HTTP client cannot be
    /// created, or the CA certificate cannot be read or parsed.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ClientError::Init(format!("invalid base URL {}: {e}", config.base_url)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::Init(format!(
                "unsupported URL scheme: {}",
                base.scheme()
            )));
        }

        let mut builder = Client::builder().timeout(config.timeout);

        if base.scheme() == "https" {
            builder = builder.use_rustls_tls();

            if let Some(ca_path) = &config.ca_cert_path {
                let ca_cert = fs::read(ca_path).map_err(|e| {
                    ClientError::Init(format!(
                        "failed to read CA certificate {}: {e}",
                        ca_path.display()
                    ))
                })?;
                let cert = reqwest::Certificate::from_pem(&ca_cert).map_err(|e| {
                    ClientError::Init(format!("failed to parse CA certificate: {e}"))
                })?;
                builder = builder.add_root_certificate(cert);
                tracing::debug!(ca_path = %ca_path.display(), "Loaded custom CA certificate");
            }
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::Init(e.to_string()))?;

        Ok(Self {
            client,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }
}

impl Transport for HttpTransport {
    async fn call(&self, request: RequestDescriptor) -> Result<ApiResponse, ClientError> {
        let mut builder = self.client.request(request.method.into(), &request.url);

        if !self.username.is_empty() {
            builder = builder.basic_auth(&self.username, Some(&self.password));
        }

        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        } else if let Some(params) = request.params {
            builder = builder.header(CONTENT_TYPE, "text/plain").body(params);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), url = %request.url, "Request rejected");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }
}
