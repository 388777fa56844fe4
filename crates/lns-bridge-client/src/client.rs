//! Network server API facade.
//!
//! Every operation validates its parameters, builds a [`RequestDescriptor`]
//! and forwards it to the transport. Responses and transport errors are
//! returned unchanged.

use super::config::ClientConfig;
use super::encoding::{encode_path_segment, encode_payload, encode_query_value};
use super::error::{ClientError, ParamCode};
use super::model::{Callback, Downlink, RetryPolicy, DEFAULT_PORT};
use super::request::{ApiResponse, Method, RequestDescriptor};
use super::transport::{HttpTransport, Transport};

/// Query key for the downlink confirmed flag.
pub const CONFIRMED_PARAM: &str = "confirmed";

/// Client for the network server REST API.
pub struct LnsClient<T = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl LnsClient<HttpTransport> {
    /// Create a client backed by [`HttpTransport`].
    ///
    /// # Errors
    ///
    /// Returns error if the transport cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> LnsClient<T> {
    /// Create a client over a custom transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Register a pushmode callback.
    ///
    /// Uses `callback` if given, otherwise the configured default. The retry
    /// policy defaults to [`RetryPolicy::Retry`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidParameter`] if no callback resolves or it
    /// lacks `host` or `path_prefix`; otherwise any transport error.
    pub async fn register_callback(
        &self,
        callback: Option<&Callback>,
    ) -> Result<ApiResponse, ClientError> {
        let request = self.build_register_callback(callback)?;
        self.dispatch(request).await
    }

    /// Stop all pushmode callbacks.
    ///
    /// # Errors
    ///
    /// Returns any transport error.
    pub async fn unregister_callbacks(&self) -> Result<ApiResponse, ClientError> {
        self.dispatch(self.build_unregister_callbacks()).await
    }

    /// Fetch the latest uplink payload of a device.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidParameter`] if `deveui` is empty;
    /// otherwise any transport error.
    pub async fn get_latest_payload(&self, deveui: &str) -> Result<ApiResponse, ClientError> {
        let request = self.build_get_latest_payload(deveui)?;
        self.dispatch(request).await
    }

    /// List the uplink payloads of a device.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidParameter`] if `deveui` is empty;
    /// otherwise any transport error.
    pub async fn list_payloads(&self, deveui: &str) -> Result<ApiResponse, ClientError> {
        let request = self.build_list_payloads(deveui)?;
        self.dispatch(request).await
    }

    /// List all nodes.
    ///
    /// # Errors
    ///
    /// Returns any transport error.
    pub async fn list_nodes(&self) -> Result<ApiResponse, ClientError> {
        self.dispatch(self.build_list_nodes()).await
    }

    /// Queue a downlink for a device.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidParameter`] if `deveui` or `payload` is
    /// empty; otherwise any transport error.
    pub async fn send_data(&self, downlink: &Downlink) -> Result<ApiResponse, ClientError> {
        let request = self.build_send_data(downlink)?;
        self.dispatch(request).await
    }

    /// Request sent by [`Self::register_callback`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidParameter`] on missing fields.
    pub fn build_register_callback(
        &self,
        callback: Option<&Callback>,
    ) -> Result<RequestDescriptor, ClientError> {
        let mut callback = callback
            .or(self.config.default_callback.as_ref())
            .cloned()
            .ok_or_else(|| {
                ClientError::invalid(
                    ParamCode::MissingCallback,
                    "no callback given and no default callback configured",
                )
            })?;

        if callback.host.is_empty() {
            return Err(ClientError::invalid(
                ParamCode::MissingHost,
                "callback host is required",
            ));
        }
        if callback.path_prefix.is_empty() {
            return Err(ClientError::invalid(
                ParamCode::MissingPathPrefix,
                "callback path_prefix is required",
            ));
        }
        if callback.retry_policy.is_none() {
            callback.retry_policy = Some(RetryPolicy::Retry);
        }

        let body =
            serde_json::to_string(&callback).map_err(|e| ClientError::Parse(e.to_string()))?;

        Ok(RequestDescriptor::new(Method::Put, self.url("/rest/pushmode/start")).with_body(body))
    }

    /// Request sent by [`Self::unregister_callbacks`].
    #[must_use]
    pub fn build_unregister_callbacks(&self) -> RequestDescriptor {
        RequestDescriptor::new(Method::Put, self.url("/rest/pushmode/stop"))
    }

    /// Request sent by [`Self::get_latest_payload`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidParameter`] if `deveui` is empty.
    pub fn build_get_latest_payload(&self, deveui: &str) -> Result<RequestDescriptor, ClientError> {
        let node = self.node_url(deveui)?;
        Ok(RequestDescriptor::new(
            Method::Get,
            format!("{node}/payloads/ul/latest"),
        ))
    }

    /// Request sent by [`Self::list_payloads`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidParameter`] if `deveui` is empty.
    pub fn build_list_payloads(&self, deveui: &str) -> Result<RequestDescriptor, ClientError> {
        let node = self.node_url(deveui)?;
        Ok(RequestDescriptor::new(Method::Get, format!("{node}/payloads/ul")))
    }

    /// Request sent by [`Self::list_nodes`].
    #[must_use]
    pub fn build_list_nodes(&self) -> RequestDescriptor {
        RequestDescriptor::new(Method::Get, self.url("/rest/nodes"))
    }

    /// Request sent by [`Self::send_data`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidParameter`] if `deveui` or `payload` is
    /// empty.
    pub fn build_send_data(&self, downlink: &Downlink) -> Result<RequestDescriptor, ClientError> {
        if downlink.payload.is_empty() {
            return Err(ClientError::invalid(
                ParamCode::MissingPayload,
                "downlink payload is required",
            ));
        }
        let node = self.node_url(&downlink.deveui)?;
        let query = downlink_query(downlink);

        Ok(
            RequestDescriptor::new(Method::Post, format!("{node}/payloads/dl{query}"))
                .with_params(encode_payload(&downlink.payload)),
        )
    }

    async fn dispatch(&self, request: RequestDescriptor) -> Result<ApiResponse, ClientError> {
        tracing::debug!(method = %request.method, url = %request.url, "LNS request");
        self.transport.call(request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base())
    }

    fn node_url(&self, deveui: &str) -> Result<String, ClientError> {
        if deveui.is_empty() {
            return Err(ClientError::invalid(
                ParamCode::MissingDeveui,
                "deveui is required",
            ));
        }
        Ok(format!(
            "{}/rest/nodes/{}",
            self.config.base(),
            encode_path_segment(deveui)
        ))
    }
}

/// Query string for a downlink: `port`, `fcnt`, `confirmed` in that order,
/// skipping empty values.
fn downlink_query(downlink: &Downlink) -> String {
    let port = downlink.port.unwrap_or(DEFAULT_PORT).to_string();
    let fcnt = downlink
        .fcnt
        .as_deref()
        .map(encode_query_value)
        .unwrap_or_default();
    let confirmed = downlink
        .confirmed
        .map(|c| c.to_string())
        .unwrap_or_default();

    let mut query = String::new();
    for (key, value) in [("port", port), ("fcnt", fcnt), (CONFIRMED_PARAM, confirmed)] {
        if value.is_empty() {
            continue;
        }
        query.push(if query.is_empty() { '?' } else { '&' });
        query.push_str(key);
        query.push('=');
        query.push_str(&value);
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    const BASE: &str = "http://lns.test";

    /// Records every request and answers 200 with an empty JSON object.
    #[derive(Default)]
    struct Recorder {
        requests: Mutex<Vec<RequestDescriptor>>,
    }

    impl Recorder {
        fn taken(&self) -> Vec<RequestDescriptor> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for Recorder {
        async fn call(&self, request: RequestDescriptor) -> Result<ApiResponse, ClientError> {
            self.requests.lock().unwrap().push(request);
            Ok(ApiResponse {
                status: 200,
                body: "{}".to_string(),
            })
        }
    }

    /// Fails every call like an unreachable server.
    struct Unavailable;

    impl Transport for Unavailable {
        async fn call(&self, _request: RequestDescriptor) -> Result<ApiResponse, ClientError> {
            Err(ClientError::Api {
                status: 503,
                message: "maintenance".to_string(),
            })
        }
    }

    fn client() -> LnsClient<Recorder> {
        LnsClient::with_transport(ClientConfig::new(BASE), Recorder::default())
    }

    fn only_request(client: &LnsClient<Recorder>) -> RequestDescriptor {
        let mut requests = client.transport().taken();
        assert_eq!(requests.len(), 1);
        requests.remove(0)
    }

    fn body_json(request: &RequestDescriptor) -> Value {
        serde_json::from_str(request.body.as_deref().unwrap()).unwrap()
    }

    fn invalid_code(err: &ClientError) -> ParamCode {
        match err {
            ClientError::InvalidParameter { code, .. } => *code,
            other => panic!("expected invalid parameter, got {other}"),
        }
    }

    #[test]
    fn register_without_any_callback_fails() {
        let client = client();
        let err = tokio_test::block_on(client.register_callback(None)).unwrap_err();
        assert_eq!(invalid_code(&err), ParamCode::MissingCallback);
        assert!(client.transport().taken().is_empty());
    }

    #[test]
    fn register_without_path_prefix_fails() {
        let client = client();
        let callback = Callback {
            host: "h".to_string(),
            ..Default::default()
        };
        let err = tokio_test::block_on(client.register_callback(Some(&callback))).unwrap_err();
        assert_eq!(invalid_code(&err), ParamCode::MissingPathPrefix);
        assert!(client.transport().taken().is_empty());
    }

    #[test]
    fn register_without_host_fails() {
        let client = client();
        let callback = Callback {
            path_prefix: "p".to_string(),
            ..Default::default()
        };
        let err = tokio_test::block_on(client.register_callback(Some(&callback))).unwrap_err();
        assert_eq!(invalid_code(&err), ParamCode::MissingHost);
    }

    #[test]
    fn register_defaults_retry_policy() {
        let client = client();
        let callback = Callback::new("h", "p");
        tokio_test::block_on(client.register_callback(Some(&callback))).unwrap();

        let request = only_request(&client);
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.url, "http://lns.test/rest/pushmode/start");
        assert_eq!(
            body_json(&request),
            json!({"host": "h", "path_prefix": "p", "retry_policy": 1})
        );
        assert!(request.params.is_none());
    }

    #[test]
    fn register_keeps_explicit_no_retry() {
        let client = client();
        let callback = Callback::new("h", "p").with_retry_policy(RetryPolicy::NoRetry);
        tokio_test::block_on(client.register_callback(Some(&callback))).unwrap();

        assert_eq!(body_json(&only_request(&client))["retry_policy"], json!(0));
    }

    #[test]
    fn register_uses_configured_default() {
        let config = ClientConfig::new(BASE)
            .with_default_callback(Callback::new("hooks.example.com", "/uplinks").with_port(9000));
        let client = LnsClient::with_transport(config, Recorder::default());
        tokio_test::block_on(client.register_callback(None)).unwrap();

        assert_eq!(
            body_json(&only_request(&client)),
            json!({
                "host": "hooks.example.com",
                "port": 9000,
                "path_prefix": "/uplinks",
                "retry_policy": 1
            })
        );
    }

    #[test]
    fn explicit_callback_overrides_default() {
        let config = ClientConfig::new(BASE).with_default_callback(Callback::new("default", "d"));
        let client = LnsClient::with_transport(config, Recorder::default());
        let callback = Callback::new("explicit", "e");
        tokio_test::block_on(client.register_callback(Some(&callback))).unwrap();

        assert_eq!(body_json(&only_request(&client))["host"], json!("explicit"));
    }

    #[test]
    fn invalid_default_callback_fails() {
        let config = ClientConfig::new(BASE).with_default_callback(Callback::new("h", ""));
        let client = LnsClient::with_transport(config, Recorder::default());
        let err = tokio_test::block_on(client.register_callback(None)).unwrap_err();
        assert_eq!(invalid_code(&err), ParamCode::MissingPathPrefix);
    }

    #[test]
    fn unregister_has_no_body() {
        let client = client();
        tokio_test::block_on(client.unregister_callbacks()).unwrap();

        let request = only_request(&client);
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.url, "http://lns.test/rest/pushmode/stop");
        assert!(request.body.is_none());
        assert!(request.params.is_none());
    }

    #[test]
    fn latest_payload_requires_deveui() {
        let client = client();
        let err = tokio_test::block_on(client.get_latest_payload("")).unwrap_err();
        assert_eq!(invalid_code(&err), ParamCode::MissingDeveui);
        assert!(client.transport().taken().is_empty());
    }

    #[test]
    fn latest_payload_url() {
        let client = client();
        tokio_test::block_on(client.get_latest_payload("dev1")).unwrap();

        let request = only_request(&client);
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.url, "http://lns.test/rest/nodes/dev1/payloads/ul/latest");
    }

    #[test]
    fn list_payloads_requires_deveui() {
        let err = tokio_test::block_on(client().list_payloads("")).unwrap_err();
        assert_eq!(invalid_code(&err), ParamCode::MissingDeveui);
    }

    #[test]
    fn list_payloads_url() {
        let client = client();
        tokio_test::block_on(client.list_payloads("70B3D57ED0001234")).unwrap();

        assert_eq!(
            only_request(&client).url,
            "http://lns.test/rest/nodes/70B3D57ED0001234/payloads/ul"
        );
    }

    #[test]
    fn list_nodes_url() {
        let client = client();
        tokio_test::block_on(client.list_nodes()).unwrap();

        let request = only_request(&client);
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.url, "http://lns.test/rest/nodes");
    }

    #[test]
    fn send_data_defaults_port() {
        let client = client();
        tokio_test::block_on(client.send_data(&Downlink::new("dev1", "abc"))).unwrap();

        let request = only_request(&client);
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "http://lns.test/rest/nodes/dev1/payloads/dl?port=1");
        assert_eq!(request.params.as_deref(), Some("YWJj"));
        assert!(request.body.is_none());
    }

    #[test]
    fn send_data_full_query() {
        let client = client();
        let downlink = Downlink::new("dev1", "abc")
            .with_fcnt("f1")
            .with_confirmed(false);
        tokio_test::block_on(client.send_data(&downlink)).unwrap();

        assert_eq!(
            only_request(&client).url,
            "http://lns.test/rest/nodes/dev1/payloads/dl?port=1&fcnt=f1&confirmed=false"
        );
    }

    #[test]
    fn send_data_confirmed_without_fcnt() {
        let client = client();
        let downlink = Downlink::new("dev1", vec![0x01_u8, 0x02])
            .with_port(42)
            .with_confirmed(true);
        tokio_test::block_on(client.send_data(&downlink)).unwrap();

        let request = only_request(&client);
        assert_eq!(
            request.url,
            "http://lns.test/rest/nodes/dev1/payloads/dl?port=42&confirmed=true"
        );
        assert_eq!(request.params.as_deref(), Some("AQI="));
    }

    #[test]
    fn send_data_skips_empty_fcnt() {
        let downlink = Downlink::new("dev1", "abc").with_fcnt("");
        assert_eq!(downlink_query(&downlink), "?port=1");
    }

    #[test]
    fn send_data_requires_payload() {
        let client = client();
        let err = tokio_test::block_on(client.send_data(&Downlink::new("dev1", ""))).unwrap_err();
        assert_eq!(invalid_code(&err), ParamCode::MissingPayload);
        assert!(client.transport().taken().is_empty());
    }

    #[test]
    fn send_data_requires_deveui() {
        let err = tokio_test::block_on(client().send_data(&Downlink::new("", "abc"))).unwrap_err();
        assert_eq!(invalid_code(&err), ParamCode::MissingDeveui);
    }

    #[test]
    fn deveui_is_path_encoded() {
        let request = client().build_list_payloads("dev/1").unwrap();
        assert_eq!(request.url, "http://lns.test/rest/nodes/dev%2F1/payloads/ul");
    }

    #[test]
    fn trailing_slash_in_base_url() {
        let client = LnsClient::with_transport(
            ClientConfig::new("http://lns.test/"),
            Recorder::default(),
        );
        assert_eq!(client.build_list_nodes().url, "http://lns.test/rest/nodes");
    }

    #[test]
    fn transport_errors_pass_through() {
        let client = LnsClient::with_transport(ClientConfig::new(BASE), Unavailable);
        let err = tokio_test::block_on(client.list_nodes()).unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 503, .. }));
    }

    #[test]
    fn response_is_returned_unchanged() {
        let client = client();
        let response = tokio_test::block_on(client.list_nodes()).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "{}");
    }
}
