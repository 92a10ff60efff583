//! TableData SOAP HTTP client.
//!
//! Posts one envelope per call and hands back the textual result payload.
//! There are no retries: every failure goes straight back to the caller.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use super::envelope::{SoapParams, SoapVersion, build_envelope, extract_result};
use super::error::SoapError;

/// Default endpoint of the dispatch service.
const DEFAULT_BASE_URL: &str = "http://www.dispecing.info:808/TableData/Service.asmx";

/// Default XML namespace of the service's operations.
const DEFAULT_NAMESPACE: &str = "http://www.emtest.sk/cp/";

/// How much of a response body to show in debug logs.
const LOG_PEEK_CHARS: usize = 160;

/// Something that can invoke a SOAP operation and return its result text.
///
/// This abstraction lets the fetcher run against canned responses in tests
/// and in mock mode.
pub trait SoapTransport: Send + Sync {
    /// Invoke `operation` with `params` and return the
    /// `<operation>Result>` text.
    fn call(
        &self,
        operation: &str,
        params: &SoapParams,
    ) -> impl Future<Output = Result<String, SoapError>> + Send;
}

/// Configuration for the SOAP client.
#[derive(Debug, Clone)]
pub struct SoapConfig {
    /// Service endpoint URL
    pub base_url: String,
    /// Namespace of the operation elements, also the SOAP action prefix
    pub namespace: String,
    /// Protocol version (decides envelope namespace and headers)
    pub version: SoapVersion,
    /// Request timeout in seconds; `None` keeps the HTTP client's default
    pub timeout_secs: Option<u64>,
}

impl Default for SoapConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            version: SoapVersion::default(),
            timeout_secs: None,
        }
    }
}

impl SoapConfig {
    /// Set a custom endpoint URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the operation namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the SOAP protocol version.
    pub fn with_version(mut self, version: SoapVersion) -> Self {
        self.version = version;
        self
    }

    /// Set a request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

/// HTTP client for the TableData service.
#[derive(Debug, Clone)]
pub struct SoapClient {
    http: reqwest::Client,
    base_url: String,
    namespace: String,
    version: SoapVersion,
}

impl SoapClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SoapConfig) -> Result<Self, SoapError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url,
            namespace: config.namespace,
            version: config.version,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl SoapTransport for SoapClient {
    async fn call(&self, operation: &str, params: &SoapParams) -> Result<String, SoapError> {
        let envelope = build_envelope(self.version, &self.namespace, operation, params);
        let action = format!("{}{}", self.namespace, operation);

        let mut request = self.http.post(&self.base_url).body(envelope);
        for (name, value) in self.version.headers(&action) {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(
            operation,
            status = status.as_u16(),
            len = body.len(),
            peek = %body.chars().take(LOG_PEEK_CHARS).collect::<String>(),
            "SOAP response"
        );

        if !status.is_success() {
            return Err(SoapError::UpstreamHttp {
                operation: operation.to_string(),
                status: status.as_u16(),
            });
        }

        extract_result(operation, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode, header};
    use axum::routing::post;

    #[test]
    fn config_builder() {
        let config = SoapConfig::default()
            .with_base_url("http://localhost:8080/Service.asmx")
            .with_namespace("http://tempuri.org/")
            .with_version(SoapVersion::V12)
            .with_timeout(10);

        assert_eq!(config.base_url, "http://localhost:8080/Service.asmx");
        assert_eq!(config.namespace, "http://tempuri.org/");
        assert_eq!(config.version, SoapVersion::V12);
        assert_eq!(config.timeout_secs, Some(10));
    }

    #[test]
    fn config_defaults() {
        let config = SoapConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
        assert_eq!(config.version, SoapVersion::V11);
        assert_eq!(config.timeout_secs, None);
    }

    #[test]
    fn client_creation() {
        let client = SoapClient::new(SoapConfig::default().with_timeout(5));
        assert!(client.is_ok());
        assert_eq!(client.unwrap().base_url(), DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_http_error() {
        // Port 9 on localhost is closed in test environments.
        let client = SoapClient::new(
            SoapConfig::default()
                .with_base_url("http://127.0.0.1:9/Service.asmx")
                .with_timeout(2),
        )
        .unwrap();

        let err = client
            .call("GetOnlineStopTime", &SoapParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SoapError::Http(_)));
    }

    /// What the endpoint saw: content types, `SOAPAction` and body.
    #[derive(Debug, Clone)]
    struct Received {
        content_types: Vec<String>,
        soap_action: Option<String>,
        body: String,
    }

    type Log = Arc<Mutex<Vec<Received>>>;

    fn record(log: &Log, headers: &HeaderMap, body: String) {
        log.lock().unwrap().push(Received {
            content_types: headers
                .get_all(header::CONTENT_TYPE)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .map(str::to_string)
                .collect(),
            soap_action: headers
                .get("soapaction")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body,
        });
    }

    async fn failing(State(log): State<Log>, headers: HeaderMap, body: String) -> StatusCode {
        record(&log, &headers, body);
        StatusCode::INTERNAL_SERVER_ERROR
    }

    async fn answering(State(log): State<Log>, headers: HeaderMap, body: String) -> String {
        record(&log, &headers, body);
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">"#,
            r#"<soap:Body><GetAVLStopTimeResponse xmlns="http://www.emtest.sk/cp/">"#,
            r#"<GetAVLStopTimeResult>&lt;DS/&gt;</GetAVLStopTimeResult>"#,
            r#"</GetAVLStopTimeResponse></soap:Body></soap:Envelope>"#,
        )
        .to_string()
    }

    /// Serve a fake TableData endpoint on an ephemeral port.
    async fn spawn_endpoint() -> (String, Log) {
        let log = Log::default();
        let app = axum::Router::new()
            .route("/failing", post(failing))
            .route("/answering", post(answering))
            .with_state(log.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), log)
    }

    #[tokio::test]
    async fn error_status_is_upstream_http_and_v11_headers_are_sent() {
        let (base, log) = spawn_endpoint().await;
        let client =
            SoapClient::new(SoapConfig::default().with_base_url(format!("{base}/failing")))
                .unwrap();

        let err = client
            .call("GetOnlineStopTime", &SoapParams::new().with("count", 8))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SoapError::UpstreamHttp { ref operation, status: 500 } if operation == "GetOnlineStopTime"
        ));

        let received = log.lock().unwrap()[0].clone();
        assert_eq!(received.content_types, vec!["text/xml; charset=utf-8"]);
        assert_eq!(
            received.soap_action.as_deref(),
            Some("\"http://www.emtest.sk/cp/GetOnlineStopTime\"")
        );
        assert!(received.body.contains("http://schemas.xmlsoap.org/soap/envelope/"));
        assert!(received.body.contains("<count>8</count>"));
    }

    #[tokio::test]
    async fn v12_announces_action_in_content_type_and_result_is_extracted() {
        let (base, log) = spawn_endpoint().await;
        let client = SoapClient::new(
            SoapConfig::default()
                .with_base_url(format!("{base}/answering"))
                .with_version(SoapVersion::V12),
        )
        .unwrap();

        let text = client
            .call("GetAVLStopTime", &SoapParams::new())
            .await
            .unwrap();
        assert_eq!(text, "<DS/>");

        let received = log.lock().unwrap()[0].clone();
        assert_eq!(
            received.content_types,
            vec![r#"application/soap+xml; charset=utf-8; action="http://www.emtest.sk/cp/GetAVLStopTime""#]
        );
        assert_eq!(received.soap_action, None);
        assert!(received.body.contains("http://www.w3.org/2003/05/soap-envelope"));
    }
}
