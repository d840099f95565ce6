//! Shared HTTP client: one authenticated JSON request per call, bounded by a timeout.

use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::{
    Method,
    header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use serde_json::Value;
use tracing::{debug, warn};

use super::error::XaiError;

/// Configuration for the HTTP layer
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Upper bound for a single call, from sending the request to reading the body
    pub timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(crate::provider::constants::xai::DEFAULT_TIMEOUT_MS),
        }
    }
}

/// Shared HTTP client. No retries: every failure goes straight back to the caller.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    default_headers: HeaderMap,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client.
    ///
    /// `headers` are sent with every request, after `Content-Type: application/json`.
    /// Headers whose name is `authorization` are marked sensitive so they never show up
    /// in debug output.
    pub fn new(
        base_url: &str,
        headers: &[(String, String)],
        config: HttpClientConfig,
        user_agent: Option<&str>,
    ) -> Result<Self, XaiError> {
        let default_ua = format!("xai-client/{}", env!("CARGO_PKG_VERSION"));
        let ua = user_agent.unwrap_or(&default_ua);

        let client = reqwest::Client::builder()
            .user_agent(ua)
            .build()
            .map_err(|e| XaiError::Configuration(format!("Failed to build reqwest client: {e}")))?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in headers {
            let (name, mut value) = parse_header(name, value).map_err(XaiError::Configuration)?;
            if name == reqwest::header::AUTHORIZATION {
                value.set_sensitive(true);
            }
            default_headers.insert(name, value);
        }

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_headers,
            config,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Send one request and decode the JSON response.
    ///
    /// `extra_headers` override the defaults on a name clash. GET requests never carry a
    /// body. The timeout covers sending the request and reading the whole body; when it
    /// fires the request future is dropped, which aborts the connection.
    #[tracing::instrument(
        name = "xai_request",
        skip(self, body, extra_headers),
        fields(method = %method, path = %path),
        err
    )]
    pub async fn execute(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
        extra_headers: &[(String, String)],
    ) -> Result<Value, XaiError> {
        let request = self.build_request(path, method, body, extra_headers)?;
        let started = Instant::now();

        let result = self
            .with_timeout(async {
                let response = self.send_checked(request).await?;
                self.decode(response).await
            })
            .await;

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "request finished"
        );
        result
    }

    /// Send one request and return the raw response once its headers arrived.
    ///
    /// The timeout covers only the wait for the response headers; reading the body is
    /// left to the caller. Error statuses are mapped exactly like [`HttpClient::execute`].
    #[tracing::instrument(
        name = "xai_stream_request",
        skip(self, body, extra_headers),
        fields(method = %method, path = %path),
        err
    )]
    pub async fn open(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
        extra_headers: &[(String, String)],
    ) -> Result<reqwest::Response, XaiError> {
        let request = self.build_request(path, method, body, extra_headers)?;
        self.with_timeout(self.send_checked(request)).await
    }

    /// `GET path` and succeed on any 2xx status. The body is never read, so it may be
    /// empty or plain text.
    #[tracing::instrument(name = "xai_status_request", skip(self), err)]
    pub async fn ping(&self, path: &str) -> Result<(), XaiError> {
        let request = self.build_request(path, Method::GET, None, &[])?;
        self.with_timeout(async { self.send_checked(request).await.map(|_| ()) })
            .await
    }

    fn build_request(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
        extra_headers: &[(String, String)],
    ) -> Result<reqwest::RequestBuilder, XaiError> {
        let url = format!("{}{}", self.base_url, path);

        let mut headers = self.default_headers.clone();
        for (name, value) in extra_headers {
            let (name, value) =
                parse_header(name, value).map_err(|message| XaiError::malformed("headers", message))?;
            headers.insert(name, value);
        }

        let is_get = method == Method::GET;
        let mut req_builder = self.client.request(method, url).headers(headers);
        if let Some(body) = body.filter(|_| !is_get) {
            req_builder = req_builder.json(body);
        }

        Ok(req_builder)
    }

    async fn with_timeout<T>(
        &self,
        future: impl Future<Output = Result<T, XaiError>>,
    ) -> Result<T, XaiError> {
        let timeout = self.config.timeout;
        match tokio::time::timeout(timeout, future).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout_ms = timeout.as_millis() as u64, "request timed out");
                Err(XaiError::Timeout { timeout })
            }
        }
    }

    async fn send_checked(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, XaiError> {
        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error("Request failed", e))?;

        let status = response.status();
        if status.is_success() {
            debug!(status = %status, "HTTP request successful");
            return Ok(response);
        }

        warn!(status = %status, "API returned error status");
        let error_body = response
            .text()
            .await
            .ok()
            .and_then(|text| serde_json::from_str::<Value>(&text).ok())
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

        Err(XaiError::Api {
            status_code: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            message: extract_error_message(&error_body),
        })
    }

    async fn decode(&self, response: reqwest::Response) -> Result<Value, XaiError> {
        let response_text = response
            .text()
            .await
            .map_err(|e| self.transport_error("Failed to read response body", e))?;

        serde_json::from_str(&response_text).map_err(|e| XaiError::Parse {
            message: "Failed to parse response as JSON".to_string(),
            source: Box::new(e),
        })
    }

    fn transport_error(&self, context: &str, error: reqwest::Error) -> XaiError {
        if error.is_timeout() {
            return XaiError::Timeout {
                timeout: self.config.timeout,
            };
        }
        XaiError::Network {
            message: format!("{context}: {error}"),
            source: Box::new(error),
        }
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), String> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| format!("invalid header name `{name}`: {e}"))?;
    let header_value =
        HeaderValue::from_str(value).map_err(|e| format!("invalid value for header `{name}`: {e}"))?;
    Ok((header_name, header_value))
}

/// Pull a human readable message out of an error body.
///
/// Looks at `message`, then a string `error`, then `error.message`.
pub(crate) fn extract_error_message(body: &Value) -> Option<String> {
    if let Some(message) = body.get("message").and_then(Value::as_str) {
        return Some(message.to_string());
    }
    match body.get("error") {
        Some(Value::String(message)) => Some(message.clone()),
        Some(error) => error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        None => None,
    }
}
