//! xAI API client.
//!
//! Every endpoint method validates its parameters, then delegates to
//! [`HttpClient::execute`] and hands back the decoded JSON untouched.
//! The request shapes of `function_call`, `code_edit` and `apply_edit` are not
//! publicly documented and should be treated as provisional.

use std::fmt;
use std::time::Duration;

use futures::stream::BoxStream;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::core::{
    ChatCompletionRequest, CodeEditRequest, CompletionRequest, EmbeddingRequest, HttpClient,
    HttpClientConfig, ImageEditRequest, ImageRequest, XaiError, sse, types::validate_path_segment,
};
use crate::provider::constants::xai;

/// Configuration for [`XaiClient`]
#[derive(Clone)]
pub struct XaiConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: Option<String>,
    /// Headers added to every request
    pub extra_headers: Vec<(String, String)>,
}

impl XaiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: xai::API_BASE.to_string(),
            timeout: Duration::from_millis(xai::DEFAULT_TIMEOUT_MS),
            user_agent: None,
            extra_headers: Vec::new(),
        }
    }

    /// Load the configuration from `XAI_API_KEY`, `XAI_BASE_URL` and `XAI_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, XaiError> {
        let api_key = std::env::var(xai::API_KEY_ENV_VAR).map_err(|_| {
            XaiError::Configuration(format!("{} not set.", xai::API_KEY_ENV_VAR))
        })?;
        let mut config = Self::new(api_key);

        if let Ok(base_url) = std::env::var(xai::BASE_URL_ENV_VAR) {
            config = config.with_base_url(base_url);
        }

        if let Ok(timeout) = std::env::var(xai::TIMEOUT_ENV_VAR) {
            let millis = timeout.trim().parse::<u64>().map_err(|e| {
                XaiError::Configuration(format!(
                    "{} must be a number of milliseconds: {e}",
                    xai::TIMEOUT_ENV_VAR
                ))
            })?;
            config = config.with_timeout(Duration::from_millis(millis));
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    fn auth_header(&self) -> (String, String) {
        (
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key),
        )
    }
}

impl fmt::Debug for XaiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XaiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field(
                "extra_headers",
                &self
                    .extra_headers
                    .iter()
                    .map(|(name, _)| (name.as_str(), "<redacted>"))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Client for the xAI HTTP API. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct XaiClient {
    http: HttpClient,
}

impl XaiClient {
    /// Fails with [`XaiError::Configuration`] when the API key is empty.
    pub fn new(config: XaiConfig) -> Result<Self, XaiError> {
        if config.api_key.trim().is_empty() {
            return Err(XaiError::Configuration(
                "An API key is required to create the client.".to_string(),
            ));
        }

        let mut headers = vec![config.auth_header()];
        headers.extend(config.extra_headers.iter().cloned());

        let http = HttpClient::new(
            &config.base_url,
            &headers,
            HttpClientConfig {
                timeout: config.timeout,
            },
            config.user_agent.as_deref(),
        )?;

        Ok(Self { http })
    }

    pub fn from_env() -> Result<Self, XaiError> {
        Self::new(XaiConfig::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    pub fn timeout(&self) -> Duration {
        self.http.timeout()
    }

    /// Issue a raw request against the API. The typed methods are built on this.
    pub async fn execute(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
        extra_headers: &[(String, String)],
    ) -> Result<Value, XaiError> {
        self.http.execute(path, method, body, extra_headers).await
    }

    pub async fn create_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<Value, XaiError> {
        request.validate()?;
        self.post(xai::CHAT_COMPLETIONS_ENDPOINT, request).await
    }

    /// Stream a chat completion as decoded server-sent event chunks.
    ///
    /// `stream` is forced on. The timeout applies until the response headers arrive;
    /// the stream ends at `data: [DONE]` or when the server closes the connection.
    pub async fn stream_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<BoxStream<'static, Result<Value, XaiError>>, XaiError> {
        request.validate()?;
        let body = to_body(&request.clone().stream(true))?;

        let response = self
            .http
            .open(
                xai::CHAT_COMPLETIONS_ENDPOINT,
                Method::POST,
                Some(&body),
                &[("Accept".to_string(), "text/event-stream".to_string())],
            )
            .await?;

        Ok(sse::event_stream(response))
    }

    pub async fn create_completion(&self, request: &CompletionRequest) -> Result<Value, XaiError> {
        request.validate()?;
        self.post(xai::COMPLETIONS_ENDPOINT, request).await
    }

    pub async fn create_embedding(&self, request: &EmbeddingRequest) -> Result<Value, XaiError> {
        request.validate()?;
        self.post(xai::EMBEDDINGS_ENDPOINT, request).await
    }

    pub async fn create_image(&self, request: &ImageRequest) -> Result<Value, XaiError> {
        request.validate()?;
        self.post(xai::IMAGE_GENERATIONS_ENDPOINT, request).await
    }

    pub async fn edit_image(&self, request: &ImageEditRequest) -> Result<Value, XaiError> {
        request.validate()?;
        self.post(xai::IMAGE_EDITS_ENDPOINT, request).await
    }

    pub async fn list_models(&self) -> Result<Value, XaiError> {
        self.get(xai::MODELS_ENDPOINT).await
    }

    pub async fn get_model(&self, model_id: &str) -> Result<Value, XaiError> {
        validate_path_segment("model_id", model_id)?;
        self.get(&format!("{}/{model_id}", xai::MODELS_ENDPOINT))
            .await
    }

    pub async fn get_api_key_info(&self) -> Result<Value, XaiError> {
        self.get(xai::API_KEY_ENDPOINT).await
    }

    /// Call a server-side function. `args` default to an empty object.
    pub async fn function_call(
        &self,
        function_name: &str,
        args: Option<Value>,
    ) -> Result<Value, XaiError> {
        validate_path_segment("function_name", function_name)?;
        let body = args.unwrap_or_else(|| Value::Object(serde_json::Map::new()));
        self.execute(
            &format!("{}/{function_name}", xai::FUNCTIONS_ENDPOINT),
            Method::POST,
            Some(&body),
            &[],
        )
        .await
    }

    pub async fn code_edit(&self, request: &CodeEditRequest) -> Result<Value, XaiError> {
        request.validate()?;
        self.post(xai::CODE_EDIT_ENDPOINT, request).await
    }

    pub async fn apply_edit(&self, edit_id: &str) -> Result<Value, XaiError> {
        validate_path_segment("edit_id", edit_id)?;
        self.execute(
            &format!("{}/{edit_id}", xai::CODE_APPLY_ENDPOINT),
            Method::POST,
            None,
            &[],
        )
        .await
    }

    /// Liveness check against `/health`.
    ///
    /// Only the status counts; the body is ignored. Unlike every other method this never
    /// fails: any error, including timeouts and error statuses, is reported as `false`.
    pub async fn check_connection(&self) -> bool {
        match self.http.ping(xai::HEALTH_ENDPOINT).await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "health check failed");
                false
            }
        }
    }

    async fn get(&self, path: &str) -> Result<Value, XaiError> {
        self.execute(path, Method::GET, None, &[]).await
    }

    async fn post<B: Serialize>(&self, path: &str, request: &B) -> Result<Value, XaiError> {
        let body = to_body(request)?;
        self.execute(path, Method::POST, Some(&body), &[]).await
    }
}

fn to_body<B: Serialize>(request: &B) -> Result<Value, XaiError> {
    serde_json::to_value(request).map_err(|e| XaiError::Parse {
        message: "Failed to serialize request body".to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_rejected() {
        let err = XaiClient::new(XaiConfig::new("")).unwrap_err();
        assert!(matches!(err, XaiError::Configuration(_)));

        let err = XaiClient::new(XaiConfig::new("   ")).unwrap_err();
        assert!(matches!(err, XaiError::Configuration(_)));
    }

    #[test]
    fn defaults_endpoint_and_timeout() {
        let client = XaiClient::new(XaiConfig::new("test-key")).unwrap();
        assert_eq!(client.base_url(), "https://api.x.ai/v1");
        assert_eq!(client.timeout(), Duration::from_millis(30_000));
    }

    #[test]
    fn overrides_endpoint_and_timeout() {
        let config = XaiConfig::new("test-key")
            .with_base_url("http://localhost:8080/v1/")
            .with_timeout(Duration::from_millis(500));
        let client = XaiClient::new(config).unwrap();

        assert_eq!(client.base_url(), "http://localhost:8080/v1");
        assert_eq!(client.timeout(), Duration::from_millis(500));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = XaiConfig::new("super-secret");
        let debug = format!("{config:?}");

        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn debug_output_redacts_header_values() {
        let config = XaiConfig::new("test-key")
            .with_header("Authorization", "Bearer other-secret")
            .with_header("X-Team", "internal-team-id");
        let debug = format!("{config:?}");

        assert!(!debug.contains("other-secret"));
        assert!(!debug.contains("internal-team-id"));
        assert!(debug.contains("Authorization"));
        assert!(debug.contains("X-Team"));
    }
}
