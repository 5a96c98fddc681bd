//! HTTP client for Azure Resource Manager
//!
//! [`ArmClient`] knows nothing about hybrid connections. The provider clients
//! build resource URLs through it and decode the bodies themselves.

use super::credential::{token_source_from_config, AccessTokenSource};
use super::ArmResult;
use crate::config::AzureConfig;
use crate::domain::{ArmError, HybridConnError, Result};
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

/// Header carrying the per-request correlation id
pub const CLIENT_REQUEST_ID_HEADER: &str = "x-ms-client-request-id";

/// Authenticated Resource Manager client scoped to one subscription
///
/// # Example
///
/// ```no_run
/// use hybridconn::adapters::arm::ArmClient;
/// use hybridconn::config::AzureConfig;
///
/// # fn example() -> hybridconn::domain::Result<()> {
/// let config = AzureConfig::default();
/// let client = ArmClient::from_config(&config)?;
/// # Ok(())
/// # }
/// ```
pub struct ArmClient {
    endpoint: Url,
    subscription_id: String,
    http: Client,
    tokens: Arc<dyn AccessTokenSource>,
}

impl ArmClient {
    /// Creates a client using the token source selected by the configuration
    pub fn from_config(config: &AzureConfig) -> Result<Self> {
        let tokens = token_source_from_config(config)?;
        Self::new(config, tokens)
    }

    /// Creates a client with an explicit token source
    ///
    /// # Errors
    ///
    /// Returns [`HybridConnError::Configuration`] if the endpoint is not a
    /// valid base URL or the HTTP client cannot be built.
    pub fn new(config: &AzureConfig, tokens: Arc<dyn AccessTokenSource>) -> Result<Self> {
        let endpoint = Url::parse(&config.resource_manager_endpoint).map_err(|e| {
            HybridConnError::Configuration(format!(
                "Invalid resource manager endpoint {}: {e}",
                config.resource_manager_endpoint
            ))
        })?;

        if endpoint.cannot_be_a_base() {
            return Err(HybridConnError::Configuration(format!(
                "Resource manager endpoint cannot be used as a base URL: {endpoint}"
            )));
        }

        let http = ClientBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                HybridConnError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            endpoint,
            subscription_id: config.subscription_id.clone(),
            http,
            tokens,
        })
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// Builds the URL of a resource below a provider namespace
    ///
    /// Every segment is percent-encoded individually, so names can never
    /// alter the path structure.
    pub fn resource_url(
        &self,
        resource_group: &str,
        provider: &str,
        segments: &[&str],
        api_version: &str,
    ) -> ArmResult<Url> {
        let mut url = self.endpoint.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ArmError::InvalidResponse(format!(
                    "endpoint cannot be a base URL: {}",
                    self.endpoint
                ))
            })?;
            path.pop_if_empty()
                .extend([
                    "subscriptions",
                    self.subscription_id.as_str(),
                    "resourceGroups",
                    resource_group,
                    "providers",
                    provider,
                ])
                .extend(segments);
        }
        url.query_pairs_mut().append_pair("api-version", api_version);
        Ok(url)
    }

    /// GET a resource and decode its body
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ArmResult<T> {
        let request = self.request(Method::GET, url).await?;
        let body = self.execute(request).await?;
        decode(&body)
    }

    /// PUT a resource body and decode the response
    pub async fn put_json<B, T>(&self, url: Url, body: &B) -> ArmResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PUT, url).await?.json(body);
        let body = self.execute(request).await?;
        decode(&body)
    }

    /// POST an action without a request body and decode the response
    pub async fn post_json<T: DeserializeOwned>(&self, url: Url) -> ArmResult<T> {
        let request = self
            .request(Method::POST, url)
            .await?
            .header(reqwest::header::CONTENT_LENGTH, 0);
        let body = self.execute(request).await?;
        decode(&body)
    }

    /// DELETE a resource, ignoring any response body
    pub async fn delete(&self, url: Url) -> ArmResult<()> {
        let request = self.request(Method::DELETE, url).await?;
        self.execute(request).await.map(|_| ())
    }

    async fn request(&self, method: Method, url: Url) -> ArmResult<RequestBuilder> {
        let token = self.tokens.token().await?;
        Ok(self
            .http
            .request(method, url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json"))
    }

    /// Sends the request and returns the body of a successful response
    async fn execute(&self, request: RequestBuilder) -> ArmResult<String> {
        let request_id = Uuid::new_v4();
        let request = request
            .header(CLIENT_REQUEST_ID_HEADER, request_id.to_string())
            .build()
            .map_err(|e| ArmError::ConnectionFailed(format!("Failed to build request: {e}")))?;

        let method = request.method().clone();
        let path = request.url().path().to_string();
        tracing::debug!(method = %method, path = %path, request_id = %request_id, "Sending Resource Manager request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| ArmError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ArmError::InvalidResponse(format!("Failed to read response body: {e}")))?;

        tracing::debug!(
            method = %method,
            path = %path,
            request_id = %request_id,
            status = status.as_u16(),
            "Received Resource Manager response"
        );

        if is_success(status) {
            Ok(body)
        } else {
            Err(ArmError::from_status(status.as_u16(), error_message(status, &body)))
        }
    }
}

fn is_success(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED | StatusCode::NO_CONTENT
    )
}

fn decode<T: DeserializeOwned>(body: &str) -> ArmResult<T> {
    serde_json::from_str(body)
        .map_err(|e| ArmError::InvalidResponse(format!("Failed to decode response body: {e}")))
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Extracts a readable message from an ARM error envelope
fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope {
            error: ErrorDetail { code, message },
        }) => match (code, message) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (None, Some(message)) => message,
            (Some(code), None) => code,
            (None, None) => status.to_string(),
        },
        Err(_) if body.trim().is_empty() => status.to_string(),
        Err(_) => body.to_string(),
    }
}
