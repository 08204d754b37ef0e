//! Hosted Database REST Adapter
//!
//! This module provides an adapter for reading listing views from a hosted
//! database-as-a-service through its REST layer (PostgREST dialect). It
//! implements the `PolicyListingPort` trait.
//!
//! # Request
//!
//! ```text
//! GET {base_url}/rest/v1/{view}?select=*&order=popularity_score.desc.nullslast,...
//! apikey: {api_key}
//! Authorization: Bearer {api_key}
//! Accept: application/json
//! Accept-Profile: {schema}        (only when a schema is configured)
//! ```
//!
//! # Error Handling
//!
//! REST errors are mapped to `PortError` variants:
//! - 401/403 -> `PortError::Unauthorized`
//! - 404 -> `PortError::NotFound`
//! - 429 -> `PortError::RateLimited`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - Timeouts -> `PortError::Timeout`
//! - Connection failures -> `PortError::Connection`
//! - Undecodable bodies -> `PortError::Transformation`
//! - Other -> `PortError::Internal`
//!
//! Requests are sent once; there is no retry.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, RETRY_AFTER, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use core_kernel::ordering::is_identifier;
use core_kernel::{
    DomainPort, HealthCheckResult, HealthCheckable, OperationMetadata, OrderBy, PortError,
    POPULARITY_ORDER,
};

use crate::loader::POLICY_VIEW;
use crate::ports::PolicyListingPort;
use crate::record::PolicyRecord;

const USER_AGENT_VALUE: &str = concat!("policy-board/", env!("CARGO_PKG_VERSION"));
const ADAPTER_ID: &str = "hosted-rest-adapter";
const REST_PATH: &str = "rest/v1";

/// Configuration for the hosted REST adapter
///
/// # Example
///
/// ```rust
/// use domain_policy::HostedRestConfig;
///
/// let config = HostedRestConfig::new("https://project.example.co", "anon-key")
///     .with_schema("public")
///     .with_view("policy_with_popularity_v2")
///     .with_timeout_secs(10);
/// assert_eq!(config.timeout_secs, Some(10));
/// assert_eq!(config.view, "policy_with_popularity_v2");
/// ```
#[derive(Clone)]
pub struct HostedRestConfig {
    /// Project URL, without the `/rest/v1` suffix
    pub base_url: String,
    /// Public (anon) API key, sent as `apikey` and as the bearer token
    pub api_key: String,
    /// Schema to read from; `None` uses the service's default schema
    pub schema: Option<String>,
    /// Listing view read by the health check
    pub view: String,
    /// Whole-request timeout; `None` keeps the HTTP client's default
    pub timeout_secs: Option<u64>,
}

impl HostedRestConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            schema: None,
            view: POLICY_VIEW.to_string(),
            timeout_secs: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Sets the view the health check reads; match the loader's view
    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = view.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

impl std::fmt::Debug for HostedRestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedRestConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("schema", &self.schema)
            .field("view", &self.view)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Error body returned by the REST layer
#[derive(Debug, Default, Deserialize)]
struct RestErrorBody {
    message: Option<String>,
    code: Option<String>,
    hint: Option<String>,
}

impl RestErrorBody {
    fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    fn describe(&self, fallback: &str) -> String {
        let mut text = self.message.clone().unwrap_or_else(|| fallback.to_string());
        if let Some(code) = &self.code {
            text = format!("{} ({})", text, code);
        }
        if let Some(hint) = &self.hint {
            text = format!("{}; hint: {}", text, hint);
        }
        text
    }
}

/// Adapter reading listing views from the hosted REST layer
#[derive(Debug, Clone)]
pub struct HostedRestAdapter {
    client: reqwest::Client,
    base_url: String,
    view: String,
    timeout_secs: Option<u64>,
}

impl HostedRestAdapter {
    /// Creates a new adapter with the given configuration
    ///
    /// # Errors
    ///
    /// Returns `PortError::Internal` if the key or schema cannot be sent as
    /// a header or the HTTP client cannot be built.
    pub fn new(config: HostedRestConfig) -> Result<Self, PortError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(HeaderName::from_static("apikey"), sensitive_header(&config.api_key)?);
        headers.insert(
            AUTHORIZATION,
            sensitive_header(&format!("Bearer {}", config.api_key))?,
        );
        if let Some(schema) = &config.schema {
            let value = HeaderValue::from_str(schema)
                .map_err(|_| PortError::internal(format!("invalid schema name: {}", schema)))?;
            headers.insert(HeaderName::from_static("accept-profile"), value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| PortError::internal(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            view: config.view,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Returns the normalized project URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the view the health check reads
    pub fn view(&self) -> &str {
        &self.view
    }

    fn view_url(&self, view: &str) -> Result<String, PortError> {
        if !is_identifier(view) {
            return Err(PortError::internal(format!("invalid view name: {}", view)));
        }
        Ok(format!("{}/{}/{}", self.base_url, REST_PATH, view))
    }

    /// Sends one GET for `view` and maps non-success statuses
    async fn get_view(
        &self,
        view: &str,
        order: OrderBy,
        limit: Option<u32>,
        correlation_id: Option<&str>,
    ) -> Result<reqwest::Response, PortError> {
        let url = self.view_url(view)?;
        let order_param = order
            .to_postgrest()
            .map_err(|e| PortError::internal(e.to_string()))?;

        let mut query: Vec<(&str, String)> = vec![("select", "*".to_string()), ("order", order_param)];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }

        debug!(url = %url, correlation_id = correlation_id.unwrap_or_default(), "fetching listing view");

        let mut request = self.client.get(&url).query(&query);
        if let Some(id) = correlation_id {
            request = request.header("x-request-id", id);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        check_status(response, view).await
    }

    fn map_transport_error(&self, error: reqwest::Error) -> PortError {
        if error.is_timeout() {
            PortError::Timeout {
                operation: "fetch_ordered".to_string(),
                duration_ms: self.timeout_secs.unwrap_or_default() * 1000,
            }
        } else if error.is_connect() {
            PortError::connection_from("failed to reach hosted database", error)
        } else {
            PortError::Internal {
                message: format!("request failed: {}", error),
                source: Some(Box::new(error)),
            }
        }
    }
}

fn sensitive_header(value: &str) -> Result<HeaderValue, PortError> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|_| PortError::internal("API key contains characters not allowed in a header"))?;
    header.set_sensitive(true);
    Ok(header)
}

async fn check_status(response: reqwest::Response, view: &str) -> Result<reqwest::Response, PortError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    let body = RestErrorBody::parse(&response.text().await.unwrap_or_default());
    let message = body.describe(status.canonical_reason().unwrap_or("unknown status"));

    warn!(status = status.as_u16(), view, message = %message, "hosted database rejected request");

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized { message },
        StatusCode::NOT_FOUND => PortError::not_found("view", view),
        StatusCode::TOO_MANY_REQUESTS => PortError::RateLimited {
            retry_after_secs: retry_after.unwrap_or_default(),
        },
        s if s.is_server_error() => PortError::ServiceUnavailable {
            service: format!("hosted database (HTTP {}): {}", s.as_u16(), message),
        },
        s => PortError::internal(format!("HTTP {}: {}", s.as_u16(), message)),
    })
}

impl DomainPort for HostedRestAdapter {}

#[async_trait]
impl HealthCheckable for HostedRestAdapter {
    /// Requests zero rows of the listing view to check reachability and credentials
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let result = self.get_view(&self.view, POPULARITY_ORDER, Some(0), None).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult::healthy(ADAPTER_ID, latency_ms),
            Err(e) => HealthCheckResult::unhealthy(ADAPTER_ID, latency_ms, e.to_string()),
        }
    }
}

#[async_trait]
impl PolicyListingPort for HostedRestAdapter {
    async fn fetch_ordered(
        &self,
        view: &str,
        order: OrderBy,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<PolicyRecord>, PortError> {
        let correlation_id = metadata.and_then(|m| m.correlation_id);
        let response = self
            .get_view(view, order, None, correlation_id.as_deref())
            .await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| PortError::connection_from("failed to read response body", e))?;

        serde_json::from_slice::<Vec<PolicyRecord>>(&body).map_err(|e| {
            PortError::transformation(format!("unexpected response for view {}: {}", view, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_removed() {
        let adapter = HostedRestAdapter::new(HostedRestConfig::new("https://db.example.co/", "key")).unwrap();
        assert_eq!(adapter.base_url(), "https://db.example.co");
        assert_eq!(
            adapter.view_url("policy_with_popularity").unwrap(),
            "https://db.example.co/rest/v1/policy_with_popularity"
        );
    }

    #[test]
    fn test_view_name_must_be_identifier() {
        let adapter = HostedRestAdapter::new(HostedRestConfig::new("https://db.example.co", "key")).unwrap();
        assert!(adapter.view_url("../auth/users").is_err());
    }

    #[test]
    fn test_key_with_newline_rejected() {
        let result = HostedRestAdapter::new(HostedRestConfig::new("https://db.example.co", "bad\nkey"));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_debug_redacts_key() {
        let config = HostedRestConfig::new("https://db.example.co", "super-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn test_error_body_description() {
        let body = RestErrorBody::parse(
            r#"{"code":"42P01","message":"relation does not exist","hint":null,"details":null}"#,
        );
        assert_eq!(body.describe("Not Found"), "relation does not exist (42P01)");
        assert_eq!(RestErrorBody::parse("<html>").describe("Bad Gateway"), "Bad Gateway");
    }
}
