//! HTTP API Tests
//!
//! Drives the router with axum-test over the mock listing port:
//! - Page data at `/` and `/api/v1/policies`
//! - Empty page versus 503 depending on the failure mode
//! - Liveness, readiness and the JSON 404 fallback
//! - Request ids are echoed and forwarded as correlation ids

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use core_kernel::AdapterHealth;
use domain_policy::ports::mock::{MockFailure, MockPolicyListingPort};
use domain_policy::{FailureMode, PolicyPageLoader};
use interface_api::config::ApiConfig;
use interface_api::{create_router, AppState};
use serde_json::{json, Value};
use test_utils::{LogCapture, PolicyFixtures, ResponseFixtures};

const REQUEST_ID: &str = "x-request-id";

fn server_with(port: Arc<MockPolicyListingPort>, mode: FailureMode) -> TestServer {
    let loader = PolicyPageLoader::new(port, mode);
    let state = AppState::new(loader, ApiConfig::default());
    TestServer::new(create_router(state)).expect("failed to start test server")
}

fn ranked_port() -> Arc<MockPolicyListingPort> {
    Arc::new(MockPolicyListingPort::verbatim(PolicyFixtures::ranked_listing()))
}

// ============================================================================
// PAGE DATA
// ============================================================================

mod page_data {
    use super::*;

    #[tokio::test]
    async fn test_root_returns_policies() {
        let server = server_with(ranked_port(), FailureMode::EmptyOnError);

        let response = server.get("/").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body, json!({"policies": ResponseFixtures::ranked_body()}));
    }

    #[tokio::test]
    async fn test_api_route_matches_root() {
        let server = server_with(ranked_port(), FailureMode::EmptyOnError);

        let root: Value = server.get("/").await.json();
        let api: Value = server.get("/api/v1/policies").await.json();

        assert_eq!(root, api);
    }

    #[tokio::test]
    async fn test_query_parameters_ignored() {
        let port = ranked_port();
        let server = server_with(port.clone(), FailureMode::EmptyOnError);

        let response = server.get("/?page=2&limit=1&sort=title").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["policies"].as_array().map(Vec::len), Some(6));
        assert_eq!(port.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_renders_empty_page() {
        let port = Arc::new(MockPolicyListingPort::failing(MockFailure::Connection));
        let server = server_with(port, FailureMode::EmptyOnError);

        let response = server.get("/").await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({"policies": []}));
    }

    #[tokio::test]
    async fn test_store_failure_propagated_as_503() {
        let port = Arc::new(MockPolicyListingPort::failing(MockFailure::Timeout));
        let server = server_with(port, FailureMode::Propagate);

        let response = server.get("/api/v1/policies").await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = response.json();
        assert_eq!(body["error"], "service_unavailable");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_failure_logged_once_per_request() {
        let port = Arc::new(MockPolicyListingPort::failing(MockFailure::ServiceUnavailable));
        let server = server_with(port, FailureMode::EmptyOnError);

        let capture = LogCapture::new();
        let _guard = capture.install();
        server.get("/").await.assert_status_ok();

        let errors = capture.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Error fetching policies");
    }
}

// ============================================================================
// REQUEST IDS
// ============================================================================

mod request_ids {
    use super::*;

    #[tokio::test]
    async fn test_request_id_generated_when_absent() {
        let port = ranked_port();
        let server = server_with(port.clone(), FailureMode::EmptyOnError);

        let response = server.get("/").await;

        let echoed = response
            .headers()
            .get(REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .expect("response carries a request id");
        assert!(!echoed.is_empty());
        assert_eq!(port.requests().await[0].correlation_id.as_deref(), Some(echoed.as_str()));
    }

    #[tokio::test]
    async fn test_request_id_propagated() {
        let port = ranked_port();
        let server = server_with(port.clone(), FailureMode::EmptyOnError);

        let response = server
            .get("/")
            .add_header(
                HeaderName::from_static(REQUEST_ID),
                HeaderValue::from_static("req-abc"),
            )
            .await;

        assert_eq!(
            response.headers().get(REQUEST_ID).and_then(|v| v.to_str().ok()),
            Some("req-abc")
        );
        assert_eq!(port.requests().await[0].correlation_id.as_deref(), Some("req-abc"));
    }
}

// ============================================================================
// HEALTH AND FALLBACK
// ============================================================================

mod health {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let server = server_with(ranked_port(), FailureMode::EmptyOnError);

        let response = server.get("/health").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert!(body["version"].is_string());
    }

    #[tokio::test]
    async fn test_readiness_follows_store_health() {
        let port = ranked_port();
        let server = server_with(port.clone(), FailureMode::EmptyOnError);

        let ready = server.get("/health/ready").await;
        ready.assert_status_ok();
        assert_eq!(ready.json::<Value>()["status"], "ready");

        port.set_health(AdapterHealth::Unhealthy).await;

        let unavailable = server.get("/health/ready").await;
        unavailable.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = unavailable.json();
        assert_eq!(body["status"], "unavailable");
        assert_eq!(body["store"]["status"], "unhealthy");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let server = server_with(ranked_port(), FailureMode::EmptyOnError);

        let response = server.get("/claims").await;

        response.assert_status_not_found();
        let body: Value = response.json();
        assert_eq!(body["error"], "not_found");
    }
}
