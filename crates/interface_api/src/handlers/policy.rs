//! Policy listing handlers

use axum::{extract::State, http::HeaderMap, Json};

use core_kernel::OperationMetadata;
use domain_policy::PolicyPage;

use crate::error::ApiError;
use crate::middleware::request_id;
use crate::AppState;

/// Page data for the policy listing: `{"policies": [...]}`
///
/// Query parameters are ignored. Fails only when the loader is configured
/// to propagate store errors.
pub async fn page_data(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PolicyPage>, ApiError> {
    let metadata = request_id(&headers).map(OperationMetadata::with_correlation_id);
    let page = state.loader.load(metadata).await?;
    Ok(Json(page))
}
