use axum::Json;
use axum::extract::Extension;
use flock_domain::AuthContext;

use crate::dto::{
    AccessCheckRequest, AccessCheckResponse, AccessSetResponse, AccessSummaryResponse,
};
use crate::error::ApiResult;

/// Evaluates one capability check for the acting person.
///
/// A denial is a successful response with `allowed: false`; only malformed
/// requests error.
pub async fn check_handler(
    Extension(context): Extension<AuthContext>,
    Json(payload): Json<AccessCheckRequest>,
) -> ApiResult<Json<AccessCheckResponse>> {
    let request = payload.into_access_request()?;
    let allowed = context.allows(&request);

    Ok(Json(AccessCheckResponse { allowed }))
}

/// Returns the acting person's accessible networks and cells.
pub async fn my_access_handler(
    Extension(context): Extension<AuthContext>,
) -> ApiResult<Json<AccessSummaryResponse>> {
    Ok(Json(AccessSummaryResponse {
        networks: AccessSetResponse::from_networks(context.accessible_networks()),
        cells: AccessSetResponse::from_cells(context.accessible_cells()),
    }))
}
