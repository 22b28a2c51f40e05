use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use flock_application::RoleReconciliationInput;
use flock_core::{CellId, NetworkId, PersonId};
use flock_domain::AuthContext;
use uuid::Uuid;

use crate::dto::{ReconcileAssignmentsRequest, RoleAssignmentResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// Lists a person's current role assignments, for administrators.
pub async fn list_assignments_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path(person_id): Path<Uuid>,
) -> ApiResult<Json<Vec<RoleAssignmentResponse>>> {
    let assignments = state
        .role_admin_service
        .list_assignments(&actor, PersonId::from_uuid(person_id))
        .await?
        .into_iter()
        .map(RoleAssignmentResponse::from)
        .collect();

    Ok(Json(assignments))
}

/// Replaces a person's role assignments with the requested selection.
pub async fn reconcile_assignments_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path(person_id): Path<Uuid>,
    Json(payload): Json<ReconcileAssignmentsRequest>,
) -> ApiResult<Json<Vec<RoleAssignmentResponse>>> {
    let input = RoleReconciliationInput {
        role: payload.role_kind()?,
        network: payload.network_id.map(NetworkId::from_uuid),
        cell: payload.cell_id.map(CellId::from_uuid),
    };

    let assignments = state
        .role_admin_service
        .reconcile_assignments(&actor, PersonId::from_uuid(person_id), input)
        .await?
        .into_iter()
        .map(RoleAssignmentResponse::from)
        .collect();

    Ok(Json(assignments))
}

/// Clears a person's role assignments.
pub async fn remove_assignments_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path(person_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .role_admin_service
        .remove_assignments(&actor, PersonId::from_uuid(person_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
