use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use flock_core::{AppError, PersonId};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::state::AppState;

/// Header carrying the authenticated person id, set by the upstream
/// authentication provider.
pub const ACTING_PERSON_HEADER: &str = "x-acting-person";

/// Resolves the acting person's authorization context once per request and
/// makes it available to handlers as an extension.
pub async fn require_actor(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let raw = request
        .headers()
        .get(ACTING_PERSON_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let person = Uuid::parse_str(raw)
        .map(PersonId::from_uuid)
        .map_err(|_| AppError::Unauthorized("invalid acting person header".to_owned()))?;

    let context = state.authorization_service.context_for(person).await?;

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}
