//! Team management routes.

use axum::{
    Json, Router,
    extract::State,
    routing::put,
};
use ledgerly_core::user::TeamService;
use ledgerly_shared::types::UserId;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{ApiJson, ApiPath, ApiResult, AppState, middleware::AuthActor};

/// Creates the user routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/users/{id}/role", put(update_user_role))
}

/// Request body for changing a role.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    /// New role name, e.g. `accountant`.
    pub role: String,
}

/// PUT `/users/{id}/role`
async fn update_user_role(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ApiPath(id): ApiPath<UserId>,
    ApiJson(payload): ApiJson<UpdateRoleRequest>,
) -> ApiResult<Json<Value>> {
    TeamService::new(state.ctx)
        .update_user_role(&actor, id, &payload.role)
        .await?;
    Ok(Json(json!({
        "id": id,
        "role": payload.role,
        "message": "Role updated"
    })))
}
