//! Audit trail route.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use ledgerly_core::audit::{AuditLog, AuditService};
use ledgerly_shared::types::{PageRequest, PageResponse};

use crate::{ApiResult, AppState, middleware::AuthActor};

/// Creates the audit routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/audit-logs", get(list_audit_logs))
}

/// GET `/audit-logs?page=&per_page=` - Newest first.
async fn list_audit_logs(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<PageResponse<AuditLog>>> {
    Ok(Json(AuditService::new(state.ctx).list(&actor, page).await?))
}
