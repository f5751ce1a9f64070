//! Budget routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};
use ledgerly_core::budget::{Budget, BudgetPatch, BudgetService, NewBudget};
use ledgerly_shared::types::BudgetId;
use serde_json::{Value, json};

use crate::{ApiJson, ApiPath, ApiResult, AppState, middleware::AuthActor};

/// Creates the budget routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/budgets/{id}", patch(update_budget).delete(delete_budget))
}

/// GET `/budgets` - Active budgets with remaining, utilization and overrun flag.
async fn list_budgets(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
) -> ApiResult<Json<Value>> {
    let budgets = BudgetService::new(state.ctx).list(&actor).await?;
    Ok(Json(json!({ "budgets": budgets })))
}

/// POST `/budgets`
async fn create_budget(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<NewBudget>,
) -> ApiResult<(StatusCode, Json<Budget>)> {
    let budget = BudgetService::new(state.ctx).create(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(budget)))
}

/// PATCH `/budgets/{id}`
async fn update_budget(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ApiPath(id): ApiPath<BudgetId>,
    ApiJson(patch): ApiJson<BudgetPatch>,
) -> ApiResult<Json<Budget>> {
    Ok(Json(
        BudgetService::new(state.ctx).update(&actor, id, patch).await?,
    ))
}

/// DELETE `/budgets/{id}` - Deactivate the budget.
async fn delete_budget(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ApiPath(id): ApiPath<BudgetId>,
) -> ApiResult<StatusCode> {
    BudgetService::new(state.ctx).delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
