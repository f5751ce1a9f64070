//! Account management routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};
use ledgerly_core::ledger::{Account, AccountPatch, AccountService, NewAccount};
use ledgerly_shared::types::AccountId;
use serde_json::{Value, json};

use crate::{ApiJson, ApiPath, ApiResult, AppState, middleware::AuthActor};

/// Creates the account routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/{id}", patch(update_account).delete(delete_account))
}

/// GET `/accounts` - Active accounts with balances.
async fn list_accounts(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
) -> ApiResult<Json<Value>> {
    let accounts = AccountService::new(state.ctx).list(&actor).await?;
    Ok(Json(json!({ "accounts": accounts })))
}

/// POST `/accounts`
async fn create_account(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<NewAccount>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    let account = AccountService::new(state.ctx).create(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// PATCH `/accounts/{id}`
async fn update_account(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ApiPath(id): ApiPath<AccountId>,
    ApiJson(patch): ApiJson<AccountPatch>,
) -> ApiResult<Json<Account>> {
    Ok(Json(
        AccountService::new(state.ctx).update(&actor, id, patch).await?,
    ))
}

/// DELETE `/accounts/{id}` - Deactivate the account.
async fn delete_account(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ApiPath(id): ApiPath<AccountId>,
) -> ApiResult<StatusCode> {
    AccountService::new(state.ctx).delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
