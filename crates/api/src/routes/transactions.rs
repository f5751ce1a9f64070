//! Transaction routes: submission, approval workflow and edits.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use ledgerly_core::workflow::{
    NewTransaction, Transaction, TransactionFilter, TransactionLifecycle, TransactionPatch,
};
use ledgerly_shared::types::TransactionId;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{ApiJson, ApiPath, ApiResult, AppState, middleware::AuthActor};

/// Creates the transaction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .patch(update_transaction)
                .delete(delete_transaction),
        )
        .route("/transactions/{id}/approve", post(approve_transaction))
        .route("/transactions/{id}/reject", post(reject_transaction))
}

/// Request body for rejecting a transaction.
#[derive(Debug, Default, Deserialize)]
pub struct RejectRequest {
    /// Optional reason shown to the submitter.
    #[serde(default)]
    pub reason: Option<String>,
}

fn lifecycle(state: &AppState) -> TransactionLifecycle {
    TransactionLifecycle::new(state.ctx.clone())
}

/// GET `/transactions` - List the company's transactions, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Query(filter): Query<TransactionFilter>,
) -> ApiResult<Json<Value>> {
    let transactions = lifecycle(&state).list(&actor, filter).await?;
    Ok(Json(json!({ "transactions": transactions })))
}

/// POST `/transactions` - Submit a transaction for approval.
async fn create_transaction(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<NewTransaction>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let transaction = lifecycle(&state).create(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// GET `/transactions/{id}`
async fn get_transaction(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ApiPath(id): ApiPath<TransactionId>,
) -> ApiResult<Json<Transaction>> {
    Ok(Json(lifecycle(&state).get(&actor, id).await?))
}

/// PATCH `/transactions/{id}` - Edit description, amount or date.
async fn update_transaction(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ApiPath(id): ApiPath<TransactionId>,
    ApiJson(patch): ApiJson<TransactionPatch>,
) -> ApiResult<Json<Transaction>> {
    Ok(Json(lifecycle(&state).update(&actor, id, patch).await?))
}

/// DELETE `/transactions/{id}`
async fn delete_transaction(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ApiPath(id): ApiPath<TransactionId>,
) -> ApiResult<StatusCode> {
    lifecycle(&state).delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/transactions/{id}/approve`
async fn approve_transaction(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ApiPath(id): ApiPath<TransactionId>,
) -> ApiResult<Json<Transaction>> {
    Ok(Json(lifecycle(&state).approve(&actor, id).await?))
}

/// POST `/transactions/{id}/reject`
///
/// The body may be omitted entirely.
async fn reject_transaction(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ApiPath(id): ApiPath<TransactionId>,
    payload: Option<ApiJson<RejectRequest>>,
) -> ApiResult<Json<Transaction>> {
    let reason = payload.and_then(|ApiJson(body)| body.reason);
    Ok(Json(lifecycle(&state).reject(&actor, id, reason).await?))
}
