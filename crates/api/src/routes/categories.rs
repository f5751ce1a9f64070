//! Category routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
};
use ledgerly_core::category::{Category, CategoryPatch, CategoryService, NewCategory};
use ledgerly_shared::types::CategoryId;
use serde_json::{Value, json};

use crate::{ApiJson, ApiPath, ApiResult, AppState, middleware::AuthActor};

/// Creates the category routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/defaults", post(seed_default_categories))
        .route("/categories/{id}", patch(update_category).delete(delete_category))
}

/// GET `/categories`
async fn list_categories(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
) -> ApiResult<Json<Value>> {
    let categories = CategoryService::new(state.ctx).list(&actor).await?;
    Ok(Json(json!({ "categories": categories })))
}

/// POST `/categories`
async fn create_category(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ApiJson(payload): ApiJson<NewCategory>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let category = CategoryService::new(state.ctx).create(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// POST `/categories/defaults` - Create the default category set.
async fn seed_default_categories(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let categories = CategoryService::new(state.ctx).seed_defaults(&actor).await?;
    Ok((StatusCode::CREATED, Json(json!({ "categories": categories }))))
}

/// PATCH `/categories/{id}`
async fn update_category(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ApiPath(id): ApiPath<CategoryId>,
    ApiJson(patch): ApiJson<CategoryPatch>,
) -> ApiResult<Json<Category>> {
    Ok(Json(
        CategoryService::new(state.ctx).update(&actor, id, patch).await?,
    ))
}

/// DELETE `/categories/{id}` - Deactivate the category.
async fn delete_category(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ApiPath(id): ApiPath<CategoryId>,
) -> ApiResult<StatusCode> {
    CategoryService::new(state.ctx).delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
