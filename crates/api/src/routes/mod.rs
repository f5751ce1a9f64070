//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod accounts;
pub mod audit;
pub mod budgets;
pub mod categories;
pub mod health;
pub mod me;
pub mod transactions;
pub mod users;
pub mod verification;

/// Creates the API router, with the auth middleware on every protected route.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(transactions::routes())
        .merge(accounts::routes())
        .merge(categories::routes())
        .merge(budgets::routes())
        .merge(users::routes())
        .merge(audit::routes())
        .merge(me::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(verification::routes())
        .merge(protected_routes)
}
