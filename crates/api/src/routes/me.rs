//! Routes about the authenticated user.

use axum::{Json, Router, routing::get};
use ledgerly_core::auth::{Tab, visible_tabs};
use serde::Serialize;

use crate::{AppState, middleware::AuthActor};

/// Creates the `/me` routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/me/tabs", get(my_tabs))
}

/// Navigation visible to the caller.
#[derive(Debug, Serialize)]
pub struct TabsResponse {
    /// Caller's role.
    pub role: &'static str,
    /// Visible tabs in display order.
    pub tabs: Vec<Tab>,
}

/// GET `/me/tabs`
async fn my_tabs(AuthActor(actor): AuthActor) -> Json<TabsResponse> {
    Json(TabsResponse {
        role: actor.role.as_str(),
        tabs: visible_tabs(actor.role),
    })
}
