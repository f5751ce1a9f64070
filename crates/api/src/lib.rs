//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - Bearer token authentication resolving the acting user
//! - Error → HTTP response mapping

pub mod authenticator;
pub mod error;
pub mod middleware;
pub mod routes;


use std::sync::Arc;

use axum::Router;
use ledgerly_core::ServiceContext;
use ledgerly_core::auth::{Authenticator, VerificationService};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use authenticator::JwtAuthenticator;
pub use error::{ApiError, ApiJson, ApiPath, ApiResult};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Store, clock and id source every service is built from.
    pub ctx: ServiceContext,
    /// Resolves bearer tokens into actors.
    pub authenticator: Arc<dyn Authenticator>,
    /// Email verification codes.
    pub verification: VerificationService,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("ctx", &self.ctx)
            .field("verification", &self.verification)
            .finish_non_exhaustive()
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
