//! Bearer token authentication backed by the user store.

use std::sync::Arc;

use async_trait::async_trait;
use ledgerly_core::auth::{Actor, Authenticator, RequestMeta};
use ledgerly_core::store::EntityStore;
use ledgerly_shared::jwt::{JwtError, JwtService};
use ledgerly_shared::{AppError, AppResult};
use tracing::debug;

/// Validates JWTs and resolves the acting user from storage.
///
/// The token only carries identity. Role and company are read from the stored
/// user on every request, so a role change takes effect immediately.
#[derive(Clone)]
pub struct JwtAuthenticator {
    jwt: Arc<JwtService>,
    store: Arc<dyn EntityStore>,
}

impl std::fmt::Debug for JwtAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAuthenticator")
            .field("jwt", &self.jwt)
            .finish_non_exhaustive()
    }
}

impl JwtAuthenticator {
    /// Creates the authenticator.
    #[must_use]
    pub fn new(jwt: Arc<JwtService>, store: Arc<dyn EntityStore>) -> Self {
        Self { jwt, store }
    }
}

#[async_trait]
impl Authenticator for JwtAuthenticator {
    async fn authenticate(&self, token: &str, meta: RequestMeta) -> AppResult<Actor> {
        let claims = self.jwt.validate_token(token).map_err(|e| match e {
            JwtError::Expired => AppError::Unauthenticated("Token has expired".into()),
            _ => AppError::Unauthenticated("Invalid or malformed token".into()),
        })?;

        let Some(user) = self.store.find_user(claims.user_id()).await? else {
            debug!(user_id = %claims.user_id(), "Token subject no longer exists");
            return Err(AppError::Unauthenticated("User no longer exists".into()));
        };
        if user.company_id != claims.company_id() {
            debug!(user_id = %user.id, "Token issued for a different company");
            return Err(AppError::Unauthenticated("Invalid or malformed token".into()));
        }

        Ok(Actor::from_user(user, meta))
    }
}
