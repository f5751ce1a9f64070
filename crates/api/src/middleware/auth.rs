//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, header::USER_AGENT, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use ledgerly_core::auth::{Actor, RequestMeta};
use ledgerly_shared::AppError;

use crate::AppState;
use crate::error::ApiError;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Client address and user agent of a request.
///
/// The address is the first hop of `X-Forwarded-For`, else `X-Real-IP`.
pub fn request_meta(headers: &HeaderMap) -> RequestMeta {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let ip_address = header("x-forwarded-for")
        .and_then(|chain| chain.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .or_else(|| header("x-real-ip"))
        .map(str::to_string);
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    RequestMeta {
        ip_address,
        user_agent,
    }
}

/// Resolves the bearer token into an [`Actor`] and stores it in the request
/// extensions. Requests without a usable token are answered with 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token);

    let Some(token) = token else {
        return ApiError(AppError::Unauthenticated(
            "Authorization header with Bearer token is required".into(),
        ))
        .into_response();
    };

    let meta = request_meta(request.headers());
    match state.authenticator.authenticate(token, meta).await {
        Ok(actor) => {
            request.extensions_mut().insert(actor);
            next.run(request).await
        }
        Err(err) => ApiError(err).into_response(),
    }
}

/// Extractor for the authenticated actor.
#[derive(Debug, Clone)]
pub struct AuthActor(pub Actor);

impl<S> FromRequestParts<S> for AuthActor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Actor>()
            .cloned()
            .map(AuthActor)
            .ok_or_else(|| ApiError(AppError::Unauthenticated("Authentication required".into())))
    }
}
