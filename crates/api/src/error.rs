//! Error → HTTP response mapping.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, OptionalFromRequest, Path, Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ledgerly_shared::AppError;
use serde::de::DeserializeOwned;
use serde_json::json;

/// Wraps an [`AppError`] so handlers can return it with `?`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Handler result type.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(AppError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": self.0.public_message(),
            })),
        )
            .into_response()
    }
}

/// JSON body extractor whose rejections use the API error shape.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// A request without a `Content-Type` header extracts as `None`.
impl<T, S> OptionalFromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        let body = <Json<T> as OptionalFromRequest<S>>::from_request(req, state).await?;
        Ok(body.map(|Json(value)| Self(value)))
    }
}

/// Path parameter extractor whose rejections use the API error shape.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = ApiError(err).into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[rstest]
    #[case(AppError::Validation("Amount must be positive".into()), StatusCode::BAD_REQUEST)]
    #[case(AppError::Unauthenticated("Missing token".into()), StatusCode::UNAUTHORIZED)]
    #[case(AppError::Unauthorized("No".into()), StatusCode::FORBIDDEN)]
    #[case(AppError::NotFound("Budget not found".into()), StatusCode::NOT_FOUND)]
    #[case(AppError::InvalidState("Already approved".into()), StatusCode::CONFLICT)]
    #[tokio::test]
    async fn test_status_and_message(#[case] err: AppError, #[case] expected: StatusCode) {
        let message = err.public_message();
        let code = err.error_code();
        let (status, body) = render(err).await;
        assert_eq!(status, expected);
        assert_eq!(body["error"], code);
        assert_eq!(body["message"], message);
    }

    #[tokio::test]
    async fn test_internal_message_is_hidden() {
        let (status, body) = render(AppError::Internal("pool timed out".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "INTERNAL_ERROR");
        assert_eq!(body["message"], "An internal error occurred");
    }
}
