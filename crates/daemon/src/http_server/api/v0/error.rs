//! Shared error body, request extractors and deadlines for the v0 surface.

use std::future::Future;
use std::time::Duration;

use axum::async_trait;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::request::Parts;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::prelude::{OwnerId, WorkspaceError};

use crate::auth::AuthDenied;
use crate::ServiceState;

/// Deadline for handlers touching a single record
pub const SINGLE_OP_DEADLINE: Duration = Duration::from_secs(5);
/// Deadline for cascades and tree builds
pub const CASCADE_DEADLINE: Duration = Duration::from_secs(10);

/// Body of every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    pub fn response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
        let body = ErrorBody {
            code: code.to_string(),
            message: message.into(),
        };
        (status, Json(body)).into_response()
    }
}

/// Body of every delete response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub message: String,
}

/// Failures shared by the workspace resource handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiFailure {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid reference: {0}")]
    InvalidReference(String),
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AuthDenied),
    #[error("request timed out")]
    Timeout,
    #[error(transparent)]
    Workspace(#[from] WorkspaceError<sqlx::Error>),
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        match self {
            ApiFailure::InvalidInput(msg) => {
                ErrorBody::response(StatusCode::BAD_REQUEST, "INVALID_INPUT", msg)
            }
            ApiFailure::InvalidReference(msg) => {
                ErrorBody::response(StatusCode::BAD_REQUEST, "INVALID_REFERENCE", msg)
            }
            ApiFailure::Unauthorized(denied) => {
                ErrorBody::response(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", denied.to_string())
            }
            ApiFailure::Timeout => ErrorBody::response(
                StatusCode::GATEWAY_TIMEOUT,
                "TIMEOUT",
                "request did not complete in time",
            ),
            ApiFailure::Workspace(err) => match err {
                WorkspaceError::InvalidInput(msg) => {
                    ErrorBody::response(StatusCode::BAD_REQUEST, "INVALID_INPUT", msg)
                }
                WorkspaceError::InvalidReference(msg) => {
                    ErrorBody::response(StatusCode::BAD_REQUEST, "INVALID_REFERENCE", msg)
                }
                not_found @ WorkspaceError::NotFound { .. } => ErrorBody::response(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    not_found.to_string(),
                ),
                WorkspaceError::Conflict(msg) => {
                    ErrorBody::response(StatusCode::CONFLICT, "CONFLICT", msg)
                }
                WorkspaceError::Provider(e) => {
                    tracing::error!(error = %e, "workspace store failure");
                    ErrorBody::response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL",
                        "internal server error",
                    )
                }
            },
        }
    }
}

impl From<JsonRejection> for ApiFailure {
    fn from(rejection: JsonRejection) -> Self {
        ApiFailure::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for ApiFailure {
    fn from(rejection: PathRejection) -> Self {
        ApiFailure::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiFailure {
    fn from(rejection: QueryRejection) -> Self {
        ApiFailure::InvalidInput(rejection.body_text())
    }
}

/// JSON body whose rejections use the API error shape
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiFailure))]
pub struct ApiJson<T>(pub T);

/// Query string whose rejections use the API error shape
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiFailure))]
pub struct ApiQuery<T>(pub T);

/// Record id taken from the path. Anything that is not a UUID is rejected
/// with `INVALID_INPUT` before the store is touched.
#[derive(Debug, Clone, Copy)]
pub struct RecordId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiFailure;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(raw) =
            axum::extract::Path::<String>::from_request_parts(parts, state).await?;
        parse_id(&raw, "id").map(RecordId)
    }
}

/// The owner the auth gate resolved for this request
#[derive(Debug, Clone)]
pub struct Owner(pub OwnerId);

#[async_trait]
impl FromRequestParts<ServiceState> for Owner {
    type Rejection = ApiFailure;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        let owner = state
            .auth()
            .authorize(&parts.method, &parts.headers)
            .await?;
        Ok(Owner(owner))
    }
}

pub fn parse_id(raw: &str, field: &str) -> Result<Uuid, ApiFailure> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiFailure::InvalidInput(format!("{} is not a valid id: {}", field, raw)))
}

/// Parse an optional id from a query string; absent or blank means no constraint.
pub fn parse_optional_id(raw: Option<&str>, field: &str) -> Result<Option<Uuid>, ApiFailure> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        Some(raw) => parse_id(raw, field).map(Some),
        None => Ok(None),
    }
}

/// Parse an id that a create body uses to point at its parent record.
pub fn parse_reference(raw: Option<&str>, field: &str) -> Result<Uuid, ApiFailure> {
    let raw = raw
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ApiFailure::InvalidReference(format!("{} is required", field)))?;
    Uuid::parse_str(raw)
        .map_err(|_| ApiFailure::InvalidReference(format!("{} is not a valid id: {}", field, raw)))
}

/// Run a store call under a deadline. The call is abandoned, not rolled back,
/// when the deadline passes.
pub async fn with_deadline<T, F>(deadline: Duration, fut: F) -> Result<T, ApiFailure>
where
    F: Future<Output = Result<T, WorkspaceError<sqlx::Error>>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => Ok(result?),
        Err(_) => {
            tracing::warn!(deadline_ms = deadline.as_millis() as u64, "store call timed out");
            Err(ApiFailure::Timeout)
        }
    }
}

#[cfg(test)]
mod tests {
    use common::workspace::EntityKind;

    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiFailure::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (
                ApiFailure::InvalidReference("x".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiFailure::Unauthorized(AuthDenied::MissingToken),
                StatusCode::UNAUTHORIZED,
            ),
            (ApiFailure::Timeout, StatusCode::GATEWAY_TIMEOUT),
            (
                WorkspaceError::<sqlx::Error>::not_found(EntityKind::Vault, Uuid::new_v4()).into(),
                StatusCode::NOT_FOUND,
            ),
            (
                WorkspaceError::<sqlx::Error>::Conflict("dup".into()).into(),
                StatusCode::CONFLICT,
            ),
            (
                WorkspaceError::Provider(sqlx::Error::PoolTimedOut).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (failure, status) in cases {
            assert_eq!(failure.into_response().status(), status);
        }
    }

    #[test]
    fn test_id_parsing() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "id").unwrap(), id);
        assert!(matches!(
            parse_id("nope", "id"),
            Err(ApiFailure::InvalidInput(_))
        ));

        assert_eq!(parse_optional_id(None, "spaceId").unwrap(), None);
        assert_eq!(parse_optional_id(Some(" "), "spaceId").unwrap(), None);
        assert!(parse_optional_id(Some("bad"), "spaceId").is_err());

        assert!(matches!(
            parse_reference(None, "spaceId"),
            Err(ApiFailure::InvalidReference(_))
        ));
        assert!(matches!(
            parse_reference(Some("bad"), "spaceId"),
            Err(ApiFailure::InvalidReference(_))
        ));
        assert_eq!(
            parse_reference(Some(&id.to_string()), "spaceId").unwrap(),
            id
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_elapses() {
        let result: Result<(), ApiFailure> = with_deadline(Duration::from_secs(1), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(ApiFailure::Timeout)));
    }
}
