use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use validator::ValidationErrors;

use crate::domain::catalog::CatalogError;
use crate::domain::order::OrderError;
use crate::domain::user::UserError;
use crate::domain::ErrorKind;

// ============================================================================
// Transport Error Mapping
// ============================================================================
//
// NotFound → 404, Validation → 400, Conflict → 409, Unauthorized → 401,
// Repository and Internal → 500. Server-side causes are logged here and
// never returned to the client.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    User(#[from] UserError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Internal(String),
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::BadRequest(format!("invalid request: {}", errors))
    }
}

impl ApiError {
    fn kind(&self) -> Option<ErrorKind> {
        match self {
            ApiError::Order(e) => Some(e.kind()),
            ApiError::Catalog(e) => Some(e.kind()),
            ApiError::User(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.kind() {
            Some(ErrorKind::NotFound) => StatusCode::NOT_FOUND,
            Some(ErrorKind::Validation) => StatusCode::BAD_REQUEST,
            Some(ErrorKind::Conflict) => StatusCode::CONFLICT,
            Some(ErrorKind::Unauthorized) => StatusCode::UNAUTHORIZED,
            Some(ErrorKind::Repository | ErrorKind::Internal) => StatusCode::INTERNAL_SERVER_ERROR,
            None => match self {
                ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
                ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(serde_json::json!({ "error": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderStatus;
    use crate::repository::RepositoryError;
    use actix_web::body::to_bytes;
    use uuid::Uuid;

    async fn body_of(err: ApiError) -> serde_json::Value {
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn test_status_codes_follow_error_kind() {
        let id = Uuid::new_v4();

        assert_eq!(ApiError::from(OrderError::OrderNotFound(id)).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(OrderError::DeleteNotAllowed(OrderStatus::Delivered)).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::from(UserError::EmailTaken).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::from(UserError::InvalidCredentials).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden("no".into()).status_code(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_repository_cause_is_hidden() {
        let err = ApiError::from(OrderError::from(RepositoryError::Unavailable(
            "password=hunter2 host=db".into(),
        )));

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(err).await["error"], "internal server error");
    }

    #[actix_web::test]
    async fn test_validation_message_is_returned() {
        let err = ApiError::from(OrderError::InvalidStatusTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Ready,
        });

        assert_eq!(
            body_of(err).await["error"],
            "Invalid status transition from PENDING to READY"
        );
    }
}
