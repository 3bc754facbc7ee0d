//! Bearer token extractor for actix-web handlers.

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use super::jwt::{JwtError, JwtService};
use crate::api::ApiError;

/// Caller identity taken from a validated access token.
///
/// Adding it as a handler argument makes the route require authentication.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
    let jwt = req
        .app_data::<web::Data<JwtService>>()
        .ok_or_else(|| ApiError::Internal("JWT service not configured".into()))?;

    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!(path = %req.path(), "Missing authorization header");
            ApiError::Unauthorized("missing authorization header".into())
        })?;

    let token = JwtService::extract_from_header(header)
        .ok_or_else(|| ApiError::Unauthorized("invalid authorization header".into()))?;

    let claims = jwt.validate_token(token).map_err(|e| {
        tracing::warn!(path = %req.path(), error = %e, "Token rejected");
        match e {
            JwtError::ExpiredToken => ApiError::Unauthorized("token expired".into()),
            _ => ApiError::Unauthorized("invalid token".into()),
        }
    })?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::Unauthorized("invalid token subject".into()))?;

    Ok(AuthenticatedUser {
        user_id,
        email: claims.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use actix_web::{http::StatusCode, test, App, HttpResponse};

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.user_id.to_string())
    }

    fn jwt() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "extractor-secret-at-least-32-bytes-long".into(),
            ..Default::default()
        })
    }

    #[actix_web::test]
    async fn test_valid_token_is_accepted() {
        let jwt = jwt();
        let user_id = Uuid::new_v4();
        let token = jwt.generate_token(user_id, "ada@example.com").unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(jwt))
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;

        assert_eq!(body, user_id.to_string().as_bytes());
    }

    #[actix_web::test]
    async fn test_missing_or_bad_token_is_unauthorized() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(jwt()))
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/me").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((header::AUTHORIZATION, "Bearer garbage"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
