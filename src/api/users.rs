use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use super::dto::{ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateUserRequest};
use super::ApiError;
use crate::auth::AuthenticatedUser;
use crate::domain::order::OrderQueries;
use crate::domain::user::UserService;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/{id}", web::get().to(get_user))
            .route("/{id}", web::put().to(update_user))
            .route("/{id}", web::delete().to(delete_user))
            .route("/{id}/password", web::put().to(change_password))
            .route("/{id}/orders", web::get().to(get_user_orders)),
    );
}

/// Accounts can only be changed by their owner
fn ensure_self(user: &AuthenticatedUser, id: Uuid) -> Result<(), ApiError> {
    if user.user_id != id {
        tracing::warn!(caller = %user.user_id, target = %id, "Account change denied");
        return Err(ApiError::Forbidden("cannot modify another user's account".into()));
    }
    Ok(())
}

async fn register(
    service: web::Data<UserService>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();
    req.validate()?;

    let session = service.register(req.into()).await?;
    Ok(HttpResponse::Created().json(session))
}

async fn login(
    service: web::Data<UserService>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;

    let session = service.login(&body.email, &body.password).await?;
    Ok(HttpResponse::Ok().json(session))
}

async fn get_user(
    _user: AuthenticatedUser,
    service: web::Data<UserService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(service.get_user(path.into_inner()).await?))
}

async fn update_user(
    user: AuthenticatedUser,
    service: web::Data<UserService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    ensure_self(&user, id)?;

    let req = body.into_inner();
    req.validate()?;

    Ok(HttpResponse::Ok().json(service.update_profile(id, req.into()).await?))
}

async fn delete_user(
    user: AuthenticatedUser,
    service: web::Data<UserService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    ensure_self(&user, id)?;

    service.delete_user(id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "user deleted successfully" })))
}

async fn change_password(
    user: AuthenticatedUser,
    service: web::Data<UserService>,
    path: web::Path<Uuid>,
    body: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    ensure_self(&user, id)?;
    body.validate()?;

    service
        .change_password(id, &body.current_password, &body.new_password)
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "password changed successfully" })))
}

async fn get_user_orders(
    _user: AuthenticatedUser,
    queries: web::Data<OrderQueries>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(queries.get_orders_by_user_id(path.into_inner()).await?))
}
