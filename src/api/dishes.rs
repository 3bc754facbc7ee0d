use actix_web::{web, HttpResponse};
use uuid::Uuid;

use super::ApiError;
use crate::auth::AuthenticatedUser;
use crate::domain::catalog::CatalogService;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/dishes")
            .route("/{id}", web::get().to(get_dish))
            .route("/{id}", web::delete().to(delete_dish)),
    );
}

async fn get_dish(
    _user: AuthenticatedUser,
    service: web::Data<CatalogService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(service.get_dish(path.into_inner()).await?))
}

async fn delete_dish(
    _user: AuthenticatedUser,
    service: web::Data<CatalogService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    service.delete_dish(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "dish deleted successfully" })))
}
