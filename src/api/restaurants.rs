use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use super::dto::{DishRequest, RestaurantRequest};
use super::ApiError;
use crate::auth::AuthenticatedUser;
use crate::domain::catalog::{CatalogService, DishPatch, RestaurantFilter};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/restaurants")
            .route("", web::post().to(create_restaurant))
            .route("", web::get().to(list_restaurants))
            .route("/{id}", web::get().to(get_restaurant))
            .route("/{id}", web::put().to(update_restaurant))
            .route("/{id}", web::delete().to(delete_restaurant))
            .route("/{id}/dishes", web::get().to(list_dishes))
            .route("/{id}/dishes", web::post().to(create_dish))
            .route("/{id}/dishes/{dish_id}", web::put().to(update_dish)),
    );
}

async fn create_restaurant(
    _user: AuthenticatedUser,
    service: web::Data<CatalogService>,
    body: web::Json<RestaurantRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();
    req.validate()?;

    Ok(HttpResponse::Created().json(service.create_restaurant(req.into()).await?))
}

async fn list_restaurants(
    _user: AuthenticatedUser,
    service: web::Data<CatalogService>,
    filter: web::Query<RestaurantFilter>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(service.list_restaurants(&filter).await?))
}

async fn get_restaurant(
    _user: AuthenticatedUser,
    service: web::Data<CatalogService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(service.get_restaurant(path.into_inner()).await?))
}

async fn update_restaurant(
    _user: AuthenticatedUser,
    service: web::Data<CatalogService>,
    path: web::Path<Uuid>,
    body: web::Json<RestaurantRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();
    req.validate()?;

    Ok(HttpResponse::Ok().json(service.update_restaurant(path.into_inner(), req.into()).await?))
}

async fn delete_restaurant(
    _user: AuthenticatedUser,
    service: web::Data<CatalogService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    service.delete_restaurant(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "restaurant deleted successfully" })))
}

async fn list_dishes(
    _user: AuthenticatedUser,
    service: web::Data<CatalogService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(service.list_dishes(path.into_inner()).await?))
}

async fn create_dish(
    _user: AuthenticatedUser,
    service: web::Data<CatalogService>,
    path: web::Path<Uuid>,
    body: web::Json<DishRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();
    req.validate()?;

    Ok(HttpResponse::Created().json(service.create_dish(path.into_inner(), req.into()).await?))
}

async fn update_dish(
    _user: AuthenticatedUser,
    service: web::Data<CatalogService>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<DishPatch>,
) -> Result<HttpResponse, ApiError> {
    let (restaurant_id, dish_id) = path.into_inner();

    let dish = service
        .update_dish(restaurant_id, dish_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(dish))
}
