use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use super::dto::{CreateOrderRequest, UpdateOrderRequest, UpdateStatusRequest};
use super::ApiError;
use crate::auth::AuthenticatedUser;
use crate::domain::order::{OrderDraft, OrderItemDraft, OrderQueries, OrderService};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::post().to(create_order))
            .route("", web::get().to(get_all_orders))
            .route("/{id}", web::get().to(get_order))
            .route("/{id}", web::put().to(update_order))
            .route("/{id}", web::delete().to(delete_order))
            .route("/{id}/status", web::put().to(update_order_status)),
    );
}

async fn create_order(
    user: AuthenticatedUser,
    service: web::Data<OrderService>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();
    req.validate()?;

    let order = service
        .create_order(OrderDraft {
            user_id: user.user_id,
            restaurant_id: req.restaurant_id,
            items: req.items.iter().map(OrderItemDraft::from).collect(),
        })
        .await?;

    Ok(HttpResponse::Created().json(order))
}

async fn get_all_orders(
    _user: AuthenticatedUser,
    queries: web::Data<OrderQueries>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(queries.get_all_orders().await?))
}

async fn get_order(
    _user: AuthenticatedUser,
    queries: web::Data<OrderQueries>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(queries.get_order_by_id(path.into_inner()).await?))
}

async fn update_order(
    _user: AuthenticatedUser,
    service: web::Data<OrderService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();
    req.validate()?;

    let mut order = service.get_order(path.into_inner()).await?;
    order.user_id = req.user_id.unwrap_or(order.user_id);
    order.restaurant_id = req.restaurant_id;
    order.status = req.status.unwrap_or(order.status);
    order.items = req.unpriced_items();

    Ok(HttpResponse::Ok().json(service.update_order(order).await?))
}

async fn delete_order(
    _user: AuthenticatedUser,
    service: web::Data<OrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    service.delete_order(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "order deleted successfully" })))
}

async fn update_order_status(
    _user: AuthenticatedUser,
    service: web::Data<OrderService>,
    queries: web::Data<OrderQueries>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    service.update_order_status(id, body.status).await?;

    Ok(HttpResponse::Ok().json(queries.get_order_by_id(id).await?))
}
