// ============================================================================
// HTTP API - actix-web transport
// ============================================================================
//
// Everything lives under /api. Handlers decode and validate the request,
// call one service, and map domain errors through ApiError. Only
// /api/users/register and /api/users/login are public; every other
// handler takes an AuthenticatedUser.
//
// ============================================================================

mod dishes;
mod dto;
mod error;
mod orders;
mod restaurants;
mod users;

pub use error::ApiError;

use actix_web::{error::InternalError, web, HttpResponse};
use std::sync::Arc;

use crate::auth::JwtService;
use crate::domain::catalog::CatalogService;
use crate::domain::order::{OrderQueries, OrderService};
use crate::domain::user::UserService;
use crate::metrics::Metrics;
use crate::repository::{CatalogRepository, OrderRepository, UserRepository};

/// Services shared by every worker
#[derive(Clone)]
pub struct ApiState {
    orders: web::Data<OrderService>,
    queries: web::Data<OrderQueries>,
    catalog: web::Data<CatalogService>,
    users: web::Data<UserService>,
    jwt: web::Data<JwtService>,
}

impl ApiState {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        orders: Arc<dyn OrderRepository>,
        users: Arc<dyn UserRepository>,
        jwt: JwtService,
        metrics: Option<Arc<Metrics>>,
    ) -> Self {
        let jwt = Arc::new(jwt);

        let mut order_service = OrderService::new(catalog.clone(), orders.clone());
        if let Some(metrics) = metrics {
            order_service = order_service.with_metrics(metrics);
        }

        Self {
            orders: web::Data::new(order_service),
            queries: web::Data::new(OrderQueries::new(catalog.clone(), orders, users.clone())),
            catalog: web::Data::new(CatalogService::new(catalog)),
            users: web::Data::new(UserService::new(users, jwt.clone())),
            jwt: web::Data::from(jwt),
        }
    }

    /// Register shared state, extractor error handling and all routes
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.orders.clone())
            .app_data(self.queries.clone())
            .app_data(self.catalog.clone())
            .app_data(self.users.clone())
            .app_data(self.jwt.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                let message = format!("invalid request body: {}", err);
                InternalError::from_response(err, bad_request(message)).into()
            }))
            .app_data(web::PathConfig::default().error_handler(|err, _req| {
                let message = format!("invalid path parameter: {}", err);
                InternalError::from_response(err, bad_request(message)).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                let message = format!("invalid query string: {}", err);
                InternalError::from_response(err, bad_request(message)).into()
            }))
            .service(
                web::scope("/api")
                    .configure(users::configure)
                    .configure(restaurants::configure)
                    .configure(dishes::configure)
                    .configure(orders::configure),
            );
    }
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message }))
}

// ============================================================================
// HTTP Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use crate::repository::InMemoryStore;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, App};
    use serde_json::{json, Value};

    fn state() -> ApiState {
        let store = Arc::new(InMemoryStore::new());
        let jwt = JwtService::with_config(JwtConfig {
            secret: "http-test-secret-at-least-32-bytes-long".into(),
            ..Default::default()
        });
        ApiState::new(store.clone(), store.clone(), store, jwt, None)
    }

    async fn app(
    ) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
        let state = state();
        test::init_service(App::new().configure(|cfg| state.configure(cfg))).await
    }

    async fn send<S>(
        app: &S,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value)
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let mut req = match method {
            "POST" => test::TestRequest::post(),
            "PUT" => test::TestRequest::put(),
            "DELETE" => test::TestRequest::delete(),
            _ => test::TestRequest::get(),
        }
        .uri(uri);
        if let Some(token) = token {
            req = req.insert_header((header::AUTHORIZATION, format!("Bearer {}", token)));
        }
        if let Some(body) = body {
            req = req.set_json(body);
        }

        let resp = test::call_service(app, req.to_request()).await;
        let status = resp.status();
        let bytes = test::read_body(resp).await;
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn register<S>(app: &S, email: &str) -> (String, String)
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let (status, body) = send(
            app,
            "POST",
            "/api/users/register",
            None,
            Some(json!({ "email": email, "password": "secret-pw", "name": "Test User" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    fn restaurant_body(name: &str) -> Value {
        json!({
            "name": name,
            "email": "kitchen@example.com",
            "phone": "555-0100",
            "address": "1 Main St",
            "city": "Springfield",
            "state": "IL",
            "country": "US",
            "postal_code": "62701",
            "cuisine": "italian",
            "rating": 4.2
        })
    }

    /// Restaurant with two dishes priced 10.00 and 5.00
    async fn seed_menu<S>(app: &S, token: &str) -> (String, String, String)
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let (status, restaurant) =
            send(app, "POST", "/api/restaurants", Some(token), Some(restaurant_body("Trattoria"))).await;
        assert_eq!(status, StatusCode::CREATED);
        let restaurant_id = restaurant["id"].as_str().unwrap().to_string();

        let dishes_uri = format!("/api/restaurants/{}/dishes", restaurant_id);
        let (_, a) = send(app, "POST", &dishes_uri, Some(token), Some(json!({ "name": "Lasagne", "price": 10.0 }))).await;
        let (_, b) = send(app, "POST", &dishes_uri, Some(token), Some(json!({ "name": "Tiramisu", "price": 5.0 }))).await;

        (
            restaurant_id,
            a["id"].as_str().unwrap().to_string(),
            b["id"].as_str().unwrap().to_string(),
        )
    }

    #[actix_web::test]
    async fn test_order_lifecycle_over_http() {
        let app = app().await;
        let (token, user_id) = register(&app, "eater@example.com").await;
        let (restaurant_id, dish_a, dish_b) = seed_menu(&app, &token).await;

        let (status, order) = send(
            &app,
            "POST",
            "/api/orders",
            Some(&token),
            Some(json!({
                "restaurant_id": restaurant_id,
                "items": [
                    { "dish_id": dish_a, "quantity": 2 },
                    { "dish_id": dish_b, "quantity": 1 }
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(order["status"], "PENDING");
        assert_eq!(order["total_amount"], 25.0);
        assert_eq!(order["user_id"], user_id.as_str());
        let order_uri = format!("/api/orders/{}", order["id"].as_str().unwrap());

        let (status, body) = send(
            &app,
            "PUT",
            &format!("{}/status", order_uri),
            Some(&token),
            Some(json!({ "status": "READY" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid status transition from PENDING to READY");

        let (status, body) = send(
            &app,
            "PUT",
            &format!("{}/status", order_uri),
            Some(&token),
            Some(json!({ "status": "CONFIRMED" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "CONFIRMED");
        assert_eq!(body["user"]["email"], "eater@example.com");
        assert_eq!(body["items"][0]["dish"]["name"], "Lasagne");

        let (status, _) = send(&app, "DELETE", &order_uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, mine) =
            send(&app, "GET", &format!("/api/users/{}/orders", user_id), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(mine.as_array().map(Vec::len), Some(1));
    }

    #[actix_web::test]
    async fn test_update_order_reprices_and_ignores_client_price() {
        let app = app().await;
        let (token, _) = register(&app, "eater@example.com").await;
        let (restaurant_id, dish_a, _) = seed_menu(&app, &token).await;

        let (_, order) = send(
            &app,
            "POST",
            "/api/orders",
            Some(&token),
            Some(json!({ "restaurant_id": restaurant_id, "items": [{ "dish_id": dish_a, "quantity": 1 }] })),
        )
        .await;

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/api/restaurants/{}/dishes/{}", restaurant_id, dish_a),
            Some(&token),
            Some(json!({ "price": 12.5 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/api/orders/{}", order["id"].as_str().unwrap()),
            Some(&token),
            Some(json!({
                "restaurant_id": restaurant_id,
                "status": "PENDING",
                "items": [{ "dish_id": dish_a, "quantity": 2, "price": 0.01 }]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["total_amount"], 25.0);
    }

    #[actix_web::test]
    async fn test_update_order_without_status_keeps_stored_status() {
        let app = app().await;
        let (token, user_id) = register(&app, "eater@example.com").await;
        let (restaurant_id, dish_a, _) = seed_menu(&app, &token).await;

        let (_, order) = send(
            &app,
            "POST",
            "/api/orders",
            Some(&token),
            Some(json!({ "restaurant_id": restaurant_id, "items": [{ "dish_id": dish_a, "quantity": 1 }] })),
        )
        .await;
        let order_uri = format!("/api/orders/{}", order["id"].as_str().unwrap());
        let (status, _) = send(
            &app,
            "PUT",
            &format!("{}/status", order_uri),
            Some(&token),
            Some(json!({ "status": "CONFIRMED" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, updated) = send(
            &app,
            "PUT",
            &order_uri,
            Some(&token),
            Some(json!({
                "restaurant_id": restaurant_id,
                "items": [{ "dish_id": dish_a, "quantity": 3 }]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "CONFIRMED");
        assert_eq!(updated["user_id"], user_id.as_str());
        assert_eq!(updated["total_amount"], 30.0);
    }

    #[actix_web::test]
    async fn test_oversized_dish_price_is_rejected() {
        let app = app().await;
        let (token, _) = register(&app, "eater@example.com").await;
        let (restaurant_id, _, _) = seed_menu(&app, &token).await;
        let dishes_uri = format!("/api/restaurants/{}/dishes", restaurant_id);

        let (status, body) = send(
            &app,
            "POST",
            &dishes_uri,
            Some(&token),
            Some(json!({ "name": "Caviar", "price": 1e25 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("maximum amount"));

        let (status, _) = send(
            &app,
            "POST",
            &dishes_uri,
            Some(&token),
            Some(json!({ "name": "Soup", "price": 1.999 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_order_with_foreign_dish_is_rejected() {
        let app = app().await;
        let (token, _) = register(&app, "eater@example.com").await;
        let (_, dish_a, _) = seed_menu(&app, &token).await;
        let (other_restaurant, _, _) = seed_menu(&app, &token).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/orders",
            Some(&token),
            Some(json!({ "restaurant_id": other_restaurant, "items": [{ "dish_id": dish_a, "quantity": 1 }] })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("does not belong"));
    }

    #[actix_web::test]
    async fn test_request_validation_errors() {
        let app = app().await;
        let (token, _) = register(&app, "eater@example.com").await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/orders",
            Some(&token),
            Some(json!({ "restaurant_id": uuid::Uuid::new_v4(), "items": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/api/orders/{}/status", uuid::Uuid::new_v4()),
            Some(&token),
            Some(json!({ "status": "SHIPPED" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "GET", "/api/orders/not-a-uuid", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_authentication_required() {
        let app = app().await;

        let (status, body) = send(&app, "GET", "/api/orders", None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "missing authorization header");
    }

    #[actix_web::test]
    async fn test_user_account_endpoints() {
        let app = app().await;
        let (token, user_id) = register(&app, "eater@example.com").await;
        let (other_token, _) = register(&app, "other@example.com").await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/users/register",
            None,
            Some(json!({ "email": "eater@example.com", "password": "secret-pw", "name": "Dup" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "user with this email already exists");

        let (status, body) = send(
            &app,
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "email": "eater@example.com", "password": "wrong-pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid credentials");

        let user_uri = format!("/api/users/{}", user_id);
        let (status, _) = send(&app, "PUT", &user_uri, Some(&other_token), Some(json!({ "name": "Hijack" }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(&app, "PUT", &user_uri, Some(&token), Some(json!({ "name": "Renamed" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Renamed");
        assert!(body.get("password_hash").is_none());

        let (status, _) = send(
            &app,
            "PUT",
            &format!("{}/password", user_uri),
            Some(&token),
            Some(json!({ "current_password": "secret-pw", "new_password": "better-pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &app,
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "email": "eater@example.com", "password": "better-pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "DELETE", &user_uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "GET", &user_uri, Some(&other_token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_catalog_endpoints() {
        let app = app().await;
        let (token, _) = register(&app, "owner@example.com").await;
        let (restaurant_id, dish_a, _) = seed_menu(&app, &token).await;

        let (status, list) = send(&app, "GET", "/api/restaurants?cuisine=italian", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().map(Vec::len), Some(1));

        let (status, dishes) =
            send(&app, "GET", &format!("/api/restaurants/{}/dishes", restaurant_id), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(dishes.as_array().map(Vec::len), Some(2));

        let (status, _) = send(&app, "DELETE", &format!("/api/dishes/{}", dish_a), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "GET", &format!("/api/dishes/{}", dish_a), Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let mut invalid = restaurant_body("Nameless");
        invalid["name"] = json!("");
        let (status, body) = send(&app, "POST", "/api/restaurants", Some(&token), Some(invalid)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "restaurant name is required");
    }
}
