//! Request bodies. Shape and field rules are checked here, before any
//! service is called; business rules stay in the services.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::catalog::{DishDraft, RestaurantProfile};
use crate::domain::order::{OrderItem, OrderItemDraft, OrderStatus};
use crate::domain::user::{Registration, UserProfile};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub postal_code: String,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Registration {
            email: req.email,
            password: req.password,
            profile: UserProfile {
                name: req.name,
                phone: req.phone,
                address: req.address,
                city: req.city,
                state: req.state,
                country: req.country,
                postal_code: req.postal_code,
            },
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub postal_code: String,
}

impl From<UpdateUserRequest> for UserProfile {
    fn from(req: UpdateUserRequest) -> Self {
        UserProfile {
            name: req.name,
            phone: req.phone,
            address: req.address,
            city: req.city,
            state: req.state,
            country: req.country,
            postal_code: req.postal_code,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RestaurantRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(email)]
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub cuisine: String,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: f32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl From<RestaurantRequest> for RestaurantProfile {
    fn from(req: RestaurantRequest) -> Self {
        RestaurantProfile {
            name: req.name,
            description: req.description,
            email: req.email,
            phone: req.phone,
            address: req.address,
            city: req.city,
            state: req.state,
            country: req.country,
            postal_code: req.postal_code,
            cuisine: req.cuisine,
            rating: req.rating,
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct DishRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    #[validate(url)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

impl From<DishRequest> for DishDraft {
    fn from(req: DishRequest) -> Self {
        DishDraft {
            name: req.name,
            description: req.description,
            price: req.price,
            category: req.category,
            image_url: req.image_url,
            is_available: req.is_available,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemRequest {
    pub dish_id: Uuid,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
}

impl From<&OrderItemRequest> for OrderItemDraft {
    fn from(item: &OrderItemRequest) -> Self {
        OrderItemDraft {
            dish_id: item.dish_id,
            quantity: item.quantity,
        }
    }
}

/// The ordering user is the authenticated caller, never the body
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub restaurant_id: Uuid,
    #[validate(length(min = 1, message = "order must contain at least one item"), nested)]
    pub items: Vec<OrderItemRequest>,
}

/// Full replacement of an order. Prices are never accepted from the client.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrderRequest {
    /// Defaults to the stored owner
    pub user_id: Option<Uuid>,
    pub restaurant_id: Uuid,
    /// Defaults to the stored status
    pub status: Option<OrderStatus>,
    #[validate(length(min = 1, message = "order must contain at least one item"), nested)]
    pub items: Vec<OrderItemRequest>,
}

impl UpdateOrderRequest {
    /// Line items with a zero placeholder price; the order service re-prices
    pub fn unpriced_items(&self) -> Vec<OrderItem> {
        self.items
            .iter()
            .map(|item| OrderItem {
                dish_id: item.dish_id,
                quantity: item.quantity,
                price: Decimal::ZERO,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

fn default_true() -> bool {
    true
}
