use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::catalog::{Dish, Restaurant};
use crate::domain::user::User;
use crate::repository::{CatalogRepository, OrderRepository, UserRepository};

use super::aggregate::Order;
use super::errors::OrderError;
use super::service::OrderResult;
use super::value_objects::OrderStatus;

// ============================================================================
// Order Queries (read side)
// ============================================================================
//
// Orders resolved against the catalog (and, for single lookups, the user).
// Every restaurant and dish is fetched at most once per call.
//
// References that no longer resolve (soft-deleted restaurant or dish,
// removed user) are reported as `None` rather than failing the read.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetails {
    pub id: Uuid,
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub items: Vec<OrderItemDetails>,
    pub restaurant: Option<Restaurant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItemDetails {
    pub dish_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
    pub dish: Option<Dish>,
}

pub struct OrderQueries {
    catalog: Arc<dyn CatalogRepository>,
    orders: Arc<dyn OrderRepository>,
    users: Arc<dyn UserRepository>,
}

impl OrderQueries {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        orders: Arc<dyn OrderRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            catalog,
            orders,
            users,
        }
    }

    /// Full order graph including the ordering user
    pub async fn get_order_by_id(&self, id: Uuid) -> OrderResult<OrderDetails> {
        let order = self
            .orders
            .get_by_id(id)
            .await?
            .ok_or(OrderError::OrderNotFound(id))?;

        let user = self.users.get_by_id(order.user_id).await?;

        let mut details = self.resolve(vec![order]).await?;
        let mut details = details.pop().ok_or(OrderError::OrderNotFound(id))?;
        details.user = user;

        Ok(details)
    }

    /// Empty when the user has no orders
    pub async fn get_orders_by_user_id(&self, user_id: Uuid) -> OrderResult<Vec<OrderDetails>> {
        let orders = self.orders.get_by_user_id(user_id).await?;
        tracing::debug!(user_id = %user_id, count = orders.len(), "Loaded orders for user");
        self.resolve(orders).await
    }

    /// Every order in the system, unpaginated
    pub async fn get_all_orders(&self) -> OrderResult<Vec<OrderDetails>> {
        let orders = self.orders.get_all().await?;
        tracing::debug!(count = orders.len(), "Loaded all orders");
        self.resolve(orders).await
    }

    async fn resolve(&self, orders: Vec<Order>) -> OrderResult<Vec<OrderDetails>> {
        let mut restaurants: HashMap<Uuid, Option<Restaurant>> = HashMap::new();
        let mut dishes: HashMap<Uuid, Option<Dish>> = HashMap::new();

        for order in &orders {
            if !restaurants.contains_key(&order.restaurant_id) {
                let restaurant = self.catalog.get_restaurant(order.restaurant_id).await?;
                restaurants.insert(order.restaurant_id, restaurant);
            }
            for item in &order.items {
                if !dishes.contains_key(&item.dish_id) {
                    let dish = self.catalog.get_dish(item.dish_id).await?;
                    dishes.insert(item.dish_id, dish);
                }
            }
        }

        let details = orders
            .into_iter()
            .map(|order| OrderDetails {
                id: order.id,
                user_id: order.user_id,
                restaurant_id: order.restaurant_id,
                status: order.status,
                total_amount: order.total_amount,
                items: order
                    .items
                    .into_iter()
                    .map(|item| OrderItemDetails {
                        dish: dishes.get(&item.dish_id).cloned().flatten(),
                        dish_id: item.dish_id,
                        quantity: item.quantity,
                        price: item.price,
                    })
                    .collect(),
                restaurant: restaurants.get(&order.restaurant_id).cloned().flatten(),
                user: None,
                created_at: order.created_at,
                updated_at: order.updated_at,
            })
            .collect();

        Ok(details)
    }
}
