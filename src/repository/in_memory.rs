//! In-memory implementation of every repository trait, for tests and
//! local development.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use super::{
    CatalogRepository, OrderRepository, RepositoryError, RepositoryResult, UserRepository,
};
use crate::domain::catalog::{Dish, DishDraft, Restaurant, RestaurantFilter, RestaurantProfile};
use crate::domain::order::{NewOrder, Order, OrderStatus};
use crate::domain::user::{NewUser, User};

/// Thread-safe store backed by one `HashMap` per entity.
///
/// Cloning is cheap and every clone shares the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    restaurants: Arc<RwLock<HashMap<Uuid, Restaurant>>>,
    dishes: Arc<RwLock<HashMap<Uuid, Dish>>>,
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn read<T>(lock: &RwLock<T>) -> RepositoryResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|e| RepositoryError::Unavailable(format!("Failed to acquire read lock: {}", e)))
}

fn write<T>(lock: &RwLock<T>) -> RepositoryResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|e| RepositoryError::Unavailable(format!("Failed to acquire write lock: {}", e)))
}

/// Oldest first, id as tie-breaker, so listings are stable
fn sort_orders(orders: &mut [Order]) {
    orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}

#[async_trait]
impl CatalogRepository for InMemoryStore {
    async fn get_restaurant(&self, id: Uuid) -> RepositoryResult<Option<Restaurant>> {
        Ok(read(&self.restaurants)?.get(&id).cloned())
    }

    async fn list_restaurants(&self, filter: &RestaurantFilter) -> RepositoryResult<Vec<Restaurant>> {
        let mut restaurants: Vec<Restaurant> = read(&self.restaurants)?
            .values()
            .filter(|r| filter.matches(&r.profile))
            .cloned()
            .collect();

        restaurants.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(restaurants)
    }

    async fn create_restaurant(&self, profile: RestaurantProfile) -> RepositoryResult<Restaurant> {
        let now = Utc::now();
        let restaurant = Restaurant {
            id: Uuid::new_v4(),
            profile,
            created_at: now,
            updated_at: now,
        };

        write(&self.restaurants)?.insert(restaurant.id, restaurant.clone());
        Ok(restaurant)
    }

    async fn update_restaurant(
        &self,
        id: Uuid,
        profile: RestaurantProfile,
    ) -> RepositoryResult<Option<Restaurant>> {
        let mut restaurants = write(&self.restaurants)?;

        Ok(restaurants.get_mut(&id).map(|restaurant| {
            restaurant.profile = profile;
            restaurant.updated_at = Utc::now();
            restaurant.clone()
        }))
    }

    async fn delete_restaurant(&self, id: Uuid) -> RepositoryResult<bool> {
        Ok(write(&self.restaurants)?.remove(&id).is_some())
    }

    async fn get_dish(&self, id: Uuid) -> RepositoryResult<Option<Dish>> {
        Ok(read(&self.dishes)?.get(&id).cloned())
    }

    async fn list_dishes(&self, restaurant_id: Uuid) -> RepositoryResult<Vec<Dish>> {
        let mut dishes: Vec<Dish> = read(&self.dishes)?
            .values()
            .filter(|d| d.restaurant_id == restaurant_id)
            .cloned()
            .collect();

        dishes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(dishes)
    }

    async fn create_dish(&self, restaurant_id: Uuid, draft: DishDraft) -> RepositoryResult<Dish> {
        let dish = draft.into_dish(Uuid::new_v4(), restaurant_id, Utc::now());

        write(&self.dishes)?.insert(dish.id, dish.clone());
        Ok(dish)
    }

    async fn update_dish(&self, mut dish: Dish) -> RepositoryResult<Option<Dish>> {
        let mut dishes = write(&self.dishes)?;

        let Some(stored) = dishes.get_mut(&dish.id) else {
            return Ok(None);
        };

        dish.created_at = stored.created_at;
        dish.updated_at = Utc::now();
        *stored = dish.clone();

        Ok(Some(dish))
    }

    async fn delete_dish(&self, id: Uuid) -> RepositoryResult<bool> {
        Ok(write(&self.dishes)?.remove(&id).is_some())
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn create(&self, order: NewOrder) -> RepositoryResult<Order> {
        let order = order.into_order(Uuid::new_v4(), Utc::now());

        write(&self.orders)?.insert(order.id, order.clone());

        tracing::debug!(order_id = %order.id, "Stored order in memory");
        Ok(order)
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<Order>> {
        Ok(read(&self.orders)?.get(&id).cloned())
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> RepositoryResult<Vec<Order>> {
        let mut orders: Vec<Order> = read(&self.orders)?
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();

        sort_orders(&mut orders);
        Ok(orders)
    }

    async fn get_all(&self) -> RepositoryResult<Vec<Order>> {
        let mut orders: Vec<Order> = read(&self.orders)?.values().cloned().collect();

        sort_orders(&mut orders);
        Ok(orders)
    }

    async fn update(&self, mut order: Order) -> RepositoryResult<Option<Order>> {
        let mut orders = write(&self.orders)?;

        let Some(stored) = orders.get_mut(&order.id) else {
            return Ok(None);
        };

        order.created_at = stored.created_at;
        order.updated_at = Utc::now();
        *stored = order.clone();

        Ok(Some(order))
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> RepositoryResult<bool> {
        let mut orders = write(&self.orders)?;

        Ok(match orders.get_mut(&id) {
            Some(order) => {
                order.status = status;
                order.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        Ok(write(&self.orders)?.remove(&id).is_some())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: NewUser) -> RepositoryResult<User> {
        let mut users = write(&self.users)?;

        if users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::UniqueViolation(format!(
                "users.email = {}",
                user.email
            )));
        }

        let user = user.into_user(Uuid::new_v4(), Utc::now());
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        Ok(read(&self.users)?.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(read(&self.users)?.values().find(|u| u.email == email).cloned())
    }

    async fn update(&self, mut user: User) -> RepositoryResult<Option<User>> {
        let mut users = write(&self.users)?;

        let Some(stored) = users.get_mut(&user.id) else {
            return Ok(None);
        };

        user.created_at = stored.created_at;
        user.updated_at = Utc::now();
        *stored = user.clone();

        Ok(Some(user))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        Ok(write(&self.users)?.remove(&id).is_some())
    }
}
