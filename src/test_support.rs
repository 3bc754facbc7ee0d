//! Shared fixtures for unit tests.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::catalog::{Dish, DishDraft, Restaurant, RestaurantFilter, RestaurantProfile};
use crate::domain::order::{NewOrder, Order, OrderStatus};
use crate::domain::user::{NewUser, User};
use crate::repository::{
    CatalogRepository, InMemoryStore, OrderRepository, RepositoryError, RepositoryResult,
    UserRepository,
};

pub fn restaurant_profile(name: &str) -> RestaurantProfile {
    RestaurantProfile {
        name: name.to_string(),
        description: String::new(),
        email: "kitchen@example.com".into(),
        phone: "555-0100".into(),
        address: "1 Main St".into(),
        city: "Springfield".into(),
        state: "IL".into(),
        country: "US".into(),
        postal_code: "62701".into(),
        cuisine: "italian".into(),
        rating: 4.0,
        is_active: true,
    }
}

pub fn dish_draft(name: &str, price: Decimal, is_available: bool) -> DishDraft {
    DishDraft {
        name: name.to_string(),
        description: String::new(),
        price,
        category: "mains".into(),
        image_url: None,
        is_available,
    }
}

pub async fn seed_restaurant(store: &InMemoryStore, name: &str) -> Uuid {
    store
        .create_restaurant(restaurant_profile(name))
        .await
        .unwrap()
        .id
}

pub async fn seed_dish(
    store: &InMemoryStore,
    restaurant_id: Uuid,
    name: &str,
    price: Decimal,
    is_available: bool,
) -> Uuid {
    store
        .create_dish(restaurant_id, dish_draft(name, price, is_available))
        .await
        .unwrap()
        .id
}

/// Repository double whose every call fails with a storage error
pub struct FailingStore;

fn unavailable<T>() -> RepositoryResult<T> {
    Err(RepositoryError::Unavailable("connection refused".into()))
}

#[async_trait]
impl CatalogRepository for FailingStore {
    async fn get_restaurant(&self, _id: Uuid) -> RepositoryResult<Option<Restaurant>> {
        unavailable()
    }

    async fn list_restaurants(&self, _filter: &RestaurantFilter) -> RepositoryResult<Vec<Restaurant>> {
        unavailable()
    }

    async fn create_restaurant(&self, _profile: RestaurantProfile) -> RepositoryResult<Restaurant> {
        unavailable()
    }

    async fn update_restaurant(
        &self,
        _id: Uuid,
        _profile: RestaurantProfile,
    ) -> RepositoryResult<Option<Restaurant>> {
        unavailable()
    }

    async fn delete_restaurant(&self, _id: Uuid) -> RepositoryResult<bool> {
        unavailable()
    }

    async fn get_dish(&self, _id: Uuid) -> RepositoryResult<Option<Dish>> {
        unavailable()
    }

    async fn list_dishes(&self, _restaurant_id: Uuid) -> RepositoryResult<Vec<Dish>> {
        unavailable()
    }

    async fn create_dish(&self, _restaurant_id: Uuid, _draft: DishDraft) -> RepositoryResult<Dish> {
        unavailable()
    }

    async fn update_dish(&self, _dish: Dish) -> RepositoryResult<Option<Dish>> {
        unavailable()
    }

    async fn delete_dish(&self, _id: Uuid) -> RepositoryResult<bool> {
        unavailable()
    }
}

#[async_trait]
impl OrderRepository for FailingStore {
    async fn create(&self, _order: NewOrder) -> RepositoryResult<Order> {
        unavailable()
    }

    async fn get_by_id(&self, _id: Uuid) -> RepositoryResult<Option<Order>> {
        unavailable()
    }

    async fn get_by_user_id(&self, _user_id: Uuid) -> RepositoryResult<Vec<Order>> {
        unavailable()
    }

    async fn get_all(&self) -> RepositoryResult<Vec<Order>> {
        unavailable()
    }

    async fn update(&self, _order: Order) -> RepositoryResult<Option<Order>> {
        unavailable()
    }

    async fn update_status(&self, _id: Uuid, _status: OrderStatus) -> RepositoryResult<bool> {
        unavailable()
    }

    async fn delete(&self, _id: Uuid) -> RepositoryResult<bool> {
        unavailable()
    }
}

#[async_trait]
impl UserRepository for FailingStore {
    async fn create(&self, _user: NewUser) -> RepositoryResult<User> {
        unavailable()
    }

    async fn get_by_id(&self, _id: Uuid) -> RepositoryResult<Option<User>> {
        unavailable()
    }

    async fn get_by_email(&self, _email: &str) -> RepositoryResult<Option<User>> {
        unavailable()
    }

    async fn update(&self, _user: User) -> RepositoryResult<Option<User>> {
        unavailable()
    }

    async fn delete(&self, _id: Uuid) -> RepositoryResult<bool> {
        unavailable()
    }
}
