// ============================================================================
// Repository Layer - Persistence Abstractions
// ============================================================================
//
// Business logic talks to storage only through these traits. Two backends
// implement all three:
// - InMemoryStore   - HashMaps behind RwLocks (tests, local runs)
// - PostgresStore   - sqlx connection pool
//
// Lookups return Ok(None) for absent records; Err is reserved for storage
// failures.
//
// ============================================================================

mod in_memory;
mod postgres;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::catalog::{Dish, DishDraft, Restaurant, RestaurantFilter, RestaurantProfile};
use crate::domain::order::{NewOrder, Order, OrderStatus};
use crate::domain::user::{NewUser, User};
use crate::utils::IsTransient;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl IsTransient for RepositoryError {
    fn is_transient(&self) -> bool {
        match self {
            RepositoryError::Database(e) => matches!(
                e,
                sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::WorkerCrashed
            ),
            RepositoryError::Unavailable(_) => true,
            RepositoryError::UniqueViolation(_) | RepositoryError::Corrupt(_) => false,
        }
    }
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn get_restaurant(&self, id: Uuid) -> RepositoryResult<Option<Restaurant>>;

    async fn list_restaurants(&self, filter: &RestaurantFilter) -> RepositoryResult<Vec<Restaurant>>;

    async fn create_restaurant(&self, profile: RestaurantProfile) -> RepositoryResult<Restaurant>;

    /// Returns `None` when the restaurant does not exist
    async fn update_restaurant(
        &self,
        id: Uuid,
        profile: RestaurantProfile,
    ) -> RepositoryResult<Option<Restaurant>>;

    /// Returns `false` when nothing was deleted
    async fn delete_restaurant(&self, id: Uuid) -> RepositoryResult<bool>;

    async fn get_dish(&self, id: Uuid) -> RepositoryResult<Option<Dish>>;

    async fn list_dishes(&self, restaurant_id: Uuid) -> RepositoryResult<Vec<Dish>>;

    async fn create_dish(&self, restaurant_id: Uuid, draft: DishDraft) -> RepositoryResult<Dish>;

    /// Full replace of the stored dish; `None` when it does not exist
    async fn update_dish(&self, dish: Dish) -> RepositoryResult<Option<Dish>>;

    async fn delete_dish(&self, id: Uuid) -> RepositoryResult<bool>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Store a new order; the repository assigns id and timestamps
    async fn create(&self, order: NewOrder) -> RepositoryResult<Order>;

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<Order>>;

    async fn get_by_user_id(&self, user_id: Uuid) -> RepositoryResult<Vec<Order>>;

    async fn get_all(&self) -> RepositoryResult<Vec<Order>>;

    /// Replace the order row and all of its items. `created_at` is kept,
    /// `updated_at` refreshed. `None` when the order does not exist.
    async fn update(&self, order: Order) -> RepositoryResult<Option<Order>>;

    /// Change only the status column. `false` when the order does not exist.
    async fn update_status(&self, id: Uuid, status: OrderStatus) -> RepositoryResult<bool>;

    /// Remove the order and its items
    async fn delete(&self, id: Uuid) -> RepositoryResult<bool>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `UniqueViolation` when the e-mail is taken
    async fn create(&self, user: NewUser) -> RepositoryResult<User>;

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>>;

    async fn get_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;

    async fn update(&self, user: User) -> RepositoryResult<Option<User>>;

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool>;
}
