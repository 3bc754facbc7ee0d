use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

use super::{
    CatalogRepository, OrderRepository, RepositoryError, RepositoryResult, UserRepository,
};
use crate::domain::catalog::{Dish, DishDraft, Restaurant, RestaurantFilter, RestaurantProfile};
use crate::domain::order::{NewOrder, Order, OrderItem, OrderStatus};
use crate::domain::user::{NewUser, User, UserProfile};

// ============================================================================
// PostgreSQL Store
// ============================================================================
//
// One pool, one struct, all repository traits.
//
// - Order writes (row + items) run in a single transaction
// - Restaurants and dishes are soft-deleted so past orders keep their
//   references; soft-deleted rows are invisible to every lookup
// - Status-only updates touch `status` and `updated_at`, nothing else
//
// ============================================================================

const SCHEMA: &str = include_str!("schema.sql");

const RESTAURANT_COLUMNS: &str = "id, name, description, email, phone, address, city, state, \
     country, postal_code, cuisine, rating, is_active, created_at, updated_at";

const DISH_COLUMNS: &str = "id, restaurant_id, name, description, price, category, image_url, \
     is_available, created_at, updated_at";

const ORDER_COLUMNS: &str = "id, user_id, restaurant_id, status, total_amount, created_at, updated_at";

const USER_COLUMNS: &str = "id, email, password_hash, name, phone, address, city, state, country, \
     postal_code, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, max_connections: u32) -> RepositoryResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        Ok(Self::new(pool))
    }

    /// Create tables and indexes that don't exist yet
    pub async fn apply_schema(&self) -> RepositoryResult<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        tracing::info!("Database schema applied");
        Ok(())
    }

    /// Attach line items to order rows, preserving row order
    async fn load_orders(&self, rows: Vec<OrderRow>) -> RepositoryResult<Vec<Order>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        let item_rows: Vec<OrderItemRow> = sqlx::query_as(
            "SELECT order_id, dish_id, quantity, price FROM order_items \
             WHERE order_id = ANY($1) ORDER BY order_id, position",
        )
        .bind(&ids[..])
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for row in item_rows {
            items_by_order.entry(row.order_id).or_default().push(OrderItem {
                dish_id: row.dish_id,
                quantity: row.quantity,
                price: row.price,
            });
        }

        rows.into_iter()
            .map(|row| {
                let items = items_by_order.remove(&row.id).unwrap_or_default();
                row.into_order(items)
            })
            .collect()
    }
}

async fn insert_items(
    tx: &mut Transaction<'_, Postgres>,
    order_id: Uuid,
    items: &[OrderItem],
) -> RepositoryResult<()> {
    for (position, item) in items.iter().enumerate() {
        sqlx::query(
            "INSERT INTO order_items (order_id, position, dish_id, quantity, price) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(order_id)
        .bind(position as i32)
        .bind(item.dish_id)
        .bind(item.quantity)
        .bind(item.price)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

fn map_unique_violation(err: sqlx::Error, what: &str) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::UniqueViolation(what.to_string())
        }
        _ => RepositoryError::Database(err),
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct RestaurantRow {
    id: Uuid,
    name: String,
    description: String,
    email: String,
    phone: String,
    address: String,
    city: String,
    state: String,
    country: String,
    postal_code: String,
    cuisine: String,
    rating: f32,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RestaurantRow> for Restaurant {
    fn from(row: RestaurantRow) -> Self {
        Restaurant {
            id: row.id,
            profile: RestaurantProfile {
                name: row.name,
                description: row.description,
                email: row.email,
                phone: row.phone,
                address: row.address,
                city: row.city,
                state: row.state,
                country: row.country,
                postal_code: row.postal_code,
                cuisine: row.cuisine,
                rating: row.rating,
                is_active: row.is_active,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DishRow {
    id: Uuid,
    restaurant_id: Uuid,
    name: String,
    description: String,
    price: Decimal,
    category: String,
    image_url: Option<String>,
    is_available: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DishRow> for Dish {
    fn from(row: DishRow) -> Self {
        Dish {
            id: row.id,
            restaurant_id: row.restaurant_id,
            name: row.name,
            description: row.description,
            price: row.price,
            category: row.category,
            image_url: row.image_url,
            is_available: row.is_available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: Uuid,
    restaurant_id: Uuid,
    status: String,
    total_amount: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> RepositoryResult<Order> {
        let status = self
            .status
            .parse::<OrderStatus>()
            .map_err(|e| RepositoryError::Corrupt(format!("order {}: {}", self.id, e)))?;

        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            restaurant_id: self.restaurant_id,
            status,
            total_amount: self.total_amount,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    order_id: Uuid,
    dish_id: Uuid,
    quantity: i32,
    price: Decimal,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    name: String,
    phone: String,
    address: String,
    city: String,
    state: String,
    country: String,
    postal_code: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            profile: UserProfile {
                name: row.name,
                phone: row.phone,
                address: row.address,
                city: row.city,
                state: row.state,
                country: row.country,
                postal_code: row.postal_code,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[async_trait]
impl CatalogRepository for PostgresStore {
    async fn get_restaurant(&self, id: Uuid) -> RepositoryResult<Option<Restaurant>> {
        let row: Option<RestaurantRow> = sqlx::query_as(&format!(
            "SELECT {} FROM restaurants WHERE id = $1 AND deleted_at IS NULL",
            RESTAURANT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Restaurant::from))
    }

    async fn list_restaurants(&self, filter: &RestaurantFilter) -> RepositoryResult<Vec<Restaurant>> {
        let rows: Vec<RestaurantRow> = sqlx::query_as(&format!(
            "SELECT {} FROM restaurants WHERE deleted_at IS NULL \
             AND ($1::text IS NULL OR cuisine = $1) \
             AND ($2::boolean IS NULL OR is_active = $2) \
             AND ($3::text IS NULL OR city = $3) \
             ORDER BY created_at, id",
            RESTAURANT_COLUMNS
        ))
        .bind(filter.cuisine.as_deref())
        .bind(filter.is_active)
        .bind(filter.city.as_deref())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Restaurant::from).collect())
    }

    async fn create_restaurant(&self, profile: RestaurantProfile) -> RepositoryResult<Restaurant> {
        let row: RestaurantRow = sqlx::query_as(&format!(
            "INSERT INTO restaurants (id, name, description, email, phone, address, city, state, \
             country, postal_code, cuisine, rating, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING {}",
            RESTAURANT_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&profile.name)
        .bind(&profile.description)
        .bind(&profile.email)
        .bind(&profile.phone)
        .bind(&profile.address)
        .bind(&profile.city)
        .bind(&profile.state)
        .bind(&profile.country)
        .bind(&profile.postal_code)
        .bind(&profile.cuisine)
        .bind(profile.rating)
        .bind(profile.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_restaurant(
        &self,
        id: Uuid,
        profile: RestaurantProfile,
    ) -> RepositoryResult<Option<Restaurant>> {
        let row: Option<RestaurantRow> = sqlx::query_as(&format!(
            "UPDATE restaurants SET name = $2, description = $3, email = $4, phone = $5, \
             address = $6, city = $7, state = $8, country = $9, postal_code = $10, \
             cuisine = $11, rating = $12, is_active = $13, updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING {}",
            RESTAURANT_COLUMNS
        ))
        .bind(id)
        .bind(&profile.name)
        .bind(&profile.description)
        .bind(&profile.email)
        .bind(&profile.phone)
        .bind(&profile.address)
        .bind(&profile.city)
        .bind(&profile.state)
        .bind(&profile.country)
        .bind(&profile.postal_code)
        .bind(&profile.cuisine)
        .bind(profile.rating)
        .bind(profile.is_active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Restaurant::from))
    }

    async fn delete_restaurant(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query(
            "UPDATE restaurants SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_dish(&self, id: Uuid) -> RepositoryResult<Option<Dish>> {
        let row: Option<DishRow> = sqlx::query_as(&format!(
            "SELECT {} FROM dishes WHERE id = $1 AND deleted_at IS NULL",
            DISH_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Dish::from))
    }

    async fn list_dishes(&self, restaurant_id: Uuid) -> RepositoryResult<Vec<Dish>> {
        let rows: Vec<DishRow> = sqlx::query_as(&format!(
            "SELECT {} FROM dishes WHERE restaurant_id = $1 AND deleted_at IS NULL \
             ORDER BY created_at, id",
            DISH_COLUMNS
        ))
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Dish::from).collect())
    }

    async fn create_dish(&self, restaurant_id: Uuid, draft: DishDraft) -> RepositoryResult<Dish> {
        let row: DishRow = sqlx::query_as(&format!(
            "INSERT INTO dishes (id, restaurant_id, name, description, price, category, \
             image_url, is_available) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
            DISH_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(restaurant_id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(&draft.category)
        .bind(&draft.image_url)
        .bind(draft.is_available)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_dish(&self, dish: Dish) -> RepositoryResult<Option<Dish>> {
        let row: Option<DishRow> = sqlx::query_as(&format!(
            "UPDATE dishes SET name = $2, description = $3, price = $4, category = $5, \
             image_url = $6, is_available = $7, updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING {}",
            DISH_COLUMNS
        ))
        .bind(dish.id)
        .bind(&dish.name)
        .bind(&dish.description)
        .bind(dish.price)
        .bind(&dish.category)
        .bind(&dish.image_url)
        .bind(dish.is_available)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Dish::from))
    }

    async fn delete_dish(&self, id: Uuid) -> RepositoryResult<bool> {
        let result =
            sqlx::query("UPDATE dishes SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Orders
// ============================================================================

#[async_trait]
impl OrderRepository for PostgresStore {
    async fn create(&self, order: NewOrder) -> RepositoryResult<Order> {
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        let (created_at,): (DateTime<Utc>,) = sqlx::query_as(
            "INSERT INTO orders (id, user_id, restaurant_id, status, total_amount) \
             VALUES ($1, $2, $3, $4, $5) RETURNING created_at",
        )
        .bind(id)
        .bind(order.user_id)
        .bind(order.restaurant_id)
        .bind(order.status.as_str())
        .bind(order.total_amount)
        .fetch_one(&mut *tx)
        .await?;

        insert_items(&mut tx, id, &order.items).await?;
        tx.commit().await?;

        tracing::debug!(order_id = %id, item_count = order.items.len(), "Inserted order");
        Ok(order.into_order(id, created_at))
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<Order>> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {} FROM orders WHERE id = $1",
            ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.load_orders(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> RepositoryResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {} FROM orders WHERE user_id = $1 ORDER BY created_at, id",
            ORDER_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        self.load_orders(rows).await
    }

    async fn get_all(&self) -> RepositoryResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {} FROM orders ORDER BY created_at, id",
            ORDER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        self.load_orders(rows).await
    }

    async fn update(&self, mut order: Order) -> RepositoryResult<Option<Order>> {
        let mut tx = self.pool.begin().await?;

        let timestamps: Option<(DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
            "UPDATE orders SET user_id = $2, restaurant_id = $3, status = $4, \
             total_amount = $5, updated_at = now() WHERE id = $1 \
             RETURNING created_at, updated_at",
        )
        .bind(order.id)
        .bind(order.user_id)
        .bind(order.restaurant_id)
        .bind(order.status.as_str())
        .bind(order.total_amount)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((created_at, updated_at)) = timestamps else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(order.id)
            .execute(&mut *tx)
            .await?;
        insert_items(&mut tx, order.id, &order.items).await?;
        tx.commit().await?;

        order.created_at = created_at;
        order.updated_at = updated_at;

        tracing::debug!(order_id = %order.id, "Replaced order");
        Ok(Some(order))
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> RepositoryResult<bool> {
        let result = sqlx::query("UPDATE orders SET status = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Users
// ============================================================================

#[async_trait]
impl UserRepository for PostgresStore {
    async fn create(&self, user: NewUser) -> RepositoryResult<User> {
        let row: UserRow = sqlx::query_as(&format!(
            "INSERT INTO users (id, email, password_hash, name, phone, address, city, state, \
             country, postal_code) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.profile.name)
        .bind(&user.profile.phone)
        .bind(&user.profile.address)
        .bind(&user.profile.city)
        .bind(&user.profile.state)
        .bind(&user.profile.country)
        .bind(&user.profile.postal_code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &format!("users.email = {}", user.email)))?;

        Ok(row.into())
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(User::from))
    }

    async fn get_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(User::from))
    }

    async fn update(&self, user: User) -> RepositoryResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "UPDATE users SET email = $2, password_hash = $3, name = $4, phone = $5, \
             address = $6, city = $7, state = $8, country = $9, postal_code = $10, \
             updated_at = now() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.profile.name)
        .bind(&user.profile.phone)
        .bind(&user.profile.address)
        .bind(&user.profile.city)
        .bind(&user.profile.state)
        .bind(&user.profile.country)
        .bind(&user.profile.postal_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &format!("users.email = {}", user.email)))?;

        Ok(row.map(User::from))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
