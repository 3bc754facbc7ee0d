use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::domain::ErrorKind;
use crate::metrics::Metrics;
use crate::repository::{CatalogRepository, OrderRepository};

use super::aggregate::{NewOrder, Order};
use super::errors::OrderError;
use super::value_objects::{OrderDraft, OrderItem, OrderItemDraft, OrderStatus};

// ============================================================================
// Order Service (Order Engine)
// ============================================================================
//
// Orchestrates: Draft → Catalog checks → Pricing → Order Repository
//
// Every operation validates completely before its single repository write.
// Item prices are always taken from the catalog, on create AND on update:
// a full update re-prices every line at the current dish price, so a
// catalog price change alters the total of any order updated afterwards.
//
// Authorization is the caller's job; user and restaurant ids are trusted.
//
// ============================================================================

pub type OrderResult<T> = Result<T, OrderError>;

pub struct OrderService {
    catalog: Arc<dyn CatalogRepository>,
    orders: Arc<dyn OrderRepository>,
    metrics: Option<Arc<Metrics>>,
}

impl OrderService {
    pub fn new(catalog: Arc<dyn CatalogRepository>, orders: Arc<dyn OrderRepository>) -> Self {
        Self {
            catalog,
            orders,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Stored order without catalog details
    pub async fn get_order(&self, id: Uuid) -> OrderResult<Order> {
        self.load(id).await
    }

    /// Validate, price and persist a new PENDING order
    pub async fn create_order(&self, draft: OrderDraft) -> OrderResult<Order> {
        let started = Instant::now();
        let result = self.try_create_order(draft).await;
        self.observe("create_order", started, &result);
        result
    }

    /// Full replace of an existing order, re-validated and re-priced
    pub async fn update_order(&self, order: Order) -> OrderResult<Order> {
        let started = Instant::now();
        let result = self.try_update_order(order).await;
        self.observe("update_order", started, &result);
        result
    }

    /// Move an order along the status state machine
    pub async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> OrderResult<()> {
        let started = Instant::now();
        let result = self.try_update_order_status(id, status).await;
        self.observe("update_order_status", started, &result);
        result
    }

    /// Remove a PENDING or CANCELLED order
    pub async fn delete_order(&self, id: Uuid) -> OrderResult<()> {
        let started = Instant::now();
        let result = self.try_delete_order(id).await;
        self.observe("delete_order", started, &result);
        result
    }

    async fn try_create_order(&self, draft: OrderDraft) -> OrderResult<Order> {
        let items = self.price_items(draft.restaurant_id, &draft.items).await?;
        let new_order = NewOrder::pending(draft.user_id, draft.restaurant_id, items)?;

        let order = self.orders.create(new_order).await?;

        if let Some(metrics) = &self.metrics {
            metrics.orders_created.inc();
        }
        tracing::info!(
            order_id = %order.id,
            user_id = %order.user_id,
            restaurant_id = %order.restaurant_id,
            total_amount = %order.total_amount,
            "✅ Order created"
        );

        Ok(order)
    }

    async fn try_update_order(&self, mut order: Order) -> OrderResult<Order> {
        let current = self.load(order.id).await?;

        let drafts: Vec<OrderItemDraft> = order.items.iter().map(OrderItemDraft::from).collect();
        let items = self.price_items(order.restaurant_id, &drafts).await?;

        let status_changed = order.status != current.status;
        if status_changed {
            ensure_transition(current.status, order.status)?;
        }

        order.set_items(items)?;

        let updated = self
            .orders
            .update(order)
            .await?
            .ok_or(OrderError::OrderNotFound(current.id))?;

        if status_changed {
            self.record_transition(current.status, updated.status);
        }
        tracing::info!(
            order_id = %updated.id,
            status = %updated.status,
            total_amount = %updated.total_amount,
            "Order updated"
        );

        Ok(updated)
    }

    async fn try_update_order_status(&self, id: Uuid, status: OrderStatus) -> OrderResult<()> {
        let current = self.load(id).await?;
        ensure_transition(current.status, status)?;

        if !self.orders.update_status(id, status).await? {
            return Err(OrderError::OrderNotFound(id));
        }

        self.record_transition(current.status, status);
        tracing::info!(order_id = %id, from = %current.status, to = %status, "Order status changed");

        Ok(())
    }

    async fn try_delete_order(&self, id: Uuid) -> OrderResult<()> {
        let current = self.load(id).await?;

        if !current.status.is_deletable() {
            return Err(OrderError::DeleteNotAllowed(current.status));
        }

        if !self.orders.delete(id).await? {
            return Err(OrderError::OrderNotFound(id));
        }

        if let Some(metrics) = &self.metrics {
            metrics.orders_deleted.inc();
        }
        tracing::info!(order_id = %id, status = %current.status, "🗑️ Order deleted");

        Ok(())
    }

    async fn load(&self, id: Uuid) -> OrderResult<Order> {
        self.orders
            .get_by_id(id)
            .await?
            .ok_or(OrderError::OrderNotFound(id))
    }

    /// Check the restaurant and every dish, then snapshot current prices.
    ///
    /// Checks run in item order and stop at the first failure.
    async fn price_items(
        &self,
        restaurant_id: Uuid,
        drafts: &[OrderItemDraft],
    ) -> OrderResult<Vec<OrderItem>> {
        if drafts.is_empty() {
            return Err(OrderError::EmptyItems);
        }
        if let Some(bad) = drafts.iter().find(|item| item.quantity <= 0) {
            return Err(OrderError::InvalidQuantity(bad.quantity));
        }

        self.catalog
            .get_restaurant(restaurant_id)
            .await?
            .ok_or(OrderError::RestaurantNotFound(restaurant_id))?;

        let mut items = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let dish = self
                .catalog
                .get_dish(draft.dish_id)
                .await?
                .ok_or(OrderError::DishNotFound(draft.dish_id))?;

            if dish.restaurant_id != restaurant_id {
                return Err(OrderError::MismatchedRestaurant {
                    dish_id: dish.id,
                    restaurant_id,
                });
            }
            if !dish.is_available {
                return Err(OrderError::UnavailableDish(dish.id));
            }

            items.push(OrderItem {
                dish_id: dish.id,
                quantity: draft.quantity,
                price: dish.price,
            });
        }

        Ok(items)
    }

    fn record_transition(&self, from: OrderStatus, to: OrderStatus) {
        if let Some(metrics) = &self.metrics {
            metrics.record_transition(from.as_str(), to.as_str());
        }
    }

    fn observe<T>(&self, operation: &str, started: Instant, result: &OrderResult<T>) {
        if let Err(e) = result {
            match e.kind() {
                ErrorKind::Repository => {
                    tracing::error!(operation, error = %e, "Order operation failed")
                }
                kind => tracing::warn!(operation, kind = %kind, reason = %e, "Order operation rejected"),
            }
        }

        if let Some(metrics) = &self.metrics {
            let failure = result.as_ref().err().map(|e| e.kind().as_str());
            metrics.record_operation(operation, started.elapsed().as_secs_f64(), failure);
        }
    }
}

fn ensure_transition(from: OrderStatus, to: OrderStatus) -> OrderResult<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(OrderError::InvalidStatusTransition { from, to })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
