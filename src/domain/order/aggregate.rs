use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::OrderError;
use super::value_objects::{OrderItem, OrderStatus};
use crate::domain::MAX_AMOUNT;

// ============================================================================
// Order Aggregate
// ============================================================================
//
// Invariant: total_amount == sum(item.price * item.quantity) and never
// exceeds MAX_AMOUNT. Every constructor and every item replacement goes
// through `total_of`.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    // Identity (assigned by the repository)
    pub id: Uuid,

    // References, not owned by the order
    pub user_id: Uuid,
    pub restaurant_id: Uuid,

    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub items: Vec<OrderItem>,

    // Audit Trail
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Replace the line items and recompute the total. On error the order
    /// is left unchanged.
    pub fn set_items(&mut self, items: Vec<OrderItem>) -> Result<(), OrderError> {
        self.total_amount = total_of(&items)?;
        self.items = items;
        Ok(())
    }

    pub fn has_consistent_total(&self) -> bool {
        matches!(total_of(&self.items), Ok(total) if total == self.total_amount)
    }
}

/// A validated, priced order that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub items: Vec<OrderItem>,
}

impl NewOrder {
    /// Every new order starts out pending
    pub fn pending(
        user_id: Uuid,
        restaurant_id: Uuid,
        items: Vec<OrderItem>,
    ) -> Result<Self, OrderError> {
        Ok(Self {
            user_id,
            restaurant_id,
            status: OrderStatus::Pending,
            total_amount: total_of(&items)?,
            items,
        })
    }

    /// Materialize with repository-assigned identity and timestamps
    pub fn into_order(self, id: Uuid, now: DateTime<Utc>) -> Order {
        Order {
            id,
            user_id: self.user_id,
            restaurant_id: self.restaurant_id,
            status: self.status,
            total_amount: self.total_amount,
            items: self.items,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Sum of line totals, bounded by what the orders table can store
pub fn total_of(items: &[OrderItem]) -> Result<Decimal, OrderError> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |total, item| {
            item.line_total().and_then(|line| total.checked_add(line))
        })
        .filter(|total| *total <= MAX_AMOUNT)
        .ok_or(OrderError::TotalOutOfRange)
}

// ============================================================================
// Unit Tests
// ============================================================================
