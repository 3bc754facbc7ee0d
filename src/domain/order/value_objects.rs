use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Order Value Objects
// ============================================================================

/// Lifecycle status of an order. Wire values are the SCREAMING_CASE names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

// ============================================================================
// Status State Machine
// ============================================================================
//
// The only legal status mutations. Anything not listed here (self
// transitions, skipped stages, moving backwards, leaving a terminal state)
// is rejected.
//
// ============================================================================

const TRANSITIONS: [(OrderStatus, &[OrderStatus]); 6] = [
    (OrderStatus::Pending, &[OrderStatus::Confirmed, OrderStatus::Cancelled]),
    (OrderStatus::Confirmed, &[OrderStatus::Preparing]),
    (OrderStatus::Preparing, &[OrderStatus::Ready]),
    (OrderStatus::Ready, &[OrderStatus::Delivered]),
    (OrderStatus::Delivered, &[]),
    (OrderStatus::Cancelled, &[]),
];

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Statuses reachable from `self` in one step
    pub fn allowed_transitions(&self) -> &'static [OrderStatus] {
        TRANSITIONS
            .iter()
            .find(|(from, _)| from == self)
            .map(|(_, next)| *next)
            .unwrap_or(&[])
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Orders may only be removed before confirmation or after cancellation
    pub fn is_deletable(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown order status: {0}")]
pub struct ParseOrderStatusError(pub String);

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseOrderStatusError(s.to_string()))
    }
}

/// Caller-supplied line item. Carries no price: prices always come from
/// the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemDraft {
    pub dish_id: Uuid,
    pub quantity: i32,
}

/// Persisted line item with the dish price captured at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub dish_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
}

impl OrderItem {
    /// `None` when price times quantity overflows
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

impl From<&OrderItem> for OrderItemDraft {
    fn from(item: &OrderItem) -> Self {
        Self {
            dish_id: item.dish_id,
            quantity: item.quantity,
        }
    }
}

/// Order data prior to server-side validation and pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub items: Vec<OrderItemDraft>,
}

// ============================================================================
// Unit Tests
// ============================================================================
