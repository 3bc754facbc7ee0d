use uuid::Uuid;

use crate::domain::ErrorKind;
use crate::repository::RepositoryError;
use super::value_objects::OrderStatus;

// ============================================================================
// Order Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(Uuid),

    #[error("Dish not found: {0}")]
    DishNotFound(Uuid),

    #[error("Order not found: {0}")]
    OrderNotFound(Uuid),

    #[error("Dish {dish_id} does not belong to restaurant {restaurant_id}")]
    MismatchedRestaurant { dish_id: Uuid, restaurant_id: Uuid },

    #[error("Dish is not available: {0}")]
    UnavailableDish(Uuid),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    #[error("Cannot delete order in current status: {0}")]
    DeleteNotAllowed(OrderStatus),

    #[error("Order items cannot be empty")]
    EmptyItems,

    #[error("Invalid item quantity: {0}")]
    InvalidQuantity(i32),

    #[error("Order total exceeds the maximum amount of {}", crate::domain::MAX_AMOUNT)]
    TotalOutOfRange,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl OrderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::RestaurantNotFound(_)
            | OrderError::DishNotFound(_)
            | OrderError::OrderNotFound(_) => ErrorKind::NotFound,
            OrderError::MismatchedRestaurant { .. }
            | OrderError::UnavailableDish(_)
            | OrderError::InvalidStatusTransition { .. }
            | OrderError::DeleteNotAllowed(_)
            | OrderError::EmptyItems
            | OrderError::InvalidQuantity(_)
            | OrderError::TotalOutOfRange => ErrorKind::Validation,
            OrderError::Repository(_) => ErrorKind::Repository,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let id = Uuid::new_v4();

        assert_eq!(OrderError::RestaurantNotFound(id).kind(), ErrorKind::NotFound);
        assert_eq!(OrderError::DishNotFound(id).kind(), ErrorKind::NotFound);
        assert_eq!(OrderError::OrderNotFound(id).kind(), ErrorKind::NotFound);
        assert_eq!(OrderError::UnavailableDish(id).kind(), ErrorKind::Validation);
        assert_eq!(
            OrderError::InvalidStatusTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Ready,
            }
            .kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            OrderError::DeleteNotAllowed(OrderStatus::Delivered).kind(),
            ErrorKind::Validation
        );
        assert_eq!(OrderError::TotalOutOfRange.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_repository_error_keeps_cause() {
        let err: OrderError = RepositoryError::Unavailable("connection reset".into()).into();

        assert_eq!(err.kind(), ErrorKind::Repository);
        assert!(err.to_string().contains("connection reset"));
        assert!(matches!(err, OrderError::Repository(RepositoryError::Unavailable(_))));
    }

    #[test]
    fn test_transition_message_names_both_statuses() {
        let err = OrderError::InvalidStatusTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Ready,
        };

        assert_eq!(err.to_string(), "Invalid status transition from PENDING to READY");
    }
}
