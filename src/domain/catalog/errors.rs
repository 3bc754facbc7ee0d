use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::ErrorKind;
use crate::repository::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(Uuid),

    #[error("Dish not found: {0}")]
    DishNotFound(Uuid),

    #[error("{entity} {field} is required")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("Restaurant rating must be between 0 and 5, got {0}")]
    InvalidRating(f32),

    #[error("Dish price cannot be negative: {0}")]
    NegativePrice(Decimal),

    #[error("Dish price exceeds the maximum amount of {max}: {0}", max = crate::domain::MAX_AMOUNT)]
    PriceTooLarge(Decimal),

    #[error("Dish price cannot have more than {scale} decimal places: {0}", scale = crate::domain::AMOUNT_SCALE)]
    PriceTooPrecise(Decimal),

    #[error("dish does not belong to the specified restaurant")]
    DishRestaurantMismatch,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::RestaurantNotFound(_) | CatalogError::DishNotFound(_) => {
                ErrorKind::NotFound
            }
            CatalogError::MissingField { .. }
            | CatalogError::InvalidRating(_)
            | CatalogError::NegativePrice(_)
            | CatalogError::PriceTooLarge(_)
            | CatalogError::PriceTooPrecise(_)
            | CatalogError::DishRestaurantMismatch => ErrorKind::Validation,
            CatalogError::Repository(_) => ErrorKind::Repository,
        }
    }
}
