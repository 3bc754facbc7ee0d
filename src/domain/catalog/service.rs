use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{AMOUNT_SCALE, MAX_AMOUNT};
use crate::repository::CatalogRepository;

use super::errors::CatalogError;
use super::value_objects::{Dish, DishDraft, DishPatch, Restaurant, RestaurantFilter, RestaurantProfile};

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Restaurant and dish management with field validation
pub struct CatalogService {
    catalog: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    pub async fn create_restaurant(&self, profile: RestaurantProfile) -> CatalogResult<Restaurant> {
        validate_restaurant(&profile)?;

        let restaurant = self.catalog.create_restaurant(profile).await?;
        tracing::info!(restaurant_id = %restaurant.id, name = %restaurant.profile.name, "Restaurant created");

        Ok(restaurant)
    }

    pub async fn get_restaurant(&self, id: Uuid) -> CatalogResult<Restaurant> {
        self.catalog
            .get_restaurant(id)
            .await?
            .ok_or(CatalogError::RestaurantNotFound(id))
    }

    pub async fn list_restaurants(&self, filter: &RestaurantFilter) -> CatalogResult<Vec<Restaurant>> {
        Ok(self.catalog.list_restaurants(filter).await?)
    }

    pub async fn update_restaurant(
        &self,
        id: Uuid,
        profile: RestaurantProfile,
    ) -> CatalogResult<Restaurant> {
        validate_restaurant(&profile)?;

        let restaurant = self
            .catalog
            .update_restaurant(id, profile)
            .await?
            .ok_or(CatalogError::RestaurantNotFound(id))?;
        tracing::info!(restaurant_id = %id, "Restaurant updated");

        Ok(restaurant)
    }

    pub async fn delete_restaurant(&self, id: Uuid) -> CatalogResult<()> {
        if !self.catalog.delete_restaurant(id).await? {
            return Err(CatalogError::RestaurantNotFound(id));
        }
        tracing::info!(restaurant_id = %id, "Restaurant deleted");
        Ok(())
    }

    pub async fn create_dish(&self, restaurant_id: Uuid, draft: DishDraft) -> CatalogResult<Dish> {
        require("dish", "name", &draft.name)?;
        validate_price(draft.price)?;
        self.get_restaurant(restaurant_id).await?;

        let dish = self.catalog.create_dish(restaurant_id, draft).await?;
        tracing::info!(dish_id = %dish.id, restaurant_id = %restaurant_id, price = %dish.price, "Dish created");

        Ok(dish)
    }

    pub async fn get_dish(&self, id: Uuid) -> CatalogResult<Dish> {
        self.catalog
            .get_dish(id)
            .await?
            .ok_or(CatalogError::DishNotFound(id))
    }

    pub async fn list_dishes(&self, restaurant_id: Uuid) -> CatalogResult<Vec<Dish>> {
        self.get_restaurant(restaurant_id).await?;
        Ok(self.catalog.list_dishes(restaurant_id).await?)
    }

    /// Apply `patch` to a dish of `restaurant_id`; absent fields are kept
    pub async fn update_dish(
        &self,
        restaurant_id: Uuid,
        dish_id: Uuid,
        patch: DishPatch,
    ) -> CatalogResult<Dish> {
        if let Some(name) = &patch.name {
            require("dish", "name", name)?;
        }
        if let Some(price) = patch.price {
            validate_price(price)?;
        }

        let mut dish = self.get_dish(dish_id).await?;
        if dish.restaurant_id != restaurant_id {
            return Err(CatalogError::DishRestaurantMismatch);
        }

        patch.apply_to(&mut dish);

        let dish = self
            .catalog
            .update_dish(dish)
            .await?
            .ok_or(CatalogError::DishNotFound(dish_id))?;
        tracing::info!(dish_id = %dish_id, price = %dish.price, available = dish.is_available, "Dish updated");

        Ok(dish)
    }

    pub async fn delete_dish(&self, id: Uuid) -> CatalogResult<()> {
        if !self.catalog.delete_dish(id).await? {
            return Err(CatalogError::DishNotFound(id));
        }
        tracing::info!(dish_id = %id, "Dish deleted");
        Ok(())
    }
}

fn require(entity: &'static str, field: &'static str, value: &str) -> CatalogResult<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::MissingField { entity, field });
    }
    Ok(())
}

fn validate_restaurant(profile: &RestaurantProfile) -> CatalogResult<()> {
    let required = [
        ("name", &profile.name),
        ("email", &profile.email),
        ("phone", &profile.phone),
        ("address", &profile.address),
        ("city", &profile.city),
        ("state", &profile.state),
        ("country", &profile.country),
        ("postal_code", &profile.postal_code),
        ("cuisine", &profile.cuisine),
    ];
    for (field, value) in required {
        require("restaurant", field, value)?;
    }

    if !(0.0..=5.0).contains(&profile.rating) {
        return Err(CatalogError::InvalidRating(profile.rating));
    }

    Ok(())
}

/// Prices must fit the `NUMERIC(12, 2)` price column exactly
fn validate_price(price: Decimal) -> CatalogResult<()> {
    if price < Decimal::ZERO {
        return Err(CatalogError::NegativePrice(price));
    }
    if price > MAX_AMOUNT {
        return Err(CatalogError::PriceTooLarge(price));
    }
    if price.normalize().scale() > AMOUNT_SCALE {
        return Err(CatalogError::PriceTooPrecise(price));
    }
    Ok(())
}
