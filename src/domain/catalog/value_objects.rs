use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Catalog Value Objects
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: Uuid,
    #[serde(flatten)]
    pub profile: RestaurantProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-editable restaurant fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub cuisine: String,
    #[serde(default)]
    pub rating: f32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Optional listing filters; `None` means "don't filter"
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RestaurantFilter {
    pub cuisine: Option<String>,
    pub is_active: Option<bool>,
    pub city: Option<String>,
}

impl RestaurantFilter {
    pub fn matches(&self, profile: &RestaurantProfile) -> bool {
        self.cuisine.as_ref().is_none_or(|c| &profile.cuisine == c)
            && self.is_active.is_none_or(|a| profile.is_active == a)
            && self.city.as_ref().is_none_or(|c| &profile.city == c)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a dish that has not been stored yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

impl DishDraft {
    pub fn into_dish(self, id: Uuid, restaurant_id: Uuid, now: DateTime<Utc>) -> Dish {
        Dish {
            id,
            restaurant_id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            image_url: self.image_url,
            is_available: self.is_available,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial dish update; absent fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DishPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
}

impl DishPatch {
    pub fn apply_to(self, dish: &mut Dish) {
        if let Some(name) = self.name {
            dish.name = name;
        }
        if let Some(description) = self.description {
            dish.description = description;
        }
        if let Some(price) = self.price {
            dish.price = price;
        }
        if let Some(category) = self.category {
            dish.category = category;
        }
        if let Some(image_url) = self.image_url {
            dish.image_url = Some(image_url);
        }
        if let Some(is_available) = self.is_available {
            dish.is_available = is_available;
        }
    }
}

fn default_true() -> bool {
    true
}
