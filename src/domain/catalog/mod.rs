// ============================================================================
// Catalog Domain - Restaurants and Dishes
// ============================================================================
//
// - Value objects (Restaurant, Dish, drafts, patches, filters)
// - Errors (CatalogError enum)
// - Service (CatalogService: field validation, then repository calls)
//
// The order domain reads the catalog directly through CatalogRepository;
// this service is only the write/admin surface.
//
// ============================================================================

pub mod value_objects;
pub mod errors;
pub mod service;

// Re-export for convenience
pub use value_objects::*;
pub use errors::*;
pub use service::*;
