// ============================================================================
// Order Domain - Business Logic for Orders
// ============================================================================
//
// This module contains ALL Order-specific code:
// - Value objects (OrderStatus, OrderItem, OrderDraft)
// - Errors (OrderError enum)
// - Aggregate (Order, NewOrder, total computation)
// - Service (OrderService: create, update, status change, delete)
// - Queries (OrderQueries: orders joined with restaurant, dishes, user)
//
// ============================================================================

pub mod value_objects;
pub mod errors;
pub mod aggregate;
pub mod service;
pub mod queries;

// Re-export for convenience
pub use value_objects::*;
pub use errors::*;
pub use aggregate::*;
pub use service::*;
pub use queries::*;
