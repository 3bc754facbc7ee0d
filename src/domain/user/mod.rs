// ============================================================================
// User Domain - Accounts and Credentials
// ============================================================================
//
// - Value objects (User, UserProfile, Registration, AuthenticatedSession)
// - Errors (UserError enum)
// - Service (UserService: register, login, profile, password, delete)
//
// ============================================================================

pub mod value_objects;
pub mod errors;
pub mod service;

// Re-export for convenience
pub use value_objects::*;
pub use errors::*;
pub use service::*;
