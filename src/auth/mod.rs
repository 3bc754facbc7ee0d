// ============================================================================
// Authentication - tokens, password hashing, request extraction
// ============================================================================
//
// The order engine performs no authorization. This module is what the
// transport layer uses to establish who is calling before it invokes any
// service:
// - JwtService        - issue/validate HS256 access tokens
// - password          - argon2 hashing and verification
// - AuthenticatedUser - actix extractor for `Authorization: Bearer <token>`
//
// ============================================================================

mod extractor;
mod jwt;
pub mod password;

pub use extractor::AuthenticatedUser;
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
