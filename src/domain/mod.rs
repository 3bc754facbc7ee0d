// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Each domain has its own subdirectory with:
// - Value objects
// - Errors
// - Aggregate / entity implementation
// - Service (validates, then persists through a repository)
//
// The order domain is the core: pricing, catalog cross-checks and the
// status state machine. Catalog and user domains are plain CRUD with
// field validation.
//
// ============================================================================

pub mod catalog;
pub mod order;
pub mod user;

use rust_decimal::Decimal;
use std::fmt;

/// Largest amount a `NUMERIC(12, 2)` column holds (9999999999.99)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Decimal places kept for every stored amount
pub const AMOUNT_SCALE: u32 = 2;

/// Structured error category shared by all domain errors.
///
/// Callers branch on the kind instead of parsing messages; the transport
/// layer maps each kind to a response class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced record does not exist
    NotFound,
    /// A business rule was violated
    Validation,
    /// The record clashes with an existing one (e.g. duplicate e-mail)
    Conflict,
    /// Credentials were rejected
    Unauthorized,
    /// The storage layer failed
    Repository,
    /// Any other server-side failure (hashing, token signing)
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Validation => "validation",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Repository => "repository",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
