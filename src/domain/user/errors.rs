use uuid::Uuid;

use crate::domain::ErrorKind;
use crate::repository::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("user with this email already exists")]
    EmailTaken,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("current password is incorrect")]
    IncorrectPassword,

    #[error("user {0} is required")]
    MissingField(&'static str),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token generation failed: {0}")]
    Token(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl UserError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UserError::UserNotFound(_) => ErrorKind::NotFound,
            UserError::EmailTaken => ErrorKind::Conflict,
            UserError::InvalidCredentials | UserError::IncorrectPassword => ErrorKind::Unauthorized,
            UserError::MissingField(_) => ErrorKind::Validation,
            UserError::Hashing(_) | UserError::Token(_) => ErrorKind::Internal,
            UserError::Repository(_) => ErrorKind::Repository,
        }
    }
}
