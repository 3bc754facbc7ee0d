use std::sync::Arc;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::JwtService;
use crate::repository::{RepositoryError, UserRepository};

use super::errors::UserError;
use super::value_objects::{AuthenticatedSession, NewUser, Registration, User, UserProfile};

pub type UserResult<T> = Result<T, UserError>;

/// Account management. E-mail addresses are stored trimmed and lowercased.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    jwt: Arc<JwtService>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: Arc<JwtService>) -> Self {
        Self { users, jwt }
    }

    pub async fn register(&self, registration: Registration) -> UserResult<AuthenticatedSession> {
        let email = normalize_email(&registration.email);
        if email.is_empty() {
            return Err(UserError::MissingField("email"));
        }
        if registration.profile.name.trim().is_empty() {
            return Err(UserError::MissingField("name"));
        }
        if self.users.get_by_email(&email).await?.is_some() {
            return Err(UserError::EmailTaken);
        }

        let password_hash =
            hash_password(&registration.password).map_err(|e| UserError::Hashing(e.to_string()))?;

        let user = self
            .users
            .create(NewUser {
                email,
                password_hash,
                profile: registration.profile,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::UniqueViolation(_) => UserError::EmailTaken,
                other => UserError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "👤 User registered");
        self.session(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> UserResult<AuthenticatedSession> {
        let user = self
            .users
            .get_by_email(&normalize_email(email))
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            tracing::warn!(user_id = %user.id, "Login rejected");
            return Err(UserError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User logged in");
        self.session(user)
    }

    pub async fn get_user(&self, id: Uuid) -> UserResult<User> {
        self.users
            .get_by_id(id)
            .await?
            .ok_or(UserError::UserNotFound(id))
    }

    /// Replace contact details; e-mail and password are not touched
    pub async fn update_profile(&self, id: Uuid, profile: UserProfile) -> UserResult<User> {
        if profile.name.trim().is_empty() {
            return Err(UserError::MissingField("name"));
        }

        let mut user = self.get_user(id).await?;
        user.profile = profile;

        let user = self
            .users
            .update(user)
            .await?
            .ok_or(UserError::UserNotFound(id))?;
        tracing::info!(user_id = %id, "User profile updated");

        Ok(user)
    }

    pub async fn change_password(&self, id: Uuid, current: &str, new: &str) -> UserResult<()> {
        let mut user = self.get_user(id).await?;

        if !verify_password(current, &user.password_hash) {
            tracing::warn!(user_id = %id, "Password change rejected");
            return Err(UserError::IncorrectPassword);
        }

        user.password_hash = hash_password(new).map_err(|e| UserError::Hashing(e.to_string()))?;
        self.users
            .update(user)
            .await?
            .ok_or(UserError::UserNotFound(id))?;

        tracing::info!(user_id = %id, "🔑 Password changed");
        Ok(())
    }

    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        if !self.users.delete(id).await? {
            return Err(UserError::UserNotFound(id));
        }
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    fn session(&self, user: User) -> UserResult<AuthenticatedSession> {
        let token = self
            .jwt
            .generate_token(user.id, &user.email)
            .map_err(|e| UserError::Token(e.to_string()))?;

        Ok(AuthenticatedSession { user, token })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
