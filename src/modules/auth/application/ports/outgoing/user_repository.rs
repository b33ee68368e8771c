use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::application::domain::entities::{AccountStatus, Role};

#[derive(Debug, Clone)]
pub struct CreateUserData {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub verification_token_hash: String,
    pub verification_expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UpdateProfileData {
    pub display_name: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct UserResult {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UserRepositoryError {
    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("Username is already taken")]
    DuplicateUsername,

    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Write-side port for user mutations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: CreateUserData) -> Result<UserResult, UserRepositoryError>;

    /// Flips status to active and clears the single-use verification token.
    async fn activate_user(&self, user_id: Uuid) -> Result<UserResult, UserRepositoryError>;

    async fn record_login_failure(
        &self,
        user_id: Uuid,
        attempts: i32,
        locked_until: Option<DateTime<Utc>>,
    ) -> Result<(), UserRepositoryError>;

    async fn reset_login_failures(&self, user_id: Uuid) -> Result<(), UserRepositoryError>;

    async fn set_reset_token(
        &self,
        user_id: Uuid,
        token_hash: String,
        expires_at: DateTime<Utc>,
    ) -> Result<(), UserRepositoryError>;

    async fn clear_reset_token(&self, user_id: Uuid) -> Result<(), UserRepositoryError>;

    /// Stores the new hash, stamps `password_changed_at`, clears the reset
    /// token and any lockout state.
    async fn update_password(
        &self,
        user_id: Uuid,
        new_password_hash: String,
        changed_at: DateTime<Utc>,
    ) -> Result<(), UserRepositoryError>;

    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: UpdateProfileData,
    ) -> Result<UserResult, UserRepositoryError>;

    /// Soft delete: overwrites identity fields with tombstone values and
    /// marks the row inactive. Recipes keep their author reference.
    async fn anonymize_user(
        &self,
        user_id: Uuid,
        tombstone_username: String,
        tombstone_email: String,
    ) -> Result<(), UserRepositoryError>;
}
