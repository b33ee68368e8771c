use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Deserializer};

use crate::auth::application::ports::outgoing::password_hasher::PasswordHasher;
use crate::auth::application::ports::outgoing::user_query::UserQuery;
use crate::auth::application::ports::outgoing::user_repository::UserRepository;
use crate::auth::application::services::password_policy::{PasswordPolicy, PasswordPolicyError};
use crate::auth::application::services::token_digest;

// ========================= Reset Password Request =========================
#[derive(Debug, Clone)]
pub struct ResetPasswordRequest {
    password: String,
}

#[derive(Debug, Clone)]
pub enum ResetPasswordRequestError {
    WeakPassword(PasswordPolicyError),
}

impl std::fmt::Display for ResetPasswordRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResetPasswordRequestError::WeakPassword(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ResetPasswordRequestError {}

impl ResetPasswordRequest {
    pub fn new(password: String) -> Result<Self, ResetPasswordRequestError> {
        PasswordPolicy::validate(&password).map_err(ResetPasswordRequestError::WeakPassword)?;
        Ok(Self { password })
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl<'de> Deserialize<'de> for ResetPasswordRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ResetPasswordRequestHelper {
            password: String,
        }

        let helper = ResetPasswordRequestHelper::deserialize(deserializer)?;
        ResetPasswordRequest::new(helper.password).map_err(serde::de::Error::custom)
    }
}

// ====================== Reset Password Error =============================
#[derive(Debug, Clone)]
pub enum ResetPasswordError {
    InvalidToken,
    TokenExpired,
    HashingFailed(String),
    QueryError(String),
}

impl std::fmt::Display for ResetPasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResetPasswordError::InvalidToken => write!(f, "Invalid or already used reset link"),
            ResetPasswordError::TokenExpired => write!(f, "Reset link has expired"),
            ResetPasswordError::HashingFailed(msg) => {
                write!(f, "Password hashing failed: {}", msg)
            }
            ResetPasswordError::QueryError(msg) => write!(f, "Query error: {}", msg),
        }
    }
}

impl std::error::Error for ResetPasswordError {}

// ====================== Reset Password Use Case ======================
#[async_trait]
pub trait IResetPasswordUseCase: Send + Sync {
    async fn execute(
        &self,
        raw_token: &str,
        request: ResetPasswordRequest,
    ) -> Result<(), ResetPasswordError>;
}

pub struct ResetPasswordUseCase<Q, R, H>
where
    Q: UserQuery,
    R: UserRepository,
    H: PasswordHasher,
{
    query: Q,
    repository: R,
    hasher: H,
}

impl<Q, R, H> ResetPasswordUseCase<Q, R, H>
where
    Q: UserQuery,
    R: UserRepository,
    H: PasswordHasher,
{
    pub fn new(query: Q, repository: R, hasher: H) -> Self {
        Self {
            query,
            repository,
            hasher,
        }
    }
}

#[async_trait]
impl<Q, R, H> IResetPasswordUseCase for ResetPasswordUseCase<Q, R, H>
where
    Q: UserQuery,
    R: UserRepository,
    H: PasswordHasher,
{
    async fn execute(
        &self,
        raw_token: &str,
        request: ResetPasswordRequest,
    ) -> Result<(), ResetPasswordError> {
        let token_hash = token_digest::hash_token(raw_token);

        let user = self
            .query
            .find_by_reset_token_hash(&token_hash)
            .await
            .map_err(|e| ResetPasswordError::QueryError(e.to_string()))?
            .ok_or(ResetPasswordError::InvalidToken)?;

        match user.password_reset_expires_at {
            Some(expires_at) if expires_at > Utc::now() => {}
            _ => return Err(ResetPasswordError::TokenExpired),
        }

        let new_hash = self
            .hasher
            .hash_password(request.password())
            .await
            .map_err(|e| ResetPasswordError::HashingFailed(e.to_string()))?;

        // Stamping password_changed_at invalidates every token issued before
        // now; update_password also clears the reset token and any lockout.
        self.repository
            .update_password(user.id, new_hash, Utc::now())
            .await
            .map_err(|e| ResetPasswordError::QueryError(e.to_string()))
    }
}
