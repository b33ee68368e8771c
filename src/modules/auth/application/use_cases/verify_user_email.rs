use async_trait::async_trait;
use chrono::Utc;

use crate::auth::application::ports::outgoing::user_query::UserQuery;
use crate::auth::application::ports::outgoing::user_repository::{UserRepository, UserResult};
use crate::auth::application::services::token_digest;

// ====================== Verify Email Error =============================
#[derive(Debug, Clone)]
pub enum VerifyEmailError {
    InvalidToken,
    TokenExpired,
    QueryError(String),
}

impl std::fmt::Display for VerifyEmailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifyEmailError::InvalidToken => write!(f, "Invalid or already used verification link"),
            VerifyEmailError::TokenExpired => write!(f, "Verification link has expired"),
            VerifyEmailError::QueryError(msg) => write!(f, "Query error: {}", msg),
        }
    }
}

impl std::error::Error for VerifyEmailError {}

// ====================== Verify Email Use Case ======================
#[async_trait]
pub trait IVerifyUserEmailUseCase: Send + Sync {
    async fn execute(&self, raw_token: &str) -> Result<UserResult, VerifyEmailError>;
}

pub struct VerifyUserEmailUseCase<Q, R>
where
    Q: UserQuery,
    R: UserRepository,
{
    query: Q,
    repository: R,
}

impl<Q, R> VerifyUserEmailUseCase<Q, R>
where
    Q: UserQuery,
    R: UserRepository,
{
    pub fn new(query: Q, repository: R) -> Self {
        Self { query, repository }
    }
}

#[async_trait]
impl<Q, R> IVerifyUserEmailUseCase for VerifyUserEmailUseCase<Q, R>
where
    Q: UserQuery,
    R: UserRepository,
{
    async fn execute(&self, raw_token: &str) -> Result<UserResult, VerifyEmailError> {
        // Lookup is by digest, so a stolen database dump never yields a
        // usable link. Activation clears the digest, which makes the link
        // single-use: a second click falls through to InvalidToken.
        let token_hash = token_digest::hash_token(raw_token);

        let user = self
            .query
            .find_by_verification_token_hash(&token_hash)
            .await
            .map_err(|e| VerifyEmailError::QueryError(e.to_string()))?
            .ok_or(VerifyEmailError::InvalidToken)?;

        match user.email_verification_expires_at {
            Some(expires_at) if expires_at > Utc::now() => {}
            _ => return Err(VerifyEmailError::TokenExpired),
        }

        self.repository
            .activate_user(user.id)
            .await
            .map_err(|e| VerifyEmailError::QueryError(e.to_string()))
    }
}
