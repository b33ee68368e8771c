use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::{Deserialize, Deserializer};

use crate::auth::application::ports::outgoing::user_query::UserQuery;
use crate::auth::application::ports::outgoing::user_repository::UserRepository;
use crate::auth::application::services::token_digest;
use crate::email::application::ports::outgoing::user_email_notifier::{
    PasswordResetEmail, UserEmailNotifier,
};
use email_address::EmailAddress;

/// Reset links stay valid for one hour.
const RESET_TOKEN_TTL_MINUTES: i64 = 60;

// ========================= Forgot Password Request =========================
#[derive(Debug, Clone)]
pub struct ForgotPasswordRequest {
    email: String,
}

#[derive(Debug, Clone)]
pub enum ForgotPasswordRequestError {
    EmptyEmail,
    InvalidEmailFormat,
}

impl std::fmt::Display for ForgotPasswordRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForgotPasswordRequestError::EmptyEmail => write!(f, "Email cannot be empty"),
            ForgotPasswordRequestError::InvalidEmailFormat => write!(f, "Invalid email format"),
        }
    }
}

impl std::error::Error for ForgotPasswordRequestError {}

impl ForgotPasswordRequest {
    pub fn new(email: String) -> Result<Self, ForgotPasswordRequestError> {
        let email = email.trim().to_lowercase();

        if email.is_empty() {
            return Err(ForgotPasswordRequestError::EmptyEmail);
        }
        if !EmailAddress::is_valid(&email) {
            return Err(ForgotPasswordRequestError::InvalidEmailFormat);
        }

        Ok(Self { email })
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl<'de> Deserialize<'de> for ForgotPasswordRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ForgotPasswordRequestHelper {
            email: String,
        }

        let helper = ForgotPasswordRequestHelper::deserialize(deserializer)?;
        ForgotPasswordRequest::new(helper.email).map_err(serde::de::Error::custom)
    }
}

// ====================== Forgot Password Error =============================
#[derive(Debug, Clone)]
pub enum ForgotPasswordError {
    EmailSendFailed(String),
    QueryError(String),
}

impl std::fmt::Display for ForgotPasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForgotPasswordError::EmailSendFailed(msg) => {
                write!(f, "Email sending failed: {}", msg)
            }
            ForgotPasswordError::QueryError(msg) => write!(f, "Query error: {}", msg),
        }
    }
}

impl std::error::Error for ForgotPasswordError {}

// ====================== Forgot Password Use Case ======================
/// Always resolves without revealing whether the email is registered.
/// Unlike verification mail, the reset mail is sent inline: the stored
/// token is rolled back if sending fails, so a user never ends up with
/// an active reset token they were never told about.
#[async_trait]
pub trait IForgotPasswordUseCase: Send + Sync {
    async fn execute(&self, request: ForgotPasswordRequest) -> Result<(), ForgotPasswordError>;
}

pub struct ForgotPasswordUseCase<Q, R>
where
    Q: UserQuery,
    R: UserRepository,
{
    query: Q,
    repository: R,
    notifier: Arc<dyn UserEmailNotifier>,
}

impl<Q, R> ForgotPasswordUseCase<Q, R>
where
    Q: UserQuery,
    R: UserRepository,
{
    pub fn new(query: Q, repository: R, notifier: Arc<dyn UserEmailNotifier>) -> Self {
        Self {
            query,
            repository,
            notifier,
        }
    }
}

#[async_trait]
impl<Q, R> IForgotPasswordUseCase for ForgotPasswordUseCase<Q, R>
where
    Q: UserQuery,
    R: UserRepository,
{
    async fn execute(&self, request: ForgotPasswordRequest) -> Result<(), ForgotPasswordError> {
        let user = match self
            .query
            .find_by_email(request.email())
            .await
            .map_err(|e| ForgotPasswordError::QueryError(e.to_string()))?
        {
            Some(user) if !user.is_deleted => user,
            // Unknown or tombstoned address: same outward behavior.
            _ => return Ok(()),
        };

        let raw_token = token_digest::generate_token();
        let token_hash = token_digest::hash_token(&raw_token);
        let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);

        self.repository
            .set_reset_token(user.id, token_hash, expires_at)
            .await
            .map_err(|e| ForgotPasswordError::QueryError(e.to_string()))?;

        let send_result = self
            .notifier
            .send_password_reset_email(PasswordResetEmail {
                to: user.email.clone(),
                username: user.username.clone(),
                token: raw_token,
            })
            .await;

        if let Err(e) = send_result {
            tracing::error!("Password reset email failed for user {}: {}", user.id, e);
            self.repository
                .clear_reset_token(user.id)
                .await
                .map_err(|e| ForgotPasswordError::QueryError(e.to_string()))?;
            return Err(ForgotPasswordError::EmailSendFailed(e.to_string()));
        }

        Ok(())
    }
}
