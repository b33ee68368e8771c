use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::auth::application::domain::entities::{AccountStatus, Role};
use crate::auth::application::ports::outgoing::password_hasher::PasswordHasher;
use crate::auth::application::ports::outgoing::token_provider::TokenProvider;
use crate::auth::application::ports::outgoing::user_query::UserQuery;
use crate::auth::application::ports::outgoing::user_repository::UserRepository;
use email_address::EmailAddress;

/// Fifth consecutive failure locks the account.
const MAX_FAILED_LOGINS: i32 = 5;
/// Lockout window.
const LOCKOUT_HOURS: i64 = 2;

// ========================= Login Request =========================
/// Validated login request - can be deserialized directly from JSON
#[derive(Debug, Clone)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone)]
pub enum LoginRequestError {
    EmptyEmail,
    InvalidEmailFormat,
    EmptyPassword,
}

impl std::fmt::Display for LoginRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginRequestError::EmptyEmail => write!(f, "Email cannot be empty"),
            LoginRequestError::InvalidEmailFormat => write!(f, "Invalid email format"),
            LoginRequestError::EmptyPassword => write!(f, "Password cannot be empty"),
        }
    }
}

impl std::error::Error for LoginRequestError {}

impl LoginRequest {
    pub fn new(email: String, password: String) -> Result<Self, LoginRequestError> {
        let email = Self::validate_email(email)?;
        let password = Self::validate_password(password)?;

        Ok(Self { email, password })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    fn validate_email(email: String) -> Result<String, LoginRequestError> {
        let email = email.trim();

        if email.is_empty() {
            return Err(LoginRequestError::EmptyEmail);
        }
        if !EmailAddress::is_valid(email) {
            return Err(LoginRequestError::InvalidEmailFormat);
        }

        Ok(email.to_lowercase())
    }

    fn validate_password(password: String) -> Result<String, LoginRequestError> {
        if password.is_empty() {
            return Err(LoginRequestError::EmptyPassword);
        }

        Ok(password)
    }
}

impl<'de> Deserialize<'de> for LoginRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct LoginRequestHelper {
            email: String,
            password: String,
        }

        let helper = LoginRequestHelper::deserialize(deserializer)?;
        LoginRequest::new(helper.email, helper.password).map_err(serde::de::Error::custom)
    }
}

// ====================== Login Error =============================
#[derive(Debug, Clone)]
pub enum LoginError {
    InvalidCredentials,
    EmailNotVerified,
    AccountDisabled,
    AccountLocked { retry_after_secs: i64 },
    PasswordVerificationFailed(String),
    TokenGenerationFailed(String),
    QueryError(String),
}

impl std::fmt::Display for LoginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginError::InvalidCredentials => write!(f, "Invalid email or password"),
            LoginError::EmailNotVerified => {
                write!(f, "Please verify your email address before logging in")
            }
            LoginError::AccountDisabled => write!(f, "Account is disabled"),
            LoginError::AccountLocked { retry_after_secs } => {
                write!(
                    f,
                    "Account is temporarily locked. Try again in {} seconds",
                    retry_after_secs
                )
            }
            LoginError::PasswordVerificationFailed(msg) => {
                write!(f, "Password verification failed: {}", msg)
            }
            LoginError::TokenGenerationFailed(msg) => {
                write!(f, "Token generation failed: {}", msg)
            }
            LoginError::QueryError(msg) => write!(f, "Query error: {}", msg),
        }
    }
}

impl std::error::Error for LoginError {}

// ============================ Login Response =================================
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: uuid::Uuid,
    pub username: String,
    pub email: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginUserResponse {
    pub token: String,
    #[serde(rename = "expiresIn")]
    pub expires_in: i64,
    pub user: UserInfo,
}

// ============================ Login User Use Case =============================
#[async_trait]
pub trait ILoginUserUseCase: Send + Sync {
    async fn execute(&self, request: LoginRequest) -> Result<LoginUserResponse, LoginError>;
}

pub struct LoginUserUseCase<Q, R, H>
where
    Q: UserQuery,
    R: UserRepository,
    H: PasswordHasher,
{
    query: Q,
    repository: R,
    hasher: H,
    tokens: std::sync::Arc<dyn TokenProvider>,
}

impl<Q, R, H> LoginUserUseCase<Q, R, H>
where
    Q: UserQuery,
    R: UserRepository,
    H: PasswordHasher,
{
    pub fn new(
        query: Q,
        repository: R,
        hasher: H,
        tokens: std::sync::Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            query,
            repository,
            hasher,
            tokens,
        }
    }
}

#[async_trait]
impl<Q, R, H> ILoginUserUseCase for LoginUserUseCase<Q, R, H>
where
    Q: UserQuery,
    R: UserRepository,
    H: PasswordHasher,
{
    async fn execute(&self, request: LoginRequest) -> Result<LoginUserResponse, LoginError> {
        let user = self
            .query
            .find_by_email(request.email())
            .await
            .map_err(|e| LoginError::QueryError(e.to_string()))?
            .ok_or(LoginError::InvalidCredentials)?;

        // Tombstoned accounts behave exactly like unknown emails.
        if user.is_deleted {
            return Err(LoginError::InvalidCredentials);
        }

        if let Some(locked_until) = user.locked_until {
            let now = Utc::now();
            if locked_until > now {
                return Err(LoginError::AccountLocked {
                    retry_after_secs: (locked_until - now).num_seconds().max(1),
                });
            }
        }

        let is_valid = self
            .hasher
            .verify_password(request.password(), &user.password_hash)
            .await
            .map_err(|e| LoginError::PasswordVerificationFailed(e.to_string()))?;

        if !is_valid {
            let attempts = user.failed_login_attempts + 1;
            let locked_until = if attempts >= MAX_FAILED_LOGINS {
                Some(Utc::now() + Duration::hours(LOCKOUT_HOURS))
            } else {
                None
            };

            self.repository
                .record_login_failure(user.id, attempts, locked_until)
                .await
                .map_err(|e| LoginError::QueryError(e.to_string()))?;

            return match locked_until {
                Some(until) => Err(LoginError::AccountLocked {
                    retry_after_secs: (until - Utc::now()).num_seconds().max(1),
                }),
                None => Err(LoginError::InvalidCredentials),
            };
        }

        // Status gates come after the password check so an attacker cannot
        // probe which emails exist but are unverified.
        match user.status {
            AccountStatus::Pending => return Err(LoginError::EmailNotVerified),
            AccountStatus::Inactive | AccountStatus::Suspended => {
                return Err(LoginError::AccountDisabled)
            }
            AccountStatus::Active => {}
        }

        if user.failed_login_attempts > 0 || user.locked_until.is_some() {
            self.repository
                .reset_login_failures(user.id)
                .await
                .map_err(|e| LoginError::QueryError(e.to_string()))?;
        }

        let issued = self
            .tokens
            .issue_access_token(user.id)
            .map_err(|e| LoginError::TokenGenerationFailed(e.to_string()))?;

        Ok(LoginUserResponse {
            token: issued.token,
            expires_in: issued.expires_in,
            user: UserInfo {
                id: user.id,
                username: user.username,
                email: user.email,
                display_name: user.display_name,
                role: user.role,
            },
        })
    }
}
