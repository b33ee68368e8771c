use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::{Deserialize, Deserializer};

use crate::auth::application::ports::outgoing::password_hasher::PasswordHasher;
use crate::auth::application::ports::outgoing::user_repository::{
    CreateUserData, UserRepository, UserRepositoryError,
};
use crate::auth::application::services::password_policy::{PasswordPolicy, PasswordPolicyError};
use crate::auth::application::services::token_digest;
use email_address::EmailAddress;

/// Verification links stay valid for 24 hours.
const VERIFICATION_TOKEN_TTL_HOURS: i64 = 24;

// ========================= Register Request =========================
/// Validated registration request - can be deserialized directly from JSON
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
}

#[derive(Debug, Clone)]
pub enum RegisterRequestError {
    EmptyUsername,
    UsernameTooShort,
    UsernameTooLong,
    InvalidUsernameChars,
    EmptyEmail,
    InvalidEmailFormat,
    WeakPassword(PasswordPolicyError),
}

impl std::fmt::Display for RegisterRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegisterRequestError::EmptyUsername => write!(f, "Username cannot be empty"),
            RegisterRequestError::UsernameTooShort => {
                write!(f, "Username must be at least 3 characters")
            }
            RegisterRequestError::UsernameTooLong => {
                write!(f, "Username must be at most 30 characters")
            }
            RegisterRequestError::InvalidUsernameChars => {
                write!(
                    f,
                    "Username may only contain letters, numbers and underscores"
                )
            }
            RegisterRequestError::EmptyEmail => write!(f, "Email cannot be empty"),
            RegisterRequestError::InvalidEmailFormat => write!(f, "Invalid email format"),
            RegisterRequestError::WeakPassword(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RegisterRequestError {}

impl RegisterRequest {
    pub fn new(
        username: String,
        email: String,
        password: String,
    ) -> Result<Self, RegisterRequestError> {
        let username = Self::validate_username(username)?;
        let email = Self::validate_email(email)?;
        PasswordPolicy::validate(&password).map_err(RegisterRequestError::WeakPassword)?;

        Ok(Self {
            username,
            email,
            password,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    fn validate_username(username: String) -> Result<String, RegisterRequestError> {
        let username = username.trim().to_lowercase();

        if username.is_empty() {
            return Err(RegisterRequestError::EmptyUsername);
        }
        if username.len() < 3 {
            return Err(RegisterRequestError::UsernameTooShort);
        }
        if username.len() > 30 {
            return Err(RegisterRequestError::UsernameTooLong);
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(RegisterRequestError::InvalidUsernameChars);
        }

        Ok(username)
    }

    fn validate_email(email: String) -> Result<String, RegisterRequestError> {
        let email = email.trim();

        if email.is_empty() {
            return Err(RegisterRequestError::EmptyEmail);
        }
        if !EmailAddress::is_valid(email) {
            return Err(RegisterRequestError::InvalidEmailFormat);
        }

        Ok(email.to_lowercase())
    }
}

// Custom deserialization that validates during parsing
impl<'de> Deserialize<'de> for RegisterRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RegisterRequestHelper {
            username: String,
            email: String,
            password: String,
        }

        let helper = RegisterRequestHelper::deserialize(deserializer)?;
        RegisterRequest::new(helper.username, helper.email, helper.password)
            .map_err(serde::de::Error::custom)
    }
}

// ====================== Register Error =============================
#[derive(Debug, Clone)]
pub enum RegisterError {
    EmailTaken,
    UsernameTaken,
    HashingFailed(String),
    RepositoryError(String),
}

impl std::fmt::Display for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegisterError::EmailTaken => write!(f, "Email is already registered"),
            RegisterError::UsernameTaken => write!(f, "Username is already taken"),
            RegisterError::HashingFailed(msg) => write!(f, "Password hashing failed: {}", msg),
            RegisterError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for RegisterError {}

impl From<UserRepositoryError> for RegisterError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::DuplicateEmail => RegisterError::EmailTaken,
            UserRepositoryError::DuplicateUsername => RegisterError::UsernameTaken,
            other => RegisterError::RepositoryError(other.to_string()),
        }
    }
}

// ====================== Register Output =============================
/// Carries the raw verification token so the orchestrator can mail it.
/// The token is never serialized into an API response.
#[derive(Debug, Clone)]
pub struct RegisterUserOutput {
    pub user_id: uuid::Uuid,
    pub username: String,
    pub email: String,
    pub verification_token: String,
}

// ====================== Register User Use Case ======================
#[async_trait]
pub trait IRegisterUserUseCase: Send + Sync {
    async fn execute(&self, request: RegisterRequest) -> Result<RegisterUserOutput, RegisterError>;
}

pub struct RegisterUserUseCase<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    repository: R,
    hasher: H,
}

impl<R, H> RegisterUserUseCase<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    pub fn new(repository: R, hasher: H) -> Self {
        Self { repository, hasher }
    }
}

#[async_trait]
impl<R, H> IRegisterUserUseCase for RegisterUserUseCase<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn execute(&self, request: RegisterRequest) -> Result<RegisterUserOutput, RegisterError> {
        let password_hash = self
            .hasher
            .hash_password(request.password())
            .await
            .map_err(|e| RegisterError::HashingFailed(e.to_string()))?;

        let verification_token = token_digest::generate_token();
        let token_hash = token_digest::hash_token(&verification_token);

        let created = self
            .repository
            .create_user(CreateUserData {
                username: request.username().to_string(),
                email: request.email().to_string(),
                password_hash,
                verification_token_hash: token_hash,
                verification_expires_at: Utc::now() + Duration::hours(VERIFICATION_TOKEN_TTL_HOURS),
            })
            .await?;

        Ok(RegisterUserOutput {
            user_id: created.id,
            username: created.username,
            email: created.email,
            verification_token,
        })
    }
}
