use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::auth::application::ports::outgoing::user_repository::{
    UpdateProfileData, UserRepository, UserRepositoryError, UserResult,
};

// ========================= Update Profile Request =========================
/// Partial update: absent fields keep their current value.
#[derive(Debug, Clone)]
pub struct UpdateProfileRequest {
    display_name: Option<String>,
    bio: Option<String>,
}

#[derive(Debug, Clone)]
pub enum UpdateProfileRequestError {
    NoFieldsProvided,
    DisplayNameTooLong,
    BioTooLong,
}

impl std::fmt::Display for UpdateProfileRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateProfileRequestError::NoFieldsProvided => {
                write!(f, "At least one field must be provided")
            }
            UpdateProfileRequestError::DisplayNameTooLong => {
                write!(f, "Display name must be at most 50 characters")
            }
            UpdateProfileRequestError::BioTooLong => {
                write!(f, "Bio must be at most 500 characters")
            }
        }
    }
}

impl std::error::Error for UpdateProfileRequestError {}

impl UpdateProfileRequest {
    pub fn new(
        display_name: Option<String>,
        bio: Option<String>,
    ) -> Result<Self, UpdateProfileRequestError> {
        if display_name.is_none() && bio.is_none() {
            return Err(UpdateProfileRequestError::NoFieldsProvided);
        }

        let display_name = display_name.map(|s| s.trim().to_string());
        if let Some(name) = &display_name {
            if name.chars().count() > 50 {
                return Err(UpdateProfileRequestError::DisplayNameTooLong);
            }
        }

        let bio = bio.map(|s| s.trim().to_string());
        if let Some(b) = &bio {
            if b.chars().count() > 500 {
                return Err(UpdateProfileRequestError::BioTooLong);
            }
        }

        Ok(Self { display_name, bio })
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }
}

impl<'de> Deserialize<'de> for UpdateProfileRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct UpdateProfileRequestHelper {
            #[serde(rename = "displayName")]
            display_name: Option<String>,
            bio: Option<String>,
        }

        let helper = UpdateProfileRequestHelper::deserialize(deserializer)?;
        UpdateProfileRequest::new(helper.display_name, helper.bio)
            .map_err(serde::de::Error::custom)
    }
}

// ====================== Update Profile Error =============================
#[derive(Debug, Clone)]
pub enum UpdateProfileError {
    UserNotFound,
    RepositoryError(String),
}

impl std::fmt::Display for UpdateProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateProfileError::UserNotFound => write!(f, "User not found"),
            UpdateProfileError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for UpdateProfileError {}

// ====================== Update Profile Use Case ======================
#[async_trait]
pub trait IUpdateProfileUseCase: Send + Sync {
    async fn execute(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<UserResult, UpdateProfileError>;
}

pub struct UpdateProfileUseCase<R>
where
    R: UserRepository,
{
    repository: R,
}

impl<R> UpdateProfileUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> IUpdateProfileUseCase for UpdateProfileUseCase<R>
where
    R: UserRepository,
{
    async fn execute(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<UserResult, UpdateProfileError> {
        self.repository
            .update_profile(
                user_id,
                UpdateProfileData {
                    display_name: request.display_name().map(str::to_string),
                    bio: request.bio().map(str::to_string),
                },
            )
            .await
            .map_err(|e| match e {
                UserRepositoryError::UserNotFound => UpdateProfileError::UserNotFound,
                other => UpdateProfileError::RepositoryError(other.to_string()),
            })
    }
}
