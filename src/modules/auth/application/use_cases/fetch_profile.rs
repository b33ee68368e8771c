use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::application::domain::entities::Role;
use crate::auth::application::ports::outgoing::user_query::UserQuery;

#[derive(Debug, Clone)]
pub enum FetchProfileError {
    UserNotFound,
    QueryError(String),
}

impl std::fmt::Display for FetchProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchProfileError::UserNotFound => write!(f, "User not found"),
            FetchProfileError::QueryError(msg) => write!(f, "Query error: {}", msg),
        }
    }
}

impl std::error::Error for FetchProfileError {}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub role: Role,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait IFetchProfileUseCase: Send + Sync {
    async fn execute(&self, user_id: Uuid) -> Result<ProfileView, FetchProfileError>;
}

pub struct FetchProfileUseCase<Q>
where
    Q: UserQuery,
{
    query: Q,
}

impl<Q> FetchProfileUseCase<Q>
where
    Q: UserQuery,
{
    pub fn new(query: Q) -> Self {
        Self { query }
    }
}

#[async_trait]
impl<Q> IFetchProfileUseCase for FetchProfileUseCase<Q>
where
    Q: UserQuery,
{
    async fn execute(&self, user_id: Uuid) -> Result<ProfileView, FetchProfileError> {
        let user = self
            .query
            .find_by_id(user_id)
            .await
            .map_err(|e| FetchProfileError::QueryError(e.to_string()))?
            .filter(|u| !u.is_deleted)
            .ok_or(FetchProfileError::UserNotFound)?;

        Ok(ProfileView {
            id: user.id,
            username: user.username,
            email: user.email,
            display_name: user.display_name,
            bio: user.bio,
            role: user.role,
            created_at: user.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::application::domain::entities::{AccountStatus, User};
    use crate::auth::application::ports::outgoing::user_query::UserQueryError;

    struct MockUserQuery {
        user: Option<User>,
    }

    #[async_trait]
    impl UserQuery for MockUserQuery {
        async fn find_by_id(&self, _user_id: Uuid) -> Result<Option<User>, UserQueryError> {
            Ok(self.user.clone())
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<User>, UserQueryError> {
            Ok(None)
        }

        async fn find_by_username(&self, _username: &str) -> Result<Option<User>, UserQueryError> {
            Ok(None)
        }

        async fn find_by_verification_token_hash(
            &self,
            _token_hash: &str,
        ) -> Result<Option<User>, UserQueryError> {
            Ok(None)
        }

        async fn find_by_reset_token_hash(
            &self,
            _token_hash: &str,
        ) -> Result<Option<User>, UserQueryError> {
            Ok(None)
        }
    }

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "marta".to_string(),
            email: "marta@example.com".to_string(),
            password_hash: "hash".to_string(),
            display_name: Some("Marta K".to_string()),
            bio: Some("Sourdough enthusiast".to_string()),
            role: Role::Chef,
            status: AccountStatus::Active,
            email_verification_token_hash: None,
            email_verification_expires_at: None,
            password_reset_token_hash: None,
            password_reset_expires_at: None,
            failed_login_attempts: 0,
            locked_until: None,
            password_changed_at: None,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_fetch_profile_success() {
        let user = sample_user();
        let user_id = user.id;
        let use_case = FetchProfileUseCase::new(MockUserQuery { user: Some(user) });

        let profile = use_case.execute(user_id).await.unwrap();

        assert_eq!(profile.username, "marta");
        assert_eq!(profile.display_name.as_deref(), Some("Marta K"));
        assert_eq!(profile.role, Role::Chef);
    }

    #[tokio::test]
    async fn test_fetch_profile_missing_user() {
        let use_case = FetchProfileUseCase::new(MockUserQuery { user: None });

        let result = use_case.execute(Uuid::new_v4()).await;

        assert!(matches!(result, Err(FetchProfileError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_fetch_profile_deleted_user_is_not_found() {
        let mut user = sample_user();
        user.is_deleted = true;
        let user_id = user.id;
        let use_case = FetchProfileUseCase::new(MockUserQuery { user: Some(user) });

        let result = use_case.execute(user_id).await;

        assert!(matches!(result, Err(FetchProfileError::UserNotFound)));
    }
}
