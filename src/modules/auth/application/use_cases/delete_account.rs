use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::application::ports::outgoing::user_repository::{
    UserRepository, UserRepositoryError,
};

// ====================== Delete Account Error =============================
#[derive(Debug, Clone)]
pub enum DeleteAccountError {
    UserNotFound,
    RepositoryError(String),
}

impl std::fmt::Display for DeleteAccountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteAccountError::UserNotFound => write!(f, "User not found"),
            DeleteAccountError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for DeleteAccountError {}

// ====================== Delete Account Use Case ======================
/// Soft delete. Identity fields are replaced with tombstone values so the
/// row keeps satisfying the unique constraints while recipes retain their
/// author reference.
#[async_trait]
pub trait IDeleteAccountUseCase: Send + Sync {
    async fn execute(&self, user_id: Uuid) -> Result<(), DeleteAccountError>;
}

pub struct DeleteAccountUseCase<R>
where
    R: UserRepository,
{
    repository: R,
}

impl<R> DeleteAccountUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

pub(crate) fn tombstone_username(user_id: Uuid) -> String {
    let id = user_id.simple().to_string();
    format!("deleted_{}", &id[..8])
}

pub(crate) fn tombstone_email(user_id: Uuid) -> String {
    format!("{}@anonymized.invalid", user_id)
}

#[async_trait]
impl<R> IDeleteAccountUseCase for DeleteAccountUseCase<R>
where
    R: UserRepository,
{
    async fn execute(&self, user_id: Uuid) -> Result<(), DeleteAccountError> {
        self.repository
            .anonymize_user(
                user_id,
                tombstone_username(user_id),
                tombstone_email(user_id),
            )
            .await
            .map_err(|e| match e {
                UserRepositoryError::UserNotFound => DeleteAccountError::UserNotFound,
                other => DeleteAccountError::RepositoryError(other.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::application::ports::outgoing::user_repository::{
        CreateUserData, UpdateProfileData, UserResult,
    };
    use chrono::{DateTime, Utc};
    use std::sync::Mutex;

    #[test]
    fn test_tombstone_values_are_derived_from_user_id() {
        let id = Uuid::parse_str("6ba7b810-9dad-11d1-80b4-00c04fd430c8").unwrap();

        assert_eq!(tombstone_username(id), "deleted_6ba7b810");
        assert_eq!(
            tombstone_email(id),
            "6ba7b810-9dad-11d1-80b4-00c04fd430c8@anonymized.invalid"
        );
    }

    struct MockUserRepository {
        missing: bool,
        captured: Mutex<Option<(Uuid, String, String)>>,
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn create_user(
            &self,
            _user: CreateUserData,
        ) -> Result<UserResult, UserRepositoryError> {
            unimplemented!()
        }

        async fn activate_user(&self, _user_id: Uuid) -> Result<UserResult, UserRepositoryError> {
            unimplemented!()
        }

        async fn record_login_failure(
            &self,
            _user_id: Uuid,
            _attempts: i32,
            _locked_until: Option<DateTime<Utc>>,
        ) -> Result<(), UserRepositoryError> {
            unimplemented!()
        }

        async fn reset_login_failures(&self, _user_id: Uuid) -> Result<(), UserRepositoryError> {
            unimplemented!()
        }

        async fn set_reset_token(
            &self,
            _user_id: Uuid,
            _token_hash: String,
            _expires_at: DateTime<Utc>,
        ) -> Result<(), UserRepositoryError> {
            unimplemented!()
        }

        async fn clear_reset_token(&self, _user_id: Uuid) -> Result<(), UserRepositoryError> {
            unimplemented!()
        }

        async fn update_password(
            &self,
            _user_id: Uuid,
            _new_password_hash: String,
            _changed_at: DateTime<Utc>,
        ) -> Result<(), UserRepositoryError> {
            unimplemented!()
        }

        async fn update_profile(
            &self,
            _user_id: Uuid,
            _changes: UpdateProfileData,
        ) -> Result<UserResult, UserRepositoryError> {
            unimplemented!()
        }

        async fn anonymize_user(
            &self,
            user_id: Uuid,
            tombstone_username: String,
            tombstone_email: String,
        ) -> Result<(), UserRepositoryError> {
            if self.missing {
                return Err(UserRepositoryError::UserNotFound);
            }
            *self.captured.lock().unwrap() =
                Some((user_id, tombstone_username, tombstone_email));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_delete_account_anonymizes_identity() {
        let use_case = DeleteAccountUseCase::new(MockUserRepository {
            missing: false,
            captured: Mutex::new(None),
        });
        let user_id = Uuid::new_v4();

        use_case.execute(user_id).await.unwrap();

        let (id, username, email) = use_case
            .repository
            .captured
            .lock()
            .unwrap()
            .clone()
            .unwrap();
        assert_eq!(id, user_id);
        assert!(username.starts_with("deleted_"));
        assert!(email.ends_with("@anonymized.invalid"));
    }

    #[tokio::test]
    async fn test_delete_account_missing_user() {
        let use_case = DeleteAccountUseCase::new(MockUserRepository {
            missing: true,
            captured: Mutex::new(None),
        });

        let result = use_case.execute(Uuid::new_v4()).await;

        assert!(matches!(result, Err(DeleteAccountError::UserNotFound)));
    }
}
