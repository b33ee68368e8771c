use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::application::domain::entities::{AccountStatus, Role};
use crate::auth::application::ports::outgoing::user_repository::{
    CreateUserData, UpdateProfileData, UserRepository, UserRepositoryError, UserResult,
};

use super::sea_orm_entity::users::{
    ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel,
};

#[derive(Clone, Debug)]
pub struct UserRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl UserRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn map_to_user_result(model: UserModel) -> UserResult {
        UserResult {
            id: model.id,
            username: model.username,
            email: model.email,
            role: Role::parse(&model.role).unwrap_or(Role::User),
            status: AccountStatus::parse(&model.account_status).unwrap_or(AccountStatus::Pending),
        }
    }

    /// Postgres reports which unique constraint fired in the error text.
    fn map_insert_error(e: sea_orm::DbErr) -> UserRepositoryError {
        let err_str = e.to_string().to_lowercase();
        if err_str.contains("23505")
            || err_str.contains("duplicate key")
            || err_str.contains("unique constraint")
        {
            if err_str.contains("username") {
                return UserRepositoryError::DuplicateUsername;
            }
            return UserRepositoryError::DuplicateEmail;
        }
        UserRepositoryError::DatabaseError(e.to_string())
    }

    async fn find_required(&self, user_id: Uuid) -> Result<UserModel, UserRepositoryError> {
        UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?
            .ok_or(UserRepositoryError::UserNotFound)
    }
}

#[async_trait]
impl UserRepository for UserRepositoryPostgres {
    async fn create_user(&self, user: CreateUserData) -> Result<UserResult, UserRepositoryError> {
        let active_user = UserActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            display_name: Set(None),
            bio: Set(None),
            role: Set(Role::User.as_str().to_string()),
            account_status: Set(AccountStatus::Pending.as_str().to_string()),
            email_verification_token_hash: Set(Some(user.verification_token_hash)),
            email_verification_expires_at: Set(Some(user.verification_expires_at.into())),
            password_reset_token_hash: Set(None),
            password_reset_expires_at: Set(None),
            failed_login_attempts: Set(0),
            locked_until: Set(None),
            password_changed_at: Set(None),
            is_deleted: Set(false),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let inserted = active_user
            .insert(&*self.db)
            .await
            .map_err(Self::map_insert_error)?;

        Ok(Self::map_to_user_result(inserted))
    }

    async fn activate_user(&self, user_id: Uuid) -> Result<UserResult, UserRepositoryError> {
        let user = self.find_required(user_id).await?;

        let mut active_user: UserActiveModel = user.into();
        active_user.account_status = Set(AccountStatus::Active.as_str().to_string());
        active_user.email_verification_token_hash = Set(None);
        active_user.email_verification_expires_at = Set(None);

        let activated = active_user
            .update(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        Ok(Self::map_to_user_result(activated))
    }

    async fn record_login_failure(
        &self,
        user_id: Uuid,
        attempts: i32,
        locked_until: Option<DateTime<Utc>>,
    ) -> Result<(), UserRepositoryError> {
        let user = self.find_required(user_id).await?;

        let mut active_user: UserActiveModel = user.into();
        active_user.failed_login_attempts = Set(attempts);
        active_user.locked_until = Set(locked_until.map(Into::into));

        active_user
            .update(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn reset_login_failures(&self, user_id: Uuid) -> Result<(), UserRepositoryError> {
        let user = self.find_required(user_id).await?;

        let mut active_user: UserActiveModel = user.into();
        active_user.failed_login_attempts = Set(0);
        active_user.locked_until = Set(None);

        active_user
            .update(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn set_reset_token(
        &self,
        user_id: Uuid,
        token_hash: String,
        expires_at: DateTime<Utc>,
    ) -> Result<(), UserRepositoryError> {
        let user = self.find_required(user_id).await?;

        let mut active_user: UserActiveModel = user.into();
        active_user.password_reset_token_hash = Set(Some(token_hash));
        active_user.password_reset_expires_at = Set(Some(expires_at.into()));

        active_user
            .update(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn clear_reset_token(&self, user_id: Uuid) -> Result<(), UserRepositoryError> {
        let user = self.find_required(user_id).await?;

        let mut active_user: UserActiveModel = user.into();
        active_user.password_reset_token_hash = Set(None);
        active_user.password_reset_expires_at = Set(None);

        active_user
            .update(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn update_password(
        &self,
        user_id: Uuid,
        new_password_hash: String,
        changed_at: DateTime<Utc>,
    ) -> Result<(), UserRepositoryError> {
        let user = self.find_required(user_id).await?;

        let mut active_user: UserActiveModel = user.into();
        active_user.password_hash = Set(new_password_hash);
        active_user.password_changed_at = Set(Some(changed_at.into()));
        active_user.password_reset_token_hash = Set(None);
        active_user.password_reset_expires_at = Set(None);
        active_user.failed_login_attempts = Set(0);
        active_user.locked_until = Set(None);

        active_user
            .update(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: UpdateProfileData,
    ) -> Result<UserResult, UserRepositoryError> {
        let user = self.find_required(user_id).await?;

        let mut active_user: UserActiveModel = user.into();
        if let Some(display_name) = changes.display_name {
            active_user.display_name = Set(Some(display_name));
        }
        if let Some(bio) = changes.bio {
            active_user.bio = Set(Some(bio));
        }

        let updated = active_user
            .update(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        Ok(Self::map_to_user_result(updated))
    }

    async fn anonymize_user(
        &self,
        user_id: Uuid,
        tombstone_username: String,
        tombstone_email: String,
    ) -> Result<(), UserRepositoryError> {
        let user = self.find_required(user_id).await?;

        let mut active_user: UserActiveModel = user.into();
        active_user.username = Set(tombstone_username);
        active_user.email = Set(tombstone_email);
        active_user.display_name = Set(None);
        active_user.bio = Set(None);
        active_user.account_status = Set(AccountStatus::Inactive.as_str().to_string());
        active_user.is_deleted = Set(true);

        active_user
            .update(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
