use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::application::domain::entities::{AccountStatus, Role, User};
use crate::auth::application::ports::outgoing::user_query::{UserQuery, UserQueryError};

use super::sea_orm_entity::users::{Column, Entity as UserEntity, Model as UserModel};

#[derive(Clone, Debug)]
pub struct UserQueryPostgres {
    db: Arc<DatabaseConnection>,
}

impl UserQueryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn map_to_user(model: UserModel) -> User {
        User {
            id: model.id,
            username: model.username,
            email: model.email,
            password_hash: model.password_hash,
            display_name: model.display_name,
            bio: model.bio,
            role: Role::parse(&model.role).unwrap_or(Role::User),
            status: AccountStatus::parse(&model.account_status).unwrap_or(AccountStatus::Pending),
            email_verification_token_hash: model.email_verification_token_hash,
            email_verification_expires_at: model
                .email_verification_expires_at
                .map(|t| t.to_utc()),
            password_reset_token_hash: model.password_reset_token_hash,
            password_reset_expires_at: model.password_reset_expires_at.map(|t| t.to_utc()),
            failed_login_attempts: model.failed_login_attempts,
            locked_until: model.locked_until.map(|t| t.to_utc()),
            password_changed_at: model.password_changed_at.map(|t| t.to_utc()),
            is_deleted: model.is_deleted,
            created_at: model.created_at.to_utc(),
            updated_at: model.updated_at.to_utc(),
        }
    }

    async fn find_one(
        &self,
        filter: sea_orm::sea_query::SimpleExpr,
    ) -> Result<Option<User>, UserQueryError> {
        UserEntity::find()
            .filter(filter)
            .one(&*self.db)
            .await
            .map(|model| model.map(Self::map_to_user))
            .map_err(|e| UserQueryError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl UserQuery for UserQueryPostgres {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserQueryError> {
        UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map(|model| model.map(Self::map_to_user))
            .map_err(|e| UserQueryError::DatabaseError(e.to_string()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserQueryError> {
        self.find_one(Column::Email.eq(email.to_lowercase())).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserQueryError> {
        self.find_one(Column::Username.eq(username)).await
    }

    async fn find_by_verification_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<User>, UserQueryError> {
        self.find_one(Column::EmailVerificationTokenHash.eq(token_hash))
            .await
    }

    async fn find_by_reset_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<User>, UserQueryError> {
        self.find_one(Column::PasswordResetTokenHash.eq(token_hash))
            .await
    }
}
