use std::sync::Arc;

use uuid::Uuid;

use crate::auth::application::domain::entities::{AccountStatus, Role};
use crate::auth::application::ports::outgoing::token_provider::TokenClaims;
use crate::auth::application::ports::outgoing::user_query::{UserQuery, UserQueryError};

/// The authenticated caller attached to a request once the token and the
/// account behind it have both been checked.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("The user belonging to this token no longer exists")]
    UserGone,

    #[error("Account is not active")]
    AccountInactive,

    #[error("Account is temporarily locked")]
    AccountLocked,

    #[error("Password was changed after this token was issued")]
    PasswordChanged,

    #[error("Database error: {0}")]
    Query(String),
}

impl From<UserQueryError> for ResolveError {
    fn from(err: UserQueryError) -> Self {
        match err {
            UserQueryError::DatabaseError(msg) => ResolveError::Query(msg),
        }
    }
}

/// Re-checks the account behind a verified token on every request. A valid
/// signature alone is not enough: deletion, deactivation, lockout and
/// password changes must all invalidate tokens issued earlier.
pub struct PrincipalResolver {
    user_query: Arc<dyn UserQuery>,
}

impl PrincipalResolver {
    pub fn new(user_query: Arc<dyn UserQuery>) -> Self {
        Self { user_query }
    }

    pub async fn resolve(&self, claims: &TokenClaims) -> Result<Principal, ResolveError> {
        let user = self
            .user_query
            .find_by_id(claims.sub)
            .await?
            .ok_or(ResolveError::UserGone)?;

        if user.is_deleted {
            return Err(ResolveError::UserGone);
        }

        if user.status != AccountStatus::Active {
            return Err(ResolveError::AccountInactive);
        }

        if user.is_locked() {
            return Err(ResolveError::AccountLocked);
        }

        if user.password_changed_after(claims.iat) {
            return Err(ResolveError::PasswordChanged);
        }

        Ok(Principal {
            user_id: user.id,
            username: user.username,
            role: user.role,
        })
    }
}
