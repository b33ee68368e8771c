//! Stub token/principal wiring for route tests that go through the
//! authentication extractors.

use actix_web::web;
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::application::domain::entities::{AccountStatus, Role, User};
use crate::auth::application::ports::outgoing::token_provider::{
    IssuedToken, TokenClaims, TokenError, TokenProvider,
};
use crate::auth::application::ports::outgoing::user_query::{UserQuery, UserQueryError};
use crate::auth::application::services::principal_resolver::PrincipalResolver;

pub const TEST_TOKEN: &str = "test-token";

struct StubTokenProvider {
    user_id: Uuid,
}

impl TokenProvider for StubTokenProvider {
    fn issue_access_token(&self, _user_id: Uuid) -> Result<IssuedToken, TokenError> {
        unimplemented!("route tests never issue tokens")
    }

    fn verify_token(&self, token: &str) -> Result<TokenClaims, TokenError> {
        if token != TEST_TOKEN {
            return Err(TokenError::MalformedToken);
        }
        Ok(TokenClaims {
            sub: self.user_id,
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            iat: Utc::now().timestamp(),
            nbf: Utc::now().timestamp(),
            iss: "tests".to_string(),
            aud: "tests".to_string(),
        })
    }
}

struct StubUserQuery {
    user: User,
}

#[async_trait::async_trait]
impl UserQuery for StubUserQuery {
    async fn find_by_id(&self, _user_id: Uuid) -> Result<Option<User>, UserQueryError> {
        Ok(Some(self.user.clone()))
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

fn user_with_role(role: Role) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        username: "marta".to_string(),
        email: "marta@example.com".to_string(),
        password_hash: "hash".to_string(),
        display_name: None,
        bio: None,
        role,
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

pub fn sample_user() -> User {
    user_with_role(Role::User)
}

pub fn sample_admin() -> User {
    user_with_role(Role::Admin)
}

/// App data that lets `TEST_TOKEN` authenticate as the given user.
pub fn authed_app_data(
    user: User,
) -> (
    web::Data<Arc<dyn TokenProvider>>,
    web::Data<Arc<PrincipalResolver>>,
) {
    let token_provider: Arc<dyn TokenProvider> = Arc::new(StubTokenProvider { user_id: user.id });
    let resolver = Arc::new(PrincipalResolver::new(Arc::new(StubUserQuery { user })));

    (web::Data::new(token_provider), web::Data::new(resolver))
}
