use actix_web::{dev::Payload, web, Error as ActixError, FromRequest, HttpRequest, HttpResponse};
use futures::future::LocalBoxFuture;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::application::domain::entities::Role;
use crate::auth::application::ports::outgoing::token_provider::{TokenError, TokenProvider};
use crate::auth::application::services::principal_resolver::{PrincipalResolver, ResolveError};
use crate::shared::api::ApiResponse;

/// A caller whose token signature and account state have both been checked.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

fn create_api_error(response: HttpResponse) -> ActixError {
    actix_web::error::InternalError::from_response("", response).into()
}

/// The token travels either as a `Bearer` header (API clients) or as the
/// http-only `token` cookie set by the login route (browser clients).
fn extract_token(req: &HttpRequest) -> Option<String> {
    let header_token = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if let Some(token) = header_token {
        return Some(token.to_string());
    }

    req.cookie("token").map(|cookie| cookie.value().to_string())
}

async fn authenticate(req: HttpRequest) -> Result<AuthenticatedUser, ActixError> {
    let token_provider = req
        .app_data::<web::Data<Arc<dyn TokenProvider>>>()
        .cloned()
        .ok_or_else(|| create_api_error(ApiResponse::internal_error()))?;

    let resolver = req
        .app_data::<web::Data<Arc<PrincipalResolver>>>()
        .cloned()
        .ok_or_else(|| create_api_error(ApiResponse::internal_error()))?;

    let token = extract_token(&req).ok_or_else(|| {
        create_api_error(ApiResponse::unauthorized(
            "MISSING_AUTH_TOKEN",
            "Missing authentication token",
        ))
    })?;

    let claims = token_provider.verify_token(&token).map_err(|e| {
        let response = match e {
            TokenError::TokenExpired => {
                ApiResponse::unauthorized("TOKEN_EXPIRED", "Token has expired")
            }
            _ => ApiResponse::unauthorized("INVALID_TOKEN", "Invalid authentication token"),
        };
        create_api_error(response)
    })?;

    let principal = resolver.resolve(&claims).await.map_err(|e| {
        let response = match e {
            ResolveError::UserGone => ApiResponse::unauthorized(
                "INVALID_TOKEN",
                "The user belonging to this token no longer exists",
            ),
            ResolveError::AccountInactive => {
                ApiResponse::forbidden("ACCOUNT_DISABLED", "Account is not active")
            }
            ResolveError::AccountLocked => {
                ApiResponse::locked("ACCOUNT_LOCKED", "Account is temporarily locked")
            }
            ResolveError::PasswordChanged => ApiResponse::unauthorized(
                "TOKEN_REVOKED",
                "Password was changed after this token was issued",
            ),
            ResolveError::Query(msg) => {
                tracing::error!(error = %msg, "Principal resolution failed");
                ApiResponse::internal_error()
            }
        };
        create_api_error(response)
    })?;

    Ok(AuthenticatedUser {
        user_id: principal.user_id,
        username: principal.username,
        role: principal.role,
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(authenticate(req))
    }
}

/// Optional caller identity for routes that serve both visitors and members.
/// Any resolution failure falls back to an anonymous request instead of an
/// error response.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthenticatedUser>);

impl FromRequest for MaybeUser {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            if extract_token(&req).is_none() {
                return Ok(MaybeUser(None));
            }
            Ok(MaybeUser(authenticate(req).await.ok()))
        })
    }
}

/// An authenticated caller with the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl FromRequest for AdminUser {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let user = authenticate(req).await?;
            if !user.is_admin() {
                return Err(create_api_error(ApiResponse::forbidden(
                    "FORBIDDEN",
                    "Administrator access required",
                )));
            }
            Ok(AdminUser(user))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::application::domain::entities::{AccountStatus, User};
    use crate::auth::application::ports::outgoing::token_provider::{IssuedToken, TokenClaims};
    use crate::auth::application::ports::outgoing::user_query::{UserQuery, UserQueryError};
    use actix_web::{get, test, App, Responder};
    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    const GOOD_TOKEN: &str = "good-token";
    const EXPIRED_TOKEN: &str = "expired-token";

    struct StubTokenProvider {
        user_id: Uuid,
    }

    impl TokenProvider for StubTokenProvider {
        fn issue_access_token(&self, _user_id: Uuid) -> Result<IssuedToken, TokenError> {
            unimplemented!("not used by extractor tests")
        }

        fn verify_token(&self, token: &str) -> Result<TokenClaims, TokenError> {
            match token {
                GOOD_TOKEN => Ok(TokenClaims {
                    sub: self.user_id,
                    exp: (Utc::now() + Duration::hours(1)).timestamp(),
                    iat: Utc::now().timestamp(),
                    nbf: Utc::now().timestamp(),
                    iss: "tests".to_string(),
                    aud: "tests".to_string(),
                }),
                EXPIRED_TOKEN => Err(TokenError::TokenExpired),
                _ => Err(TokenError::MalformedToken),
            }
        }
    }

    struct StubUserQuery {
        user: Option<User>,
    }

    #[async_trait]
    impl UserQuery for StubUserQuery {
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

    fn test_user(role: Role, status: AccountStatus) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "marta".to_string(),
            email: "marta@example.com".to_string(),
            password_hash: "hash".to_string(),
            display_name: None,
            bio: None,
            role,
            status,
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

    #[get("/whoami")]
    async fn whoami(user: AuthenticatedUser) -> impl Responder {
        ApiResponse::success(serde_json::json!({ "username": user.username }))
    }

    #[get("/visitor")]
    async fn visitor(user: MaybeUser) -> impl Responder {
        ApiResponse::success(serde_json::json!({
            "anonymous": user.0.is_none()
        }))
    }

    #[get("/admin-only")]
    async fn admin_only(user: AdminUser) -> impl Responder {
        ApiResponse::success(serde_json::json!({ "username": user.0.username }))
    }

    fn auth_app_data(
        user: User,
    ) -> (
        web::Data<Arc<dyn TokenProvider>>,
        web::Data<Arc<PrincipalResolver>>,
    ) {
        let token_provider: Arc<dyn TokenProvider> = Arc::new(StubTokenProvider {
            user_id: user.id,
        });
        let resolver = Arc::new(PrincipalResolver::new(Arc::new(StubUserQuery {
            user: Some(user),
        })));

        (web::Data::new(token_provider), web::Data::new(resolver))
    }

    macro_rules! spawn_app {
        ($user:expr) => {{
            let (token_provider, resolver) = auth_app_data($user);
            test::init_service(
                App::new()
                    .app_data(token_provider)
                    .app_data(resolver)
                    .service(whoami)
                    .service(visitor)
                    .service(admin_only),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn test_bearer_token_authenticates() {
        let app = spawn_app!(test_user(Role::User, AccountStatus::Active));

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", GOOD_TOKEN)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["username"], "marta");
    }

    #[actix_web::test]
    async fn test_cookie_token_authenticates() {
        let app = spawn_app!(test_user(Role::User, AccountStatus::Active));

        let req = test::TestRequest::get()
            .uri("/whoami")
            .cookie(actix_web::cookie::Cookie::new("token", GOOD_TOKEN))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }

    #[actix_web::test]
    async fn test_missing_token_is_unauthorized() {
        let app = spawn_app!(test_user(Role::User, AccountStatus::Active));

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "MISSING_AUTH_TOKEN");
    }

    #[actix_web::test]
    async fn test_expired_token_gets_specific_code() {
        let app = spawn_app!(test_user(Role::User, AccountStatus::Active));

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", EXPIRED_TOKEN)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "TOKEN_EXPIRED");
    }

    #[actix_web::test]
    async fn test_garbage_token_is_unauthorized() {
        let app = spawn_app!(test_user(Role::User, AccountStatus::Active));

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", "Bearer not.a.token"))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_suspended_account_is_forbidden() {
        let app = spawn_app!(test_user(Role::User, AccountStatus::Suspended));

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", GOOD_TOKEN)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 403);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "ACCOUNT_DISABLED");
    }

    #[actix_web::test]
    async fn test_locked_account_returns_423() {
        let mut user = test_user(Role::User, AccountStatus::Active);
        user.locked_until = Some(Utc::now() + Duration::hours(1));
        let app = spawn_app!(user);

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", GOOD_TOKEN)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 423);
    }

    #[actix_web::test]
    async fn test_password_change_revokes_older_tokens() {
        let mut user = test_user(Role::User, AccountStatus::Active);
        user.password_changed_at = Some(Utc::now() + Duration::hours(1));
        let app = spawn_app!(user);

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", GOOD_TOKEN)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "TOKEN_REVOKED");
    }

    #[actix_web::test]
    async fn test_maybe_user_is_anonymous_without_token() {
        let app = spawn_app!(test_user(Role::User, AccountStatus::Active));

        let req = test::TestRequest::get().uri("/visitor").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["anonymous"], true);
    }

    #[actix_web::test]
    async fn test_maybe_user_resolves_valid_token() {
        let app = spawn_app!(test_user(Role::User, AccountStatus::Active));

        let req = test::TestRequest::get()
            .uri("/visitor")
            .insert_header(("Authorization", format!("Bearer {}", GOOD_TOKEN)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["anonymous"], false);
    }

    #[actix_web::test]
    async fn test_maybe_user_swallows_bad_token() {
        let app = spawn_app!(test_user(Role::User, AccountStatus::Active));

        let req = test::TestRequest::get()
            .uri("/visitor")
            .insert_header(("Authorization", "Bearer not.a.token"))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["anonymous"], true);
    }

    #[actix_web::test]
    async fn test_admin_extractor_rejects_regular_user() {
        let app = spawn_app!(test_user(Role::User, AccountStatus::Active));

        let req = test::TestRequest::get()
            .uri("/admin-only")
            .insert_header(("Authorization", format!("Bearer {}", GOOD_TOKEN)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 403);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "FORBIDDEN");
    }

    #[actix_web::test]
    async fn test_admin_extractor_accepts_admin() {
        let app = spawn_app!(test_user(Role::Admin, AccountStatus::Active));

        let req = test::TestRequest::get()
            .uri("/admin-only")
            .insert_header(("Authorization", format!("Bearer {}", GOOD_TOKEN)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }
}
