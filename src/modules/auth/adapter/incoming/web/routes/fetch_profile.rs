use actix_web::{get, web, HttpRequest, Responder};
use tracing::error;

use crate::auth::adapter::incoming::web::extractors::auth::AuthenticatedUser;
use crate::auth::adapter::incoming::web::rate_limit;
use crate::auth::application::use_cases::fetch_profile::FetchProfileError;
use crate::shared::api::ApiResponse;
use crate::AppState;

#[get("/api/users/profile")]
pub async fn fetch_profile_handler(
    http_req: HttpRequest,
    user: AuthenticatedUser,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Some(blocked) =
        rate_limit::enforce(&data.rate_limiter, &rate_limit::API_POLICY, &http_req).await
    {
        return blocked;
    }

    match data.fetch_profile_use_case.execute(user.user_id).await {
        Ok(profile) => ApiResponse::success(profile),

        Err(FetchProfileError::UserNotFound) => {
            ApiResponse::not_found("USER_NOT_FOUND", "User not found")
        }

        Err(FetchProfileError::QueryError(ref e)) => {
            error!(error = %e, "Profile query failed");
            ApiResponse::internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::application::domain::entities::Role;
    use crate::auth::application::use_cases::fetch_profile::{IFetchProfileUseCase, ProfileView};
    use crate::tests::support::app_state_builder::TestAppStateBuilder;
    use crate::tests::support::auth_helper::{authed_app_data, sample_user, TEST_TOKEN};
    use actix_web::{test, App};
    use async_trait::async_trait;
    use chrono::Utc;
    use uuid::Uuid;

    struct MockFetchProfile(Result<ProfileView, FetchProfileError>);

    #[async_trait]
    impl IFetchProfileUseCase for MockFetchProfile {
        async fn execute(&self, _user_id: Uuid) -> Result<ProfileView, FetchProfileError> {
            self.0.clone()
        }
    }

    fn profile_for(user_id: Uuid) -> ProfileView {
        ProfileView {
            id: user_id,
            username: "marta".to_string(),
            email: "marta@example.com".to_string(),
            display_name: Some("Marta".to_string()),
            bio: Some("Home cook".to_string()),
            role: Role::User,
            created_at: Utc::now(),
        }
    }

    #[actix_web::test]
    async fn test_fetch_profile_success() {
        let user = sample_user();
        let (token_provider, resolver) = authed_app_data(user.clone());
        let app_state = TestAppStateBuilder::default()
            .with_fetch_profile(MockFetchProfile(Ok(profile_for(user.id))))
            .build();

        let app = test::init_service(
            App::new()
                .app_data(app_state)
                .app_data(token_provider)
                .app_data(resolver)
                .service(fetch_profile_handler),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/users/profile")
            .insert_header(("Authorization", format!("Bearer {}", TEST_TOKEN)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["username"], "marta");
        assert_eq!(body["data"]["displayName"], "Marta");
        assert_eq!(body["data"]["bio"], "Home cook");
    }

    #[actix_web::test]
    async fn test_fetch_profile_requires_token() {
        let (token_provider, resolver) = authed_app_data(sample_user());
        let app_state = TestAppStateBuilder::default()
            .with_fetch_profile(MockFetchProfile(Err(FetchProfileError::UserNotFound)))
            .build();

        let app = test::init_service(
            App::new()
                .app_data(app_state)
                .app_data(token_provider)
                .app_data(resolver)
                .service(fetch_profile_handler),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/users/profile").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_fetch_profile_missing_user_returns_404() {
        let (token_provider, resolver) = authed_app_data(sample_user());
        let app_state = TestAppStateBuilder::default()
            .with_fetch_profile(MockFetchProfile(Err(FetchProfileError::UserNotFound)))
            .build();

        let app = test::init_service(
            App::new()
                .app_data(app_state)
                .app_data(token_provider)
                .app_data(resolver)
                .service(fetch_profile_handler),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/users/profile")
            .insert_header(("Authorization", format!("Bearer {}", TEST_TOKEN)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }
}
