use actix_web::{post, web, HttpRequest, Responder};
use tracing::{error, info};

use crate::auth::adapter::incoming::web::extractors::auth::AdminUser;
use crate::auth::adapter::incoming::web::rate_limit;
use crate::categories::application::use_cases::create_category::{
    CreateCategoryError, CreateCategoryRequest,
};
use crate::shared::api::ApiResponse;
use crate::AppState;

#[post("/api/categories")]
pub async fn create_category_handler(
    http_req: HttpRequest,
    admin: AdminUser,
    req: web::Json<CreateCategoryRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Some(blocked) =
        rate_limit::enforce(&data.rate_limiter, &rate_limit::API_POLICY, &http_req).await
    {
        return blocked;
    }

    match data
        .create_category_use_case
        .execute(req.into_inner())
        .await
    {
        Ok(record) => {
            info!(category_id = %record.id, admin_id = %admin.0.user_id, "Category created");
            ApiResponse::created(record)
        }

        Err(CreateCategoryError::InvalidParent) => {
            ApiResponse::bad_request("INVALID_PARENT", "Parent category does not exist")
        }

        Err(CreateCategoryError::DepthExceeded) => ApiResponse::bad_request(
            "MAX_DEPTH_EXCEEDED",
            "Categories cannot be nested this deep",
        ),

        Err(CreateCategoryError::DuplicateSlug) => {
            ApiResponse::conflict("DUPLICATE_SLUG", "A category with this slug already exists")
        }

        Err(CreateCategoryError::DuplicateCode) => {
            ApiResponse::conflict("DUPLICATE_CODE", "A category with this code already exists")
        }

        Err(CreateCategoryError::RepositoryError(ref e)) => {
            error!(error = %e, "Category creation failed");
            ApiResponse::internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::application::ports::outgoing::category_repository::CategoryRecord;
    use crate::categories::application::use_cases::create_category::ICreateCategoryUseCase;
    use crate::shared::api::custom_json_config;
    use crate::tests::support::app_state_builder::TestAppStateBuilder;
    use crate::tests::support::auth_helper::{
        authed_app_data, sample_admin, sample_user, TEST_TOKEN,
    };
    use crate::tests::support::category_fixtures::sample_category;
    use actix_web::{test, App};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct MockCreate {
        result: Result<CategoryRecord, CreateCategoryError>,
        captured: Mutex<Option<CreateCategoryRequest>>,
    }

    #[async_trait]
    impl ICreateCategoryUseCase for MockCreate {
        async fn execute(
            &self,
            request: CreateCategoryRequest,
        ) -> Result<CategoryRecord, CreateCategoryError> {
            *self.captured.lock().unwrap() = Some(request);
            self.result.clone()
        }
    }

    fn category_body() -> serde_json::Value {
        serde_json::json!({
            "name": "Desserts",
            "code": "DES"
        })
    }

    macro_rules! spawn_app {
        ($result:expr, $auth:expr) => {{
            let (token_provider, resolver) = $auth;
            let app_state = TestAppStateBuilder::default()
                .with_create_category(MockCreate {
                    result: $result,
                    captured: Mutex::new(None),
                })
                .build();

            test::init_service(
                App::new()
                    .app_data(app_state)
                    .app_data(token_provider)
                    .app_data(resolver)
                    .app_data(custom_json_config())
                    .service(create_category_handler),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn test_create_category_returns_201() {
        let category = sample_category(Uuid::new_v4(), "Desserts", "desserts", None);
        let app = spawn_app!(Ok(category.clone()), authed_app_data(sample_admin()));

        let req = test::TestRequest::post()
            .uri("/api/categories")
            .insert_header(("Authorization", format!("Bearer {}", TEST_TOKEN)))
            .set_json(category_body())
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["slug"], "desserts");
    }

    #[actix_web::test]
    async fn test_create_category_rejects_non_admin() {
        let category = sample_category(Uuid::new_v4(), "Desserts", "desserts", None);
        let app = spawn_app!(Ok(category), authed_app_data(sample_user()));

        let req = test::TestRequest::post()
            .uri("/api/categories")
            .insert_header(("Authorization", format!("Bearer {}", TEST_TOKEN)))
            .set_json(category_body())
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 403);
    }

    #[actix_web::test]
    async fn test_create_category_duplicate_slug_is_409() {
        let app = spawn_app!(
            Err(CreateCategoryError::DuplicateSlug),
            authed_app_data(sample_admin())
        );

        let req = test::TestRequest::post()
            .uri("/api/categories")
            .insert_header(("Authorization", format!("Bearer {}", TEST_TOKEN)))
            .set_json(category_body())
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 409);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "DUPLICATE_SLUG");
    }

    #[actix_web::test]
    async fn test_create_category_short_name_is_validation_error() {
        let category = sample_category(Uuid::new_v4(), "Desserts", "desserts", None);
        let app = spawn_app!(Ok(category), authed_app_data(sample_admin()));

        let req = test::TestRequest::post()
            .uri("/api/categories")
            .insert_header(("Authorization", format!("Bearer {}", TEST_TOKEN)))
            .set_json(serde_json::json!({ "name": "D", "code": "DES" }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
