use actix_web::{post, web, HttpRequest, Responder};
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::adapter::incoming::web::extractors::auth::AdminUser;
use crate::auth::adapter::incoming::web::rate_limit;
use crate::categories::application::use_cases::recount_recipes::RecountRecipesError;
use crate::shared::api::ApiResponse;
use crate::AppState;

#[post("/api/categories/{id}/recount")]
pub async fn recount_category_handler(
    http_req: HttpRequest,
    _admin: AdminUser,
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Some(blocked) =
        rate_limit::enforce(&data.rate_limiter, &rate_limit::API_POLICY, &http_req).await
    {
        return blocked;
    }

    let category_id = path.into_inner();

    match data
        .recount_recipes_use_case
        .recount_one(category_id)
        .await
    {
        Ok(result) => {
            info!(category_id = %category_id, recipe_count = result.recipe_count, "Category recounted");
            ApiResponse::success(result)
        }

        Err(RecountRecipesError::CategoryNotFound) => {
            ApiResponse::not_found("CATEGORY_NOT_FOUND", "Category not found")
        }

        Err(RecountRecipesError::RepositoryError(ref e)) => {
            error!(error = %e, category_id = %category_id, "Category recount failed");
            ApiResponse::internal_error()
        }
    }
}

#[post("/api/categories/recount")]
pub async fn recount_all_categories_handler(
    http_req: HttpRequest,
    _admin: AdminUser,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Some(blocked) =
        rate_limit::enforce(&data.rate_limiter, &rate_limit::API_POLICY, &http_req).await
    {
        return blocked;
    }

    match data.recount_recipes_use_case.recount_all().await {
        Ok(results) => {
            info!(categories = results.len(), "All categories recounted");
            ApiResponse::success(results)
        }

        Err(RecountRecipesError::CategoryNotFound) => {
            ApiResponse::not_found("CATEGORY_NOT_FOUND", "Category not found")
        }

        Err(RecountRecipesError::RepositoryError(ref e)) => {
            error!(error = %e, "Category recount failed");
            ApiResponse::internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::application::use_cases::recount_recipes::{
        IRecountRecipesUseCase, RecountResult,
    };
    use crate::tests::support::app_state_builder::TestAppStateBuilder;
    use crate::tests::support::auth_helper::{
        authed_app_data, sample_admin, sample_user, TEST_TOKEN,
    };
    use actix_web::{test, App};
    use async_trait::async_trait;

    struct MockRecount {
        one: Result<RecountResult, RecountRecipesError>,
        all: Result<Vec<RecountResult>, RecountRecipesError>,
    }

    #[async_trait]
    impl IRecountRecipesUseCase for MockRecount {
        async fn recount_one(
            &self,
            _category_id: Uuid,
        ) -> Result<RecountResult, RecountRecipesError> {
            self.one.clone()
        }

        async fn recount_all(&self) -> Result<Vec<RecountResult>, RecountRecipesError> {
            self.all.clone()
        }
    }

    macro_rules! spawn_app {
        ($mock:expr, $auth:expr) => {{
            let (token_provider, resolver) = $auth;
            let app_state = TestAppStateBuilder::default()
                .with_recount_recipes($mock)
                .build();

            test::init_service(
                App::new()
                    .app_data(app_state)
                    .app_data(token_provider)
                    .app_data(resolver)
                    .service(recount_category_handler)
                    .service(recount_all_categories_handler),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn test_recount_one_returns_fresh_count() {
        let category_id = Uuid::new_v4();
        let app = spawn_app!(
            MockRecount {
                one: Ok(RecountResult {
                    category_id,
                    recipe_count: 9,
                }),
                all: Ok(vec![]),
            },
            authed_app_data(sample_admin())
        );

        let req = test::TestRequest::post()
            .uri(&format!("/api/categories/{}/recount", category_id))
            .insert_header(("Authorization", format!("Bearer {}", TEST_TOKEN)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["recipeCount"], 9);
    }

    #[actix_web::test]
    async fn test_recount_all_lists_every_category() {
        let app = spawn_app!(
            MockRecount {
                one: Err(RecountRecipesError::CategoryNotFound),
                all: Ok(vec![
                    RecountResult {
                        category_id: Uuid::new_v4(),
                        recipe_count: 4,
                    },
                    RecountResult {
                        category_id: Uuid::new_v4(),
                        recipe_count: 0,
                    },
                ]),
            },
            authed_app_data(sample_admin())
        );

        let req = test::TestRequest::post()
            .uri("/api/categories/recount")
            .insert_header(("Authorization", format!("Bearer {}", TEST_TOKEN)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_recount_rejects_non_admin() {
        let app = spawn_app!(
            MockRecount {
                one: Ok(RecountResult {
                    category_id: Uuid::new_v4(),
                    recipe_count: 0,
                }),
                all: Ok(vec![]),
            },
            authed_app_data(sample_user())
        );

        let req = test::TestRequest::post()
            .uri("/api/categories/recount")
            .insert_header(("Authorization", format!("Bearer {}", TEST_TOKEN)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 403);
    }

    #[actix_web::test]
    async fn test_recount_missing_category_is_404() {
        let app = spawn_app!(
            MockRecount {
                one: Err(RecountRecipesError::CategoryNotFound),
                all: Ok(vec![]),
            },
            authed_app_data(sample_admin())
        );

        let req = test::TestRequest::post()
            .uri(&format!("/api/categories/{}/recount", Uuid::new_v4()))
            .insert_header(("Authorization", format!("Bearer {}", TEST_TOKEN)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }
}
