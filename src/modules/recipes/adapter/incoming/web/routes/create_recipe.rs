use actix_web::{post, web, HttpRequest, Responder};
use tracing::{error, info};

use crate::auth::adapter::incoming::web::extractors::auth::AuthenticatedUser;
use crate::auth::adapter::incoming::web::rate_limit;
use crate::recipes::application::use_cases::create_recipe::{
    CreateRecipeError, CreateRecipeRequest,
};
use crate::shared::api::ApiResponse;
use crate::AppState;

#[post("/api/recipes")]
pub async fn create_recipe_handler(
    http_req: HttpRequest,
    user: AuthenticatedUser,
    req: web::Json<CreateRecipeRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Some(blocked) =
        rate_limit::enforce(&data.rate_limiter, &rate_limit::API_POLICY, &http_req).await
    {
        return blocked;
    }

    match data
        .create_recipe_use_case
        .execute(user.user_id, req.into_inner())
        .await
    {
        Ok(view) => {
            info!(recipe_id = %view.id, author_id = %user.user_id, "Recipe created");
            ApiResponse::created(view)
        }

        Err(CreateRecipeError::InvalidCategory) => {
            ApiResponse::bad_request("INVALID_CATEGORY", "Category does not exist")
        }

        Err(CreateRecipeError::RepositoryError(ref e))
        | Err(CreateRecipeError::QueryError(ref e)) => {
            error!(error = %e, "Recipe creation failed");
            ApiResponse::internal_error()
        }
    }
}
