use actix_web::{post, web, HttpRequest, Responder};
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::adapter::incoming::web::extractors::auth::AuthenticatedUser;
use crate::auth::adapter::incoming::web::rate_limit;
use crate::recipes::application::use_cases::rate_recipe::{RateRecipeError, RateRecipeRequest};
use crate::shared::api::ApiResponse;
use crate::AppState;

#[post("/api/recipes/{id}/rate")]
pub async fn rate_recipe_handler(
    http_req: HttpRequest,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<RateRecipeRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Some(blocked) =
        rate_limit::enforce(&data.rate_limiter, &rate_limit::API_POLICY, &http_req).await
    {
        return blocked;
    }

    let recipe_id = path.into_inner();

    match data
        .rate_recipe_use_case
        .execute(user.user_id, recipe_id, req.into_inner())
        .await
    {
        Ok(summary) => {
            info!(recipe_id = %recipe_id, user_id = %user.user_id, "Recipe rated");
            ApiResponse::success(summary)
        }

        Err(RateRecipeError::RecipeNotFound) => {
            ApiResponse::not_found("RECIPE_NOT_FOUND", "Recipe not found")
        }

        Err(RateRecipeError::CannotRateOwnRecipe) => {
            ApiResponse::forbidden("CANNOT_RATE_OWN_RECIPE", "You cannot rate your own recipe")
        }

        Err(RateRecipeError::RepositoryError(ref e)) => {
            error!(error = %e, recipe_id = %recipe_id, "Rating failed");
            ApiResponse::internal_error()
        }
    }
}
