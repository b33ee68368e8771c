use actix_web::{patch, web, HttpRequest, Responder};
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::adapter::incoming::web::extractors::auth::AuthenticatedUser;
use crate::auth::adapter::incoming::web::rate_limit;
use crate::recipes::application::use_cases::update_recipe::{
    UpdateRecipeError, UpdateRecipeRequest,
};
use crate::shared::api::ApiResponse;
use crate::AppState;

use super::viewer_for;

#[patch("/api/recipes/{id}")]
pub async fn update_recipe_handler(
    http_req: HttpRequest,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateRecipeRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Some(blocked) =
        rate_limit::enforce(&data.rate_limiter, &rate_limit::API_POLICY, &http_req).await
    {
        return blocked;
    }

    let actor = viewer_for(Some(&user));
    let recipe_id = path.into_inner();

    match data
        .update_recipe_use_case
        .execute(actor, recipe_id, req.into_inner())
        .await
    {
        Ok(view) => {
            info!(recipe_id = %view.id, "Recipe updated");
            ApiResponse::success(view)
        }

        Err(UpdateRecipeError::RecipeNotFound) => {
            ApiResponse::not_found("RECIPE_NOT_FOUND", "Recipe not found")
        }

        Err(UpdateRecipeError::NotOwner) => {
            ApiResponse::forbidden("FORBIDDEN", "You can only modify your own recipes")
        }

        Err(UpdateRecipeError::InvalidCategory) => {
            ApiResponse::bad_request("INVALID_CATEGORY", "Category does not exist")
        }

        Err(UpdateRecipeError::RepositoryError(ref e))
        | Err(UpdateRecipeError::QueryError(ref e)) => {
            error!(error = %e, recipe_id = %recipe_id, "Recipe update failed");
            ApiResponse::internal_error()
        }
    }
}
