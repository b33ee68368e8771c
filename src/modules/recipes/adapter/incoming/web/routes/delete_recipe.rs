use actix_web::{delete, web, HttpRequest, Responder};
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::adapter::incoming::web::extractors::auth::AuthenticatedUser;
use crate::auth::adapter::incoming::web::rate_limit;
use crate::recipes::application::use_cases::delete_recipe::DeleteRecipeError;
use crate::shared::api::ApiResponse;
use crate::AppState;

use super::viewer_for;

#[delete("/api/recipes/{id}")]
pub async fn delete_recipe_handler(
    http_req: HttpRequest,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Some(blocked) =
        rate_limit::enforce(&data.rate_limiter, &rate_limit::API_POLICY, &http_req).await
    {
        return blocked;
    }

    let actor = viewer_for(Some(&user));
    let recipe_id = path.into_inner();

    match data.delete_recipe_use_case.execute(actor, recipe_id).await {
        Ok(()) => {
            info!(recipe_id = %recipe_id, "Recipe deleted");
            ApiResponse::no_content()
        }

        Err(DeleteRecipeError::RecipeNotFound) => {
            ApiResponse::not_found("RECIPE_NOT_FOUND", "Recipe not found")
        }

        Err(DeleteRecipeError::NotOwner) => {
            ApiResponse::forbidden("FORBIDDEN", "You can only delete your own recipes")
        }

        Err(DeleteRecipeError::RepositoryError(ref e)) => {
            error!(error = %e, recipe_id = %recipe_id, "Recipe deletion failed");
            ApiResponse::internal_error()
        }
    }
}
