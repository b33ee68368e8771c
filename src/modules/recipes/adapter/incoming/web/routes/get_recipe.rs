use actix_web::{get, web, HttpRequest, Responder};
use tracing::error;
use uuid::Uuid;

use crate::auth::adapter::incoming::web::extractors::auth::MaybeUser;
use crate::auth::adapter::incoming::web::rate_limit;
use crate::recipes::application::use_cases::get_recipe::GetRecipeError;
use crate::shared::api::ApiResponse;
use crate::AppState;

use super::viewer_for;

#[get("/api/recipes/{id}")]
pub async fn get_recipe_handler(
    http_req: HttpRequest,
    user: MaybeUser,
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Some(blocked) =
        rate_limit::enforce(&data.rate_limiter, &rate_limit::API_POLICY, &http_req).await
    {
        return blocked;
    }

    let viewer = viewer_for(user.0.as_ref());
    let recipe_id = path.into_inner();

    match data.get_recipe_use_case.execute(viewer, recipe_id).await {
        Ok(view) => ApiResponse::success(view),

        Err(GetRecipeError::RecipeNotFound) => {
            ApiResponse::not_found("RECIPE_NOT_FOUND", "Recipe not found")
        }

        Err(GetRecipeError::QueryError(ref e)) => {
            error!(error = %e, recipe_id = %recipe_id, "Recipe fetch failed");
            ApiResponse::internal_error()
        }
    }
}
