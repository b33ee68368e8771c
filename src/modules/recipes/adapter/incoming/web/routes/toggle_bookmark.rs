use actix_web::{post, web, HttpRequest, Responder};
use tracing::error;
use uuid::Uuid;

use crate::auth::adapter::incoming::web::extractors::auth::AuthenticatedUser;
use crate::auth::adapter::incoming::web::rate_limit;
use crate::recipes::application::use_cases::toggle_bookmark::ToggleBookmarkError;
use crate::shared::api::ApiResponse;
use crate::AppState;

#[post("/api/recipes/{id}/bookmark")]
pub async fn toggle_bookmark_handler(
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

    let recipe_id = path.into_inner();

    match data
        .toggle_bookmark_use_case
        .execute(user.user_id, recipe_id)
        .await
    {
        Ok(summary) => ApiResponse::success(summary),

        Err(ToggleBookmarkError::RecipeNotFound) => {
            ApiResponse::not_found("RECIPE_NOT_FOUND", "Recipe not found")
        }

        Err(ToggleBookmarkError::RepositoryError(ref e)) => {
            error!(error = %e, recipe_id = %recipe_id, "Bookmark toggle failed");
            ApiResponse::internal_error()
        }
    }
}
