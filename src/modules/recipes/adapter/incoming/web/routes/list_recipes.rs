use actix_web::{get, web, HttpRequest, Responder};
use tracing::error;

use crate::auth::adapter::incoming::web::extractors::auth::MaybeUser;
use crate::auth::adapter::incoming::web::rate_limit;
use crate::recipes::application::use_cases::list_recipes::{
    ListRecipesError, ListRecipesParams, ListRecipesRequest,
};
use crate::shared::api::{ApiListResponse, ApiResponse};
use crate::AppState;

use super::viewer_for;

#[get("/api/recipes")]
pub async fn list_recipes_handler(
    http_req: HttpRequest,
    user: MaybeUser,
    params: web::Query<ListRecipesParams>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Some(blocked) =
        rate_limit::enforce(&data.rate_limiter, &rate_limit::API_POLICY, &http_req).await
    {
        return blocked;
    }

    let viewer = viewer_for(user.0.as_ref());
    let request = ListRecipesRequest::from_params(params.into_inner());

    match data.list_recipes_use_case.execute(viewer, request).await {
        Ok(output) => ApiListResponse::success(
            output.results,
            output.pagination,
            serde_json::json!({ "recipes": output.recipes }),
        ),

        Err(ListRecipesError::QueryError(ref e)) => {
            error!(error = %e, "Recipe listing failed");
            ApiResponse::internal_error()
        }
    }
}
