use actix_web::{get, web, HttpRequest, Responder};
use tracing::error;

use crate::auth::adapter::incoming::web::rate_limit;
use crate::categories::application::use_cases::get_category_tree::GetCategoryTreeError;
use crate::shared::api::ApiResponse;
use crate::AppState;

#[get("/api/categories")]
pub async fn get_category_tree_handler(
    http_req: HttpRequest,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Some(blocked) =
        rate_limit::enforce(&data.rate_limiter, &rate_limit::API_POLICY, &http_req).await
    {
        return blocked;
    }

    match data.get_category_tree_use_case.execute().await {
        Ok(tree) => ApiResponse::success(tree),

        Err(GetCategoryTreeError::RepositoryError(ref e)) => {
            error!(error = %e, "Category tree fetch failed");
            ApiResponse::internal_error()
        }
    }
}
