use actix_web::{delete, web, HttpRequest, Responder};
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::adapter::incoming::web::extractors::auth::AdminUser;
use crate::auth::adapter::incoming::web::rate_limit;
use crate::categories::application::use_cases::delete_category::DeleteCategoryError;
use crate::shared::api::ApiResponse;
use crate::AppState;

#[delete("/api/categories/{id}")]
pub async fn delete_category_handler(
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

    match data.delete_category_use_case.execute(category_id).await {
        Ok(()) => {
            info!(category_id = %category_id, "Category deleted");
            ApiResponse::no_content()
        }

        Err(DeleteCategoryError::CategoryNotFound) => {
            ApiResponse::not_found("CATEGORY_NOT_FOUND", "Category not found")
        }

        Err(DeleteCategoryError::HasChildren(count)) => ApiResponse::conflict(
            "HAS_CHILDREN",
            &format!("Cannot delete a category with {} subcategories", count),
        ),

        Err(DeleteCategoryError::HasRecipes(count)) => ApiResponse::conflict(
            "HAS_RECIPES",
            &format!("Cannot delete a category with {} recipes", count),
        ),

        Err(DeleteCategoryError::RepositoryError(ref e)) => {
            error!(error = %e, category_id = %category_id, "Category deletion failed");
            ApiResponse::internal_error()
        }
    }
}
