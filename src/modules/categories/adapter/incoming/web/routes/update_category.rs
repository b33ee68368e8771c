use actix_web::{patch, web, HttpRequest, Responder};
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::adapter::incoming::web::extractors::auth::AdminUser;
use crate::auth::adapter::incoming::web::rate_limit;
use crate::categories::application::use_cases::update_category::{
    UpdateCategoryError, UpdateCategoryRequest,
};
use crate::shared::api::ApiResponse;
use crate::AppState;

#[patch("/api/categories/{id}")]
pub async fn update_category_handler(
    http_req: HttpRequest,
    _admin: AdminUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateCategoryRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Some(blocked) =
        rate_limit::enforce(&data.rate_limiter, &rate_limit::API_POLICY, &http_req).await
    {
        return blocked;
    }

    let category_id = path.into_inner();

    match data
        .update_category_use_case
        .execute(category_id, req.into_inner())
        .await
    {
        Ok(record) => {
            info!(category_id = %record.id, "Category updated");
            ApiResponse::success(record)
        }

        Err(UpdateCategoryError::CategoryNotFound) => {
            ApiResponse::not_found("CATEGORY_NOT_FOUND", "Category not found")
        }

        Err(UpdateCategoryError::InvalidParent) => {
            ApiResponse::bad_request("INVALID_PARENT", "Parent category does not exist")
        }

        Err(UpdateCategoryError::DepthExceeded) => ApiResponse::bad_request(
            "MAX_DEPTH_EXCEEDED",
            "Categories cannot be nested this deep",
        ),

        Err(UpdateCategoryError::HasChildren(count)) => ApiResponse::conflict(
            "HAS_CHILDREN",
            &format!(
                "Cannot move or re-slug a category with {} subcategories",
                count
            ),
        ),

        Err(UpdateCategoryError::DuplicateSlug) => {
            ApiResponse::conflict("DUPLICATE_SLUG", "A category with this slug already exists")
        }

        Err(UpdateCategoryError::DuplicateCode) => {
            ApiResponse::conflict("DUPLICATE_CODE", "A category with this code already exists")
        }

        Err(UpdateCategoryError::RepositoryError(ref e)) => {
            error!(error = %e, category_id = %category_id, "Category update failed");
            ApiResponse::internal_error()
        }
    }
}
