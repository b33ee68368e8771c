use actix_web::{patch, web, HttpRequest, Responder};
use tracing::{error, info};

use crate::auth::adapter::incoming::web::extractors::auth::AuthenticatedUser;
use crate::auth::adapter::incoming::web::rate_limit;
use crate::auth::application::use_cases::update_profile::{
    UpdateProfileError, UpdateProfileRequest,
};
use crate::shared::api::ApiResponse;
use crate::AppState;

#[patch("/api/users/profile")]
pub async fn update_profile_handler(
    http_req: HttpRequest,
    user: AuthenticatedUser,
    req: web::Json<UpdateProfileRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Some(blocked) =
        rate_limit::enforce(&data.rate_limiter, &rate_limit::API_POLICY, &http_req).await
    {
        return blocked;
    }

    match data
        .update_profile_use_case
        .execute(user.user_id, req.into_inner())
        .await
    {
        Ok(updated) => {
            info!(user_id = %updated.id, "Profile updated");
            ApiResponse::success(updated)
        }

        Err(UpdateProfileError::UserNotFound) => {
            ApiResponse::not_found("USER_NOT_FOUND", "User not found")
        }

        Err(UpdateProfileError::RepositoryError(ref e)) => {
            error!(error = %e, "Profile update failed");
            ApiResponse::internal_error()
        }
    }
}
