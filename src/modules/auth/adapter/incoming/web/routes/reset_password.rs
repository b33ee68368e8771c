use actix_web::{patch, web, HttpRequest, Responder};
use tracing::{error, info, warn};

use crate::auth::adapter::incoming::web::rate_limit;
use crate::auth::application::use_cases::reset_password::{
    ResetPasswordError, ResetPasswordRequest,
};
use crate::shared::api::ApiResponse;
use crate::AppState;

#[patch("/api/auth/reset-password/{token}")]
pub async fn reset_password_handler(
    http_req: HttpRequest,
    path: web::Path<String>,
    req: web::Json<ResetPasswordRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Some(blocked) =
        rate_limit::enforce(&data.rate_limiter, &rate_limit::AUTH_POLICY, &http_req).await
    {
        return blocked;
    }

    let token = path.into_inner();

    match data
        .reset_password_use_case
        .execute(&token, req.into_inner())
        .await
    {
        Ok(()) => {
            info!("Password reset completed");
            ApiResponse::success(serde_json::json!({
                "message": "Password has been reset. Please log in with your new password."
            }))
        }

        Err(ResetPasswordError::InvalidToken) => {
            warn!("Password reset failed: invalid token");
            ApiResponse::bad_request("INVALID_TOKEN", "Invalid or already used reset link")
        }

        Err(ResetPasswordError::TokenExpired) => {
            warn!("Password reset failed: token expired");
            ApiResponse::bad_request("TOKEN_EXPIRED", "Reset link has expired")
        }

        Err(ResetPasswordError::HashingFailed(ref e)) => {
            error!(error = %e, "Password hashing failed");
            ApiResponse::internal_error()
        }

        Err(ResetPasswordError::QueryError(ref e)) => {
            error!(error = %e, "Password reset query failed");
            ApiResponse::internal_error()
        }
    }
}
