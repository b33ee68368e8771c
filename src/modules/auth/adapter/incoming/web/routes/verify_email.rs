use actix_web::{get, web, HttpRequest, Responder};
use tracing::{info, warn};

use crate::auth::adapter::incoming::web::rate_limit;
use crate::auth::application::use_cases::verify_user_email::VerifyEmailError;
use crate::shared::api::ApiResponse;
use crate::AppState;

/// GET because the link lands in a mail client; the token in the path is
/// single-use either way.
#[get("/api/auth/verify-email/{token}")]
pub async fn verify_user_email_handler(
    http_req: HttpRequest,
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Some(blocked) =
        rate_limit::enforce(&data.rate_limiter, &rate_limit::AUTH_POLICY, &http_req).await
    {
        return blocked;
    }

    let token = path.into_inner();

    match data.verify_user_email_use_case.execute(&token).await {
        Ok(user) => {
            info!(user_id = %user.id, "Email verified");
            ApiResponse::success(serde_json::json!({
                "message": "Email verified successfully. You can now log in.",
                "user": user,
            }))
        }

        Err(VerifyEmailError::InvalidToken) => {
            warn!("Email verification failed: invalid token");
            ApiResponse::bad_request("INVALID_TOKEN", "Invalid or already used verification link")
        }

        Err(VerifyEmailError::TokenExpired) => {
            warn!("Email verification failed: token expired");
            ApiResponse::bad_request(
                "TOKEN_EXPIRED",
                "Verification link has expired. Please register again",
            )
        }

        Err(VerifyEmailError::QueryError(ref e)) => {
            tracing::error!(error = %e, "Email verification query failed");
            ApiResponse::internal_error()
        }
    }
}
