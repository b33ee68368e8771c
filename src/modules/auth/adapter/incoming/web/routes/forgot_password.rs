use actix_web::{post, web, HttpRequest, Responder};
use tracing::{error, info};

use crate::auth::adapter::incoming::web::rate_limit;
use crate::auth::application::use_cases::forgot_password::{
    ForgotPasswordError, ForgotPasswordRequest,
};
use crate::shared::api::ApiResponse;
use crate::AppState;

/// The response never reveals whether the email is registered.
#[post("/api/auth/forgot-password")]
pub async fn forgot_password_handler(
    http_req: HttpRequest,
    req: web::Json<ForgotPasswordRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Some(blocked) =
        rate_limit::enforce(&data.rate_limiter, &rate_limit::AUTH_POLICY, &http_req).await
    {
        return blocked;
    }

    match data.forgot_password_use_case.execute(req.into_inner()).await {
        Ok(()) => {
            info!("Password reset requested");
            ApiResponse::success(serde_json::json!({
                "message": "If that email is registered, a reset link has been sent."
            }))
        }

        Err(ForgotPasswordError::EmailSendFailed(ref e)) => {
            error!(error = %e, "Reset email could not be sent");
            ApiResponse::internal_error()
        }

        Err(ForgotPasswordError::QueryError(ref e)) => {
            error!(error = %e, "Password reset query failed");
            ApiResponse::internal_error()
        }
    }
}
