use actix_web::{post, web, HttpRequest, Responder};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::auth::adapter::incoming::web::rate_limit;
use crate::auth::application::orchestrator::user_registration::UserRegistrationError;
use crate::auth::application::use_cases::register_user::{RegisterError, RegisterRequest};
use crate::shared::api::ApiResponse;
use crate::AppState;

#[derive(Serialize)]
pub struct RegisterResponse {
    message: String,
    user: RegisteredUser,
}

#[derive(Serialize)]
struct RegisteredUser {
    id: String,
    username: String,
    email: String,
}

#[post("/api/auth/register")]
pub async fn register_user_handler(
    http_req: HttpRequest,
    req: web::Json<RegisterRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Some(blocked) =
        rate_limit::enforce(&data.rate_limiter, &rate_limit::AUTH_POLICY, &http_req).await
    {
        return blocked;
    }

    let request = req.into_inner();
    info!(email = %request.email(), "Registration attempt");

    match data.register_user_orchestrator.register_user(request).await {
        Ok(created) => {
            info!(user_id = %created.user_id, "User registered");
            ApiResponse::created(RegisterResponse {
                message: created.message,
                user: RegisteredUser {
                    id: created.user_id.to_string(),
                    username: created.username,
                    email: created.email,
                },
            })
        }

        Err(UserRegistrationError::RegisterFailed(RegisterError::EmailTaken)) => {
            warn!("Registration failed: email taken");
            ApiResponse::conflict("EMAIL_TAKEN", "Email is already registered")
        }

        Err(UserRegistrationError::RegisterFailed(RegisterError::UsernameTaken)) => {
            warn!("Registration failed: username taken");
            ApiResponse::conflict("USERNAME_TAKEN", "Username is already taken")
        }

        Err(UserRegistrationError::RegisterFailed(ref e)) => {
            error!(error = %e, "Registration failed");
            ApiResponse::internal_error()
        }
    }
}
